use crate::error::ModelError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Position of a run in the watermark column of a source table.
///
/// Integer columns map one to one; timestamp columns map to Unix epoch
/// milliseconds so both share the same natural ordering.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Watermark(i64);

impl Watermark {
    /// Watermark a freshly provisioned checkpoint starts from.
    pub const ZERO: Watermark = Watermark(0);

    pub const fn new(value: i64) -> Self {
        Watermark(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }

    pub fn from_timestamp(ts: DateTime<Utc>) -> Self {
        Watermark(ts.timestamp_millis())
    }

    /// Strict "newer than" test used to select the incremental slice.
    /// A missing (NULL) value is never newer than any threshold.
    pub fn is_newer(value: Option<Watermark>, threshold: Watermark) -> bool {
        matches!(value, Some(v) if v > threshold)
    }
}

impl From<i64> for Watermark {
    fn from(value: i64) -> Self {
        Watermark(value)
    }
}

impl From<DateTime<Utc>> for Watermark {
    fn from(ts: DateTime<Utc>) -> Self {
        Watermark::from_timestamp(ts)
    }
}

impl FromStr for Watermark {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Watermark)
            .map_err(|_| ModelError::InvalidWatermark(s.to_string()))
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_stored_string_form() {
        assert_eq!("15".parse::<Watermark>().unwrap(), Watermark::new(15));
        assert_eq!(" 0 ".parse::<Watermark>().unwrap(), Watermark::ZERO);
        assert_eq!("-3".parse::<Watermark>().unwrap(), Watermark::new(-3));
    }

    #[test]
    fn rejects_non_integer_strings() {
        let err = "15.5".parse::<Watermark>().unwrap_err();
        assert_eq!(err, ModelError::InvalidWatermark("15.5".to_string()));
        assert!("".parse::<Watermark>().is_err());
        assert!("No Executions yet".parse::<Watermark>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        let wm = Watermark::new(1_700_000_000);
        assert_eq!(wm.to_string().parse::<Watermark>().unwrap(), wm);
    }

    #[test]
    fn timestamps_order_like_their_instants() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 1).unwrap();
        assert!(Watermark::from(earlier) < Watermark::from(later));
        assert_eq!(
            Watermark::from(later).value() - Watermark::from(earlier).value(),
            1000
        );
    }

    #[test]
    fn null_is_never_newer() {
        assert!(!Watermark::is_newer(None, Watermark::new(i64::MIN)));
        assert!(!Watermark::is_newer(Some(Watermark::new(5)), Watermark::new(5)));
        assert!(Watermark::is_newer(Some(Watermark::new(6)), Watermark::new(5)));
    }
}
