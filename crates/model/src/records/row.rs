use crate::{
    core::watermark::Watermark,
    records::{Record, TableRow},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

/// Row of the replicated source table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRow {
    pub id: i64,
    pub old_column: Option<String>,
    #[serde(default, deserialize_with = "watermark_value")]
    pub time_stamp: Option<i64>,
}

/// Accepts an integer or an RFC 3339 timestamp, the latter mapped to epoch
/// milliseconds.
fn watermark_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => DateTime::parse_from_rfc3339(text.trim())
            .map(|ts| Some(Watermark::from(ts.with_timezone(&Utc)).value()))
            .map_err(|_| de::Error::custom(format!("invalid watermark value: {text}"))),
    }
}

impl SourceRow {
    /// Column that carries the watermark.
    pub const WATERMARK_COLUMN: &'static str = "time_stamp";
}

impl Record for SourceRow {
    fn watermark(&self) -> Option<Watermark> {
        self.time_stamp.map(Watermark::new)
    }
}

/// Row written to the target table: the source columns plus `new_column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRow {
    pub id: i64,
    pub old_column: Option<String>,
    pub new_column: Option<String>,
    pub time_stamp: Option<i64>,
}

impl Record for TargetRow {
    fn watermark(&self) -> Option<Watermark> {
        self.time_stamp.map(Watermark::new)
    }
}

impl TableRow for TargetRow {
    const COLUMNS: &'static [&'static str] = &["id", "old_column", "new_column", "time_stamp"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::max_watermark;

    fn row(id: i64, ts: Option<i64>) -> SourceRow {
        SourceRow {
            id,
            old_column: None,
            time_stamp: ts,
        }
    }

    #[test]
    fn max_watermark_skips_nulls() {
        let rows = vec![row(1, Some(5)), row(2, None), row(3, Some(15)), row(4, Some(10))];
        assert_eq!(max_watermark(&rows), Some(Watermark::new(15)));
    }

    #[test]
    fn max_watermark_of_nulls_is_none() {
        let rows = vec![row(1, None), row(2, None)];
        assert_eq!(max_watermark(&rows), None);
        assert_eq!(max_watermark::<SourceRow, _>(&[]), None);
    }

    #[test]
    fn timestamp_text_maps_to_epoch_millis() {
        let row: SourceRow =
            serde_json::from_str(r#"{"id":1,"old_column":null,"time_stamp":"1970-01-01T00:00:01.5Z"}"#)
                .unwrap();
        assert_eq!(row.time_stamp, Some(1500));

        let row: SourceRow =
            serde_json::from_str(r#"{"id":2,"old_column":"a","time_stamp":42}"#).unwrap();
        assert_eq!(row.watermark(), Some(Watermark::new(42)));

        let row: SourceRow = serde_json::from_str(r#"{"id":3,"old_column":null}"#).unwrap();
        assert_eq!(row.time_stamp, None);
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        let result = serde_json::from_str::<SourceRow>(r#"{"id":1,"old_column":null,"time_stamp":"yesterday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn target_columns_follow_field_order() {
        let target = TargetRow {
            id: 1,
            old_column: Some("a".into()),
            new_column: Some("b".into()),
            time_stamp: Some(3),
        };
        let json = serde_json::to_string(&target).unwrap();
        let mut last = 0;
        for column in TargetRow::COLUMNS {
            let pos = json.find(&format!("\"{column}\"")).unwrap();
            assert!(pos >= last, "column {column} out of order");
            last = pos;
        }
    }
}
