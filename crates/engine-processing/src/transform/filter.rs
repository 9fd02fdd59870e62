use super::pipeline::Filter;
use model::{core::watermark::Watermark, records::Record};

/// Keeps records whose watermark is strictly greater than the last checkpoint.
/// Records with a NULL watermark are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatermarkFilter {
    threshold: Watermark,
}

impl WatermarkFilter {
    pub fn new(threshold: Watermark) -> Self {
        Self { threshold }
    }

    /// Lazily narrows `records` to the incremental slice.
    pub fn apply<R, I>(self, records: I) -> impl Iterator<Item = R>
    where
        R: Record,
        I: IntoIterator<Item = R>,
    {
        records.into_iter().filter(move |r| self.should_keep(r))
    }
}

impl<R: Record> Filter<R> for WatermarkFilter {
    fn should_keep(&self, record: &R) -> bool {
        Watermark::is_newer(record.watermark(), self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::records::row::SourceRow;

    fn row(id: i64, ts: Option<i64>) -> SourceRow {
        SourceRow {
            id,
            old_column: Some(format!("v{id}")),
            time_stamp: ts,
        }
    }

    #[test]
    fn keeps_only_strictly_newer_rows() {
        let filter = WatermarkFilter::new(Watermark::new(10));
        let rows = vec![row(1, Some(5)), row(2, Some(10)), row(3, Some(11)), row(4, Some(15))];

        let kept = filter.apply(rows).map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(kept, vec![3, 4]);
    }

    #[test]
    fn drops_null_watermarks() {
        let filter = WatermarkFilter::new(Watermark::ZERO);
        let rows = vec![row(1, None), row(2, Some(1))];

        let kept = filter.apply(rows).map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(kept, vec![2]);
    }

    #[test]
    fn does_not_touch_kept_records() {
        let filter = WatermarkFilter::new(Watermark::ZERO);
        let original = row(7, Some(3));

        let kept = filter.apply(vec![original.clone()]).collect::<Vec<_>>();
        assert_eq!(kept, vec![original]);
    }

    #[test]
    fn zero_threshold_selects_everything_positive() {
        let filter = WatermarkFilter::new(Watermark::ZERO);
        let rows = vec![row(1, Some(5)), row(2, Some(10)), row(3, Some(15))];
        assert_eq!(filter.apply(rows).count(), 3);
    }
}
