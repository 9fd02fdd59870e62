use super::pipeline::Transform;
use model::records::row::{SourceRow, TargetRow};

/// Derives `new_column` from `old_column`: a sentinel value is replaced by a
/// fixed value, anything else (including NULL) is copied verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentinelReplace {
    sentinel: String,
    replacement: String,
}

impl SentinelReplace {
    pub fn new(sentinel: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            sentinel: sentinel.into(),
            replacement: replacement.into(),
        }
    }
}

impl Default for SentinelReplace {
    fn default() -> Self {
        Self::new("something", "new_something")
    }
}

impl Transform<SourceRow, TargetRow> for SentinelReplace {
    fn apply(&self, row: SourceRow) -> TargetRow {
        let new_column = match row.old_column.as_deref() {
            Some(value) if value == self.sentinel => Some(self.replacement.clone()),
            _ => row.old_column.clone(),
        };

        TargetRow {
            id: row.id,
            old_column: row.old_column,
            new_column,
            time_stamp: row.time_stamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn row(id: i64, old: Option<&str>, ts: i64) -> SourceRow {
        SourceRow {
            id,
            old_column: old.map(str::to_string),
            time_stamp: Some(ts),
        }
    }

    #[test]
    fn replaces_sentinel() {
        let out = SentinelReplace::default().apply(row(1, Some("something"), 5));
        assert_eq!(out.old_column.as_deref(), Some("something"));
        assert_eq!(out.new_column.as_deref(), Some("new_something"));
        assert_eq!(out.time_stamp, Some(5));
    }

    #[test]
    fn copies_other_values_verbatim() {
        let t = SentinelReplace::default();
        assert_eq!(t.apply(row(1, Some("other"), 5)).new_column.as_deref(), Some("other"));
        assert_eq!(t.apply(row(2, Some("Something"), 5)).new_column.as_deref(), Some("Something"));
        assert_eq!(t.apply(row(3, None, 5)).new_column, None);
    }

    #[test]
    fn honours_configured_values() {
        let t = SentinelReplace::new("N/A", "unknown");
        assert_eq!(t.apply(row(1, Some("N/A"), 1)).new_column.as_deref(), Some("unknown"));
        assert_eq!(t.apply(row(2, Some("something"), 1)).new_column.as_deref(), Some("something"));
    }

    #[test]
    fn output_is_independent_of_order() {
        let t = SentinelReplace::default();
        let rows = vec![
            row(1, Some("something"), 5),
            row(2, Some("a"), 10),
            row(3, None, 15),
            row(4, Some("something"), 20),
        ];

        let forward = rows.iter().cloned().map(|r| t.apply(r)).collect::<HashSet<_>>();
        let reversed = rows.iter().rev().cloned().map(|r| t.apply(r)).collect::<HashSet<_>>();
        assert_eq!(forward, reversed);

        // Each output depends only on its own input.
        for r in &rows {
            let alone = t.apply(r.clone());
            assert!(forward.contains(&alone));
        }
    }
}
