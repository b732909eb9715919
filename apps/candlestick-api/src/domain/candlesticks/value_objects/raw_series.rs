//! Raw Price History
//!
//! Tabular price history as a provider hands it over: an index of
//! timestamps plus numeric value columns whose labels are chosen by the
//! provider (`Open` vs `open`, `Datetime` vs `Date`).

use chrono::NaiveDateTime;

/// One provider row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    /// Exchange-local timestamp of the bar (the series index).
    pub index: NaiveDateTime,
    /// Column values, positionally aligned with [`RawSeries::columns`].
    pub values: Vec<f64>,
}

impl RawBar {
    /// Create a new row.
    #[must_use]
    pub const fn new(index: NaiveDateTime, values: Vec<f64>) -> Self {
        Self { index, values }
    }
}

/// Price history for one symbol, in provider order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSeries {
    /// Label of the timestamp index (e.g. `Datetime` or `Date`).
    pub index_label: String,
    /// Value column labels, as named by the provider.
    pub columns: Vec<String>,
    /// Offset of the index timestamps from UTC, in seconds east of UTC.
    ///
    /// `None` means the timestamps are interpreted as UTC.
    pub utc_offset_secs: Option<i32>,
    /// Rows in chronological order.
    pub rows: Vec<RawBar>,
}

impl RawSeries {
    /// Create an empty series with the given index and column labels.
    #[must_use]
    pub fn new<S: Into<String>>(index_label: impl Into<String>, columns: Vec<S>) -> Self {
        Self {
            index_label: index_label.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            utc_offset_secs: None,
            rows: Vec::new(),
        }
    }

    /// A series with no schema and no rows (the provider had nothing).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the UTC offset of the index timestamps.
    #[must_use]
    pub fn with_utc_offset(mut self, offset_secs: i32) -> Self {
        self.utc_offset_secs = Some(offset_secs);
        self
    }

    /// Append a row.
    pub fn push(&mut self, index: NaiveDateTime, values: Vec<f64>) {
        self.rows.push(RawBar::new(index, values));
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn empty_series_has_no_schema() {
        let series = RawSeries::empty();
        assert!(series.is_empty());
        assert!(series.columns.is_empty());
        assert!(series.utc_offset_secs.is_none());
    }

    #[test]
    fn push_keeps_insertion_order() {
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let t1 = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 31, 0)
            .unwrap();

        let mut series = RawSeries::new("Datetime", vec!["Open", "Close"]).with_utc_offset(-18_000);
        series.push(t0, vec![1.0, 2.0]);
        series.push(t1, vec![3.0, 4.0]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.rows[0].index, t0);
        assert_eq!(series.rows[1].values, vec![3.0, 4.0]);
        assert_eq!(series.utc_offset_secs, Some(-18_000));
    }
}
