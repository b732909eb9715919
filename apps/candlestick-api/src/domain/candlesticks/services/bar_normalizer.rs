//! Bar Normalizer
//!
//! Maps a provider's [`RawSeries`] onto chart-ready [`NormalizedBar`]s.
//!
//! Steps, per series:
//! 1. Materialize the timestamp index as a column.
//! 2. Fold every column label to lowercase in a lookup table.
//! 3. Select the timestamp plus `open`, `high`, `low`, `close`; everything
//!    else (volume, dividends, splits) is dropped.
//! 4. Convert each timestamp to whole Unix seconds.
//!
//! One output record per input row, in input order.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::domain::candlesticks::errors::BarError;
use crate::domain::candlesticks::value_objects::{NormalizedBar, RawBar, RawSeries};

/// Labels accepted for the timestamp column, in lookup priority order.
///
/// Providers name it `Datetime` for intraday intervals and `Date` for daily
/// and coarser ones.
const TIMESTAMP_LABELS: [&str; 4] = ["datetime", "date", "timestamp", "time"];

/// Canonical name reported when no timestamp column is found.
const TIMESTAMP_COLUMN: &str = "datetime";

const OPEN: &str = "open";
const HIGH: &str = "high";
const LOW: &str = "low";
const CLOSE: &str = "close";

/// Where a column lives once the index has been materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRef {
    /// The series index.
    Index,
    /// Position within [`RawBar::values`].
    Value(usize),
}

/// Case-insensitive label lookup over a series schema.
struct ColumnTable {
    columns: HashMap<String, ColumnRef>,
}

impl ColumnTable {
    fn from_series(series: &RawSeries) -> Self {
        let mut columns = HashMap::with_capacity(series.columns.len() + 1);
        columns.insert(series.index_label.to_lowercase(), ColumnRef::Index);

        // First occurrence wins when two labels fold to the same name.
        for (position, label) in series.columns.iter().enumerate() {
            columns
                .entry(label.to_lowercase())
                .or_insert(ColumnRef::Value(position));
        }

        Self { columns }
    }

    fn timestamp(&self) -> Result<(), BarError> {
        let found = TIMESTAMP_LABELS
            .iter()
            .any(|label| self.columns.get(*label) == Some(&ColumnRef::Index));

        if found {
            Ok(())
        } else {
            Err(BarError::schema_mismatch(TIMESTAMP_COLUMN))
        }
    }

    fn value(&self, name: &'static str) -> Result<PriceColumn, BarError> {
        match self.columns.get(name) {
            Some(ColumnRef::Value(position)) => Ok(PriceColumn {
                name,
                position: *position,
            }),
            _ => Err(BarError::schema_mismatch(name)),
        }
    }
}

/// A selected price column.
#[derive(Debug, Clone, Copy)]
struct PriceColumn {
    name: &'static str,
    position: usize,
}

impl PriceColumn {
    fn read(self, row: &RawBar) -> Result<f64, BarError> {
        row.values
            .get(self.position)
            .copied()
            .ok_or_else(|| BarError::schema_mismatch(self.name))
    }
}

/// Converts provider price history into chart records.
#[derive(Debug, Clone, Copy, Default)]
pub struct BarNormalizer;

impl BarNormalizer {
    /// Normalize a raw series.
    ///
    /// An empty series yields an empty vector regardless of its schema.
    ///
    /// # Errors
    ///
    /// Returns [`BarError::SchemaMismatch`] if the timestamp or any of the
    /// `open`/`high`/`low`/`close` columns is missing, or a row is too short
    /// to hold one of them. No partial output is returned.
    pub fn normalize(series: &RawSeries) -> Result<Vec<NormalizedBar>, BarError> {
        if series.is_empty() {
            return Ok(Vec::new());
        }

        let table = ColumnTable::from_series(series);
        table.timestamp()?;
        let open = table.value(OPEN)?;
        let high = table.value(HIGH)?;
        let low = table.value(LOW)?;
        let close = table.value(CLOSE)?;

        series
            .rows
            .iter()
            .map(|row| {
                Ok(NormalizedBar {
                    time: to_unix_seconds(row.index, series.utc_offset_secs),
                    open: open.read(row)?,
                    high: high.read(row)?,
                    low: low.read(row)?,
                    close: close.read(row)?,
                })
            })
            .collect()
    }
}

/// Whole seconds since the epoch for a naive timestamp at the given offset.
fn to_unix_seconds(timestamp: NaiveDateTime, utc_offset_secs: Option<i32>) -> i64 {
    timestamp.and_utc().timestamp() - i64::from(utc_offset_secs.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_case::test_case;

    /// 2024-01-02T09:30:00 read as UTC.
    const REFERENCE_EPOCH: i64 = 1_704_187_800;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn series(index_label: &str, columns: &[&str]) -> RawSeries {
        let mut series = RawSeries::new(index_label, columns.to_vec());
        series.push(at(9, 30, 0), vec![100.0, 101.0, 99.0, 100.5, 1000.0]);
        series.push(at(9, 31, 0), vec![100.5, 102.0, 100.0, 101.8, 1200.0]);
        series
    }

    #[test]
    fn end_to_end_drops_volume_and_keeps_order() {
        let raw = series("datetime", &["open", "high", "low", "close", "volume"]);

        let bars = BarNormalizer::normalize(&raw).unwrap();

        assert_eq!(
            bars,
            vec![
                NormalizedBar {
                    time: REFERENCE_EPOCH,
                    open: 100.0,
                    high: 101.0,
                    low: 99.0,
                    close: 100.5,
                },
                NormalizedBar {
                    time: REFERENCE_EPOCH + 60,
                    open: 100.5,
                    high: 102.0,
                    low: 100.0,
                    close: 101.8,
                },
            ]
        );
    }

    #[test_case("Datetime", &["Open", "High", "Low", "Close", "Volume"] ; "mixed case")]
    #[test_case("DATETIME", &["OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"] ; "upper case")]
    #[test_case("Date", &["Open", "High", "Low", "Close", "Volume"] ; "daily index label")]
    #[test_case("Timestamp", &["open", "High", "low", "Close", "Volume"] ; "timestamp label")]
    fn label_case_does_not_change_output(index_label: &str, columns: &[&str]) {
        let lowercase = series("datetime", &["open", "high", "low", "close", "volume"]);
        let variant = series(index_label, columns);

        assert_eq!(
            BarNormalizer::normalize(&variant).unwrap(),
            BarNormalizer::normalize(&lowercase).unwrap()
        );
    }

    #[test]
    fn columns_are_selected_by_label_not_position() {
        let mut raw = RawSeries::new(
            "Datetime",
            vec!["Volume", "Close", "Dividends", "Low", "High", "Open"],
        );
        raw.push(at(9, 30, 0), vec![1000.0, 100.5, 0.0, 99.0, 101.0, 100.0]);

        let bars = BarNormalizer::normalize(&raw).unwrap();

        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 101.0);
        assert_eq!(bars[0].low, 99.0);
        assert_eq!(bars[0].close, 100.5);
    }

    #[test]
    fn reference_timestamp_without_offset() {
        let raw = series("Datetime", &["Open", "High", "Low", "Close", "Volume"]);
        let bars = BarNormalizer::normalize(&raw).unwrap();
        assert_eq!(bars[0].time, REFERENCE_EPOCH);
    }

    #[test]
    fn reference_timestamp_with_exchange_offset() {
        // New York in January is UTC-5.
        let raw = series("Datetime", &["Open", "High", "Low", "Close", "Volume"])
            .with_utc_offset(-18_000);

        let bars = BarNormalizer::normalize(&raw).unwrap();

        assert_eq!(bars[0].time, REFERENCE_EPOCH + 18_000);
        assert_eq!(bars[1].time, REFERENCE_EPOCH + 18_060);
    }

    #[test]
    fn sub_second_precision_is_truncated() {
        let mut raw = RawSeries::new("Datetime", vec!["Open", "High", "Low", "Close"]);
        let index = at(9, 30, 0) + chrono::Duration::milliseconds(999);
        raw.push(index, vec![1.0, 1.0, 1.0, 1.0]);

        let bars = BarNormalizer::normalize(&raw).unwrap();
        assert_eq!(bars[0].time, REFERENCE_EPOCH);
    }

    #[test]
    fn duplicate_timestamps_pass_through() {
        let mut raw = RawSeries::new("Datetime", vec!["Open", "High", "Low", "Close"]);
        raw.push(at(9, 30, 0), vec![1.0, 1.0, 1.0, 1.0]);
        raw.push(at(9, 30, 0), vec![2.0, 2.0, 2.0, 2.0]);

        let bars = BarNormalizer::normalize(&raw).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].time, bars[1].time);
        assert_eq!(bars[1].open, 2.0);
    }

    #[test]
    fn empty_series_is_not_an_error() {
        assert!(BarNormalizer::normalize(&RawSeries::empty()).unwrap().is_empty());

        let schema_only = RawSeries::new("Datetime", vec!["Open", "High", "Low", "Close"]);
        assert!(BarNormalizer::normalize(&schema_only).unwrap().is_empty());
    }

    #[test_case("close" ; "close")]
    #[test_case("open" ; "open")]
    #[test_case("high" ; "high")]
    #[test_case("low" ; "low")]
    fn missing_price_column_is_schema_mismatch(missing: &str) {
        let columns: Vec<&str> = ["Open", "High", "Low", "Close", "Volume"]
            .into_iter()
            .filter(|label| label.to_lowercase() != missing)
            .collect();
        let mut raw = RawSeries::new("Datetime", columns);
        raw.push(at(9, 30, 0), vec![1.0, 1.0, 1.0, 1.0]);

        let err = BarNormalizer::normalize(&raw).unwrap_err();
        assert_eq!(err, BarError::schema_mismatch(missing));
    }

    #[test]
    fn unknown_index_label_is_schema_mismatch() {
        let mut raw = RawSeries::new("Period", vec!["Open", "High", "Low", "Close"]);
        raw.push(at(9, 30, 0), vec![1.0, 1.0, 1.0, 1.0]);

        let err = BarNormalizer::normalize(&raw).unwrap_err();
        assert_eq!(err, BarError::schema_mismatch("datetime"));
    }

    #[test]
    fn value_column_named_like_a_timestamp_is_not_the_index() {
        let mut raw = RawSeries::new("Period", vec!["Date", "Open", "High", "Low", "Close"]);
        raw.push(at(9, 30, 0), vec![0.0, 1.0, 1.0, 1.0, 1.0]);

        assert!(matches!(
            BarNormalizer::normalize(&raw),
            Err(BarError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn short_row_fails_without_partial_output() {
        let mut raw = RawSeries::new("Datetime", vec!["Open", "High", "Low", "Close"]);
        raw.push(at(9, 30, 0), vec![1.0, 1.0, 1.0, 1.0]);
        raw.push(at(9, 31, 0), vec![1.0, 1.0, 1.0]);

        let err = BarNormalizer::normalize(&raw).unwrap_err();
        assert_eq!(err, BarError::schema_mismatch("close"));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn one_bar_per_row_in_input_order(
                steps in proptest::collection::vec((0_i64..3_600, 1.0_f64..1_000.0), 0..64)
            ) {
                let mut raw = RawSeries::new("Datetime", vec!["Open", "High", "Low", "Close", "Volume"]);
                let mut index = at(0, 0, 0);
                for (step, price) in &steps {
                    index += chrono::Duration::seconds(*step);
                    raw.push(index, vec![*price, price + 1.0, price - 0.5, *price, 10.0]);
                }

                let bars = BarNormalizer::normalize(&raw).unwrap();

                prop_assert_eq!(bars.len(), raw.len());
                for (bar, row) in bars.iter().zip(&raw.rows) {
                    prop_assert_eq!(bar.time, row.index.and_utc().timestamp());
                    prop_assert_eq!(bar.open, row.values[0]);
                    prop_assert_eq!(bar.close, row.values[3]);
                }
                prop_assert!(bars.windows(2).all(|pair| pair[0].time <= pair[1].time));
            }
        }
    }
}
