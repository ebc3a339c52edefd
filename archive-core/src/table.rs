use std::fmt;

use chrono::{DateTime, Utc};
use polars::prelude::*;

use crate::{error::ArchiveError, model::TimeSeriesBlock, variable::Variable};

pub const DATE_COLUMN: &str = "date";

/// A `date` column (UTC datetimes) followed by one `f64` column per
/// variable, in request order.
#[derive(Debug, Clone)]
pub struct Table {
    frame: DataFrame,
}

impl Table {
    /// Bind each series of `block` to the name at the same position in
    /// `variables`.
    ///
    /// Fails when the list and the block disagree in count or order, or when
    /// a series is not exactly as long as the block's time range.
    pub fn assemble<V: Variable>(
        block: &TimeSeriesBlock<V>,
        variables: &[V],
    ) -> Result<Self, ArchiveError> {
        let rows = block.sample_count()?;

        if variables.len() != block.len() {
            return Err(ArchiveError::VariableCountMismatch {
                expected: variables.len(),
                found: block.len(),
            });
        }

        let mut columns = Vec::with_capacity(variables.len() + 1);
        for (position, expected) in variables.iter().enumerate() {
            let series = block
                .variable(position)
                .ok_or(ArchiveError::VariableCountMismatch {
                    expected: variables.len(),
                    found: position,
                })?;

            if series.variable != *expected {
                return Err(ArchiveError::VariableOrderMismatch {
                    position,
                    expected: expected.as_str(),
                    found: series.variable.as_str(),
                });
            }

            if series.values.len() != rows {
                return Err(ArchiveError::SeriesLengthMismatch {
                    variable: expected.as_str(),
                    expected: rows,
                    found: series.values.len(),
                });
            }

            columns.push(Column::new(expected.as_str().into(), series.values.as_slice()));
        }

        let millis: Vec<i64> = block
            .date_range()?
            .iter()
            .map(DateTime::timestamp_millis)
            .collect();
        let dates = Int64Chunked::from_vec(DATE_COLUMN.into(), millis)
            .into_datetime(TimeUnit::Milliseconds, Some("UTC".into()))
            .into_series()
            .into_column();
        columns.insert(0, dates);

        Ok(Self {
            frame: DataFrame::new(columns)?,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Values of the variable column `name`.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        if name == DATE_COLUMN {
            return None;
        }
        self.frame
            .column(name)
            .ok()?
            .as_materialized_series()
            .f64()
            .ok()?
            .cont_slice()
            .ok()
    }

    pub fn dates(&self) -> Result<Vec<DateTime<Utc>>, ArchiveError> {
        let millis = self
            .frame
            .column(DATE_COLUMN)?
            .as_materialized_series()
            .cast(&DataType::Int64)?;

        millis
            .i64()?
            .into_no_null_iter()
            .map(|ms| DateTime::from_timestamp_millis(ms).ok_or(ArchiveError::InvalidTimestamp(ms)))
            .collect()
    }

    /// All column names, `date` first.
    pub fn column_names(&self) -> Vec<&str> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect()
    }

    pub fn num_rows(&self) -> usize {
        self.frame.height()
    }

    /// Column count including `date`.
    pub fn num_columns(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.frame.equals_missing(&other.frame)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::VariableSeries,
        variable::{DailyVariable, HourlyVariable},
    };

    fn block(
        start: i64,
        end: i64,
        series: Vec<(HourlyVariable, Vec<f64>)>,
    ) -> TimeSeriesBlock<HourlyVariable> {
        TimeSeriesBlock {
            start,
            end,
            interval: 3_600,
            series: series
                .into_iter()
                .map(|(variable, values)| VariableSeries { variable, values })
                .collect(),
        }
    }

    #[test]
    fn columns_match_series_by_position() {
        use HourlyVariable::*;
        let block = block(
            0,
            3 * 3_600,
            vec![
                (Temperature2m, vec![1.0, 2.0, 3.0]),
                (CloudCover, vec![10.0, 20.0, 30.0]),
            ],
        );

        let table = Table::assemble(&block, &[Temperature2m, CloudCover]).unwrap();

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.column_names(), vec!["date", "temperature_2m", "cloud_cover"]);
        for (position, variable) in [Temperature2m, CloudCover].iter().enumerate() {
            assert_eq!(
                table.column(variable.as_str()).unwrap(),
                block.variable(position).unwrap().values.as_slice()
            );
        }
        assert_eq!(table.dates().unwrap()[1].timestamp(), 3_600);
    }

    #[test]
    fn frame_has_utc_datetime_and_float_columns() {
        let block = block(0, 3_600, vec![(HourlyVariable::Rain, vec![0.5])]);
        let table = Table::assemble(&block, &[HourlyVariable::Rain]).unwrap();

        let dtypes = table.frame().dtypes();
        assert_eq!(
            dtypes[0],
            DataType::Datetime(TimeUnit::Milliseconds, Some("UTC".into()))
        );
        assert_eq!(dtypes[1], DataType::Float64);
        assert!(table.column("date").is_none());
        assert!(table.column("snowfall").is_none());
    }

    #[test]
    fn row_count_is_ceiling_of_range() {
        let block = block(0, 2 * 3_600 + 1, vec![(HourlyVariable::Rain, vec![0.0; 3])]);
        let table = Table::assemble(&block, &[HourlyVariable::Rain]).unwrap();
        assert_eq!(table.num_rows(), 3);
    }

    #[test]
    fn empty_range_gives_headers_without_rows() {
        let block = block(
            1_000,
            1_000,
            vec![
                (HourlyVariable::Temperature2m, Vec::new()),
                (HourlyVariable::Rain, Vec::new()),
            ],
        );

        let table =
            Table::assemble(&block, &[HourlyVariable::Temperature2m, HourlyVariable::Rain]).unwrap();

        assert!(table.is_empty());
        assert_eq!(table.column_names(), vec!["date", "temperature_2m", "rain"]);
        assert_eq!(table.frame().column("rain").unwrap().len(), 0);
        assert!(table.dates().unwrap().is_empty());
    }

    #[test]
    fn missing_values_stay_nan() {
        let block = block(0, 2 * 3_600, vec![(HourlyVariable::Rain, vec![1.0, f64::NAN])]);
        let table = Table::assemble(&block, &[HourlyVariable::Rain]).unwrap();

        let rain = table.column("rain").unwrap();
        assert_eq!(rain[0], 1.0);
        assert!(rain[1].is_nan());
    }

    #[test]
    fn reordered_names_are_rejected() {
        use HourlyVariable::*;
        let block = block(
            0,
            3_600,
            vec![(Temperature2m, vec![1.0]), (CloudCover, vec![2.0])],
        );

        let err = Table::assemble(&block, &[CloudCover, Temperature2m]).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::VariableOrderMismatch {
                position: 0,
                expected: "cloud_cover",
                found: "temperature_2m",
            }
        ));
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let block = block(0, 3_600, vec![(HourlyVariable::Rain, vec![1.0])]);
        let err =
            Table::assemble(&block, &[HourlyVariable::Rain, HourlyVariable::Snowfall]).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::VariableCountMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn short_or_long_series_are_rejected() {
        let short = block(0, 3 * 3_600, vec![(HourlyVariable::Rain, vec![1.0, 2.0])]);
        let err = Table::assemble(&short, &[HourlyVariable::Rain]).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::SeriesLengthMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));

        let long = block(0, 3_600, vec![(HourlyVariable::Rain, vec![1.0, 2.0])]);
        assert!(Table::assemble(&long, &[HourlyVariable::Rain]).is_err());
    }

    #[test]
    fn daily_blocks_step_by_day() {
        let block = TimeSeriesBlock {
            start: 1_262_332_800,
            end: 1_262_332_800 + 2 * 86_400,
            interval: 86_400,
            series: vec![VariableSeries {
                variable: DailyVariable::RainSum,
                values: vec![0.1, 0.0],
            }],
        };

        let table = Table::assemble(&block, &[DailyVariable::RainSum]).unwrap();
        let dates = table.dates().unwrap();
        assert_eq!(dates[0].to_rfc3339(), "2010-01-01T08:00:00+00:00");
        assert_eq!(dates[1] - dates[0], chrono::Duration::days(1));
    }

    #[test]
    fn renders_through_the_frame() {
        let block = block(
            1_262_332_800,
            1_262_332_800 + 3 * 3_600,
            vec![(HourlyVariable::Temperature2m, vec![31.5, 30.25, f64::NAN])],
        );
        let text = Table::assemble(&block, &[HourlyVariable::Temperature2m])
            .unwrap()
            .to_string();

        assert!(text.starts_with("shape: (3, 2)"));
        assert!(text.contains("temperature_2m"));
        assert!(text.contains("2010-01-01 08:00:00 UTC"));
        assert!(text.contains("30.25"));
        assert!(text.contains("NaN"));
    }

    #[test]
    fn long_tables_are_elided() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let block = block(0, 100 * 3_600, vec![(HourlyVariable::Rain, values)]);
        let text = Table::assemble(&block, &[HourlyVariable::Rain])
            .unwrap()
            .to_string();

        assert!(text.starts_with("shape: (100, 2)"));
        assert!(text.contains('…'));
        assert!(!text.contains("1970-01-02 12:00:00"));
    }
}
