use std::fmt;

use tracing::debug;

use crate::{
    error::ArchiveError,
    model::{LocationMetadata, Response},
    query::Query,
    table::Table,
};

/// Everything printed for one run, assembled before any output is written.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub location: LocationMetadata,
    pub hourly: Table,
    pub daily: Table,
}

impl Report {
    pub fn from_response(response: &Response, query: &Query) -> Result<Self, ArchiveError> {
        let hourly = Table::assemble(&response.hourly, &query.hourly)?;
        let daily = Table::assemble(&response.daily, &query.daily)?;

        debug!(
            hourly_rows = hourly.num_rows(),
            daily_rows = daily.num_rows(),
            "assembled report tables"
        );

        Ok(Self {
            location: response.location.clone(),
            hourly,
            daily,
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.location)?;
        writeln!(f, "{}", self.hourly)?;
        write!(f, "{}", self.daily)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{TimeSeriesBlock, VariableSeries},
        variable::{DailyVariable, HourlyVariable},
    };

    fn response(hourly_len: usize) -> Response {
        Response {
            location: LocationMetadata {
                latitude: 1.0,
                longitude: 2.0,
                elevation: 3.0,
                timezone: "GMT".to_string(),
                timezone_abbreviation: "GMT".to_string(),
                utc_offset_seconds: 0,
            },
            hourly: TimeSeriesBlock {
                start: 0,
                end: 2 * 3_600,
                interval: 3_600,
                series: vec![VariableSeries {
                    variable: HourlyVariable::Rain,
                    values: vec![0.0; hourly_len],
                }],
            },
            daily: TimeSeriesBlock {
                start: 0,
                end: 86_400,
                interval: 86_400,
                series: vec![VariableSeries {
                    variable: DailyVariable::RainSum,
                    values: vec![0.0],
                }],
            },
        }
    }

    fn query() -> Query {
        Query {
            hourly: vec![HourlyVariable::Rain],
            daily: vec![DailyVariable::RainSum],
            ..Query::default()
        }
    }

    #[test]
    fn prints_summary_then_hourly_then_daily() {
        let report = Report::from_response(&response(2), &query()).unwrap();
        let text = report.to_string();

        let summary = text.find("Coordinates").unwrap();
        let hourly = text.find("shape: (2, 2)").unwrap();
        let daily = text.find("shape: (1, 2)").unwrap();
        assert!(summary < hourly && hourly < daily);
        assert!(text[hourly..daily].contains("rain"));
        assert!(text[daily..].contains("rain_sum"));
    }

    #[test]
    fn malformed_hourly_block_produces_no_report() {
        let err = Report::from_response(&response(5), &query()).unwrap_err();
        assert!(matches!(err, ArchiveError::SeriesLengthMismatch { .. }));
    }
}
