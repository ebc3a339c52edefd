use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::ArchiveError,
    variable::{DailyVariable, HourlyVariable, Variable},
};

/// Location and timezone details the API resolved for the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMetadata {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub timezone: String,
    pub timezone_abbreviation: String,
    pub utc_offset_seconds: i32,
}

/// Decoded archive response for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub location: LocationMetadata,
    pub hourly: TimeSeriesBlock<HourlyVariable>,
    pub daily: TimeSeriesBlock<DailyVariable>,
}

/// Values of one variable, one per timestamp of the owning block.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSeries<V> {
    pub variable: V,
    pub values: Vec<f64>,
}

/// Same-cadence series sharing the time range `[start, end)` sampled every
/// `interval` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesBlock<V> {
    /// Unix seconds of the first sample.
    pub start: i64,
    /// Unix seconds one interval past the last sample.
    pub end: i64,
    pub interval: i64,
    pub series: Vec<VariableSeries<V>>,
}

impl<V: Variable> TimeSeriesBlock<V> {
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            interval: V::CADENCE.interval_seconds(),
            series: Vec::new(),
        }
    }

    /// Series at `position`, matching the position in the requested list.
    pub fn variable(&self, position: usize) -> Option<&VariableSeries<V>> {
        self.series.get(position)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of samples implied by the half-open range.
    pub fn sample_count(&self) -> Result<usize, ArchiveError> {
        if self.interval <= 0 {
            return Err(ArchiveError::InvalidInterval(self.interval));
        }
        if self.end <= self.start {
            return Ok(0);
        }
        let span = self
            .end
            .checked_sub(self.start)
            .ok_or(ArchiveError::InvalidTimestamp(self.end))?;
        let count = span / self.interval + i64::from(span % self.interval != 0);
        usize::try_from(count).map_err(|_| ArchiveError::InvalidTimestamp(self.end))
    }

    /// Timestamps `start, start + interval, ..` strictly before `end`, in UTC.
    pub fn date_range(&self) -> Result<Vec<DateTime<Utc>>, ArchiveError> {
        let count = self.sample_count()?;
        if count > 0 && DateTime::from_timestamp(self.end, 0).is_none() {
            return Err(ArchiveError::InvalidTimestamp(self.end));
        }

        (0..count as i64)
            .map(|i| {
                let ts = i
                    .checked_mul(self.interval)
                    .and_then(|offset| self.start.checked_add(offset))
                    .ok_or(ArchiveError::InvalidTimestamp(self.start))?;
                DateTime::from_timestamp(ts, 0).ok_or(ArchiveError::InvalidTimestamp(ts))
            })
            .collect()
    }
}
