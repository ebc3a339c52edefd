use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::ArchiveError,
    model::{LocationMetadata, Response, TimeSeriesBlock, VariableSeries},
    query::Query,
    variable::Variable,
};

#[derive(Debug, Deserialize)]
struct WireResponse {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    elevation: f64,
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    timezone_abbreviation: String,
    hourly: Option<WireBlock>,
    daily: Option<WireBlock>,
}

#[derive(Debug, Deserialize)]
struct WireBlock {
    time: Vec<i64>,
    #[serde(flatten)]
    series: HashMap<String, Vec<Option<f64>>>,
}

/// Error body returned by the API alongside a non-success status.
#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    pub reason: String,
}

/// Decode a JSON archive payload, labelling every series with the variable
/// it was requested as.
pub fn decode_response(body: &str, query: &Query) -> Result<Response, ArchiveError> {
    let wire: WireResponse = serde_json::from_str(body)?;

    let location = LocationMetadata {
        latitude: wire.latitude,
        longitude: wire.longitude,
        elevation: wire.elevation,
        timezone: wire.timezone,
        timezone_abbreviation: wire.timezone_abbreviation,
        utc_offset_seconds: wire.utc_offset_seconds,
    };

    Ok(Response {
        location,
        hourly: decode_block(wire.hourly, &query.hourly)?,
        daily: decode_block(wire.daily, &query.daily)?,
    })
}

fn decode_block<V: Variable>(
    raw: Option<WireBlock>,
    requested: &[V],
) -> Result<TimeSeriesBlock<V>, ArchiveError> {
    let cadence = V::CADENCE;

    let Some(mut raw) = raw else {
        if requested.is_empty() {
            return Ok(TimeSeriesBlock::empty());
        }
        return Err(ArchiveError::MissingBlock {
            cadence: cadence.as_str(),
            requested: requested.len(),
        });
    };

    let interval = cadence.interval_seconds();
    let start = raw.time.first().copied().unwrap_or_default();
    let end = i64::try_from(raw.time.len())
        .ok()
        .and_then(|len| len.checked_mul(interval))
        .and_then(|span| start.checked_add(span))
        .ok_or(ArchiveError::InvalidTimestamp(start))?;

    let series = requested
        .iter()
        .map(|variable| {
            let values = raw.series.remove(variable.as_str()).ok_or(
                ArchiveError::MissingVariable {
                    cadence: cadence.as_str(),
                    variable: variable.as_str(),
                },
            )?;
            Ok(VariableSeries {
                variable: *variable,
                values: values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
            })
        })
        .collect::<Result<Vec<_>, ArchiveError>>()?;

    if !raw.series.is_empty() {
        debug!(
            cadence = cadence.as_str(),
            extra = ?raw.series.keys().collect::<Vec<_>>(),
            "ignoring unrequested series in response"
        );
    }

    Ok(TimeSeriesBlock {
        start,
        end,
        interval,
        series,
    })
}
