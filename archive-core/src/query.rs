use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    error::ArchiveError,
    variable::{DailyVariable, HourlyVariable, Variable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kmh,
    Ms,
    Mph,
    Kn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationUnit {
    #[default]
    Mm,
    Inch,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }
}

impl WindSpeedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindSpeedUnit::Kmh => "kmh",
            WindSpeedUnit::Ms => "ms",
            WindSpeedUnit::Mph => "mph",
            WindSpeedUnit::Kn => "kn",
        }
    }
}

impl PrecipitationUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipitationUnit::Mm => "mm",
            PrecipitationUnit::Inch => "inch",
        }
    }
}

/// One archive request: a single location, a date range and the ordered
/// variables to fetch at each cadence.
///
/// The order of `hourly` and `daily` is the column order of the resulting
/// tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub latitude: f64,
    pub longitude: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub hourly: Vec<HourlyVariable>,
    #[serde(default)]
    pub daily: Vec<DailyVariable>,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    #[serde(default)]
    pub wind_speed_unit: WindSpeedUnit,
    #[serde(default)]
    pub precipitation_unit: PrecipitationUnit,
    pub timezone: String,
}

impl Default for Query {
    /// Provo, 2010 through 2020, imperial units.
    fn default() -> Self {
        Self {
            latitude: 40.2338,
            longitude: 111.6585,
            start_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2020, 12, 31).unwrap_or_default(),
            hourly: vec![
                HourlyVariable::Temperature2m,
                HourlyVariable::CloudCover,
                HourlyVariable::ShortwaveRadiation,
                HourlyVariable::DirectNormalIrradiance,
                HourlyVariable::GlobalTiltedIrradiance,
            ],
            daily: vec![
                DailyVariable::WeatherCode,
                DailyVariable::Temperature2mMean,
                DailyVariable::Sunrise,
                DailyVariable::Sunset,
                DailyVariable::DaylightDuration,
                DailyVariable::SunshineDuration,
                DailyVariable::PrecipitationSum,
                DailyVariable::RainSum,
                DailyVariable::SnowfallSum,
                DailyVariable::ShortwaveRadiationSum,
            ],
            temperature_unit: TemperatureUnit::Fahrenheit,
            wind_speed_unit: WindSpeedUnit::Mph,
            precipitation_unit: PrecipitationUnit::Inch,
            timezone: "America/Los_Angeles".to_string(),
        }
    }
}

impl Query {
    /// Reject queries the API would refuse anyway, before touching the network.
    pub fn validate(&self) -> Result<(), ArchiveError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ArchiveError::InvalidQuery(format!(
                "latitude {} is outside -90..=90",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ArchiveError::InvalidQuery(format!(
                "longitude {} is outside -180..=180",
                self.longitude
            )));
        }
        if self.start_date > self.end_date {
            return Err(ArchiveError::InvalidQuery(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        if self.timezone.trim().is_empty() {
            return Err(ArchiveError::InvalidQuery("timezone must not be empty".to_string()));
        }
        check_unique(&self.hourly)?;
        check_unique(&self.daily)?;
        Ok(())
    }

    /// Ordered query parameters for the archive endpoint.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("latitude", self.latitude.to_string()),
            ("longitude", self.longitude.to_string()),
            ("start_date", self.start_date.format("%Y-%m-%d").to_string()),
            ("end_date", self.end_date.format("%Y-%m-%d").to_string()),
        ];

        if !self.hourly.is_empty() {
            params.push(("hourly", join_names(&self.hourly)));
        }
        if !self.daily.is_empty() {
            params.push(("daily", join_names(&self.daily)));
        }

        params.extend([
            ("temperature_unit", self.temperature_unit.as_str().to_string()),
            ("wind_speed_unit", self.wind_speed_unit.as_str().to_string()),
            ("precipitation_unit", self.precipitation_unit.as_str().to_string()),
            ("timezone", self.timezone.clone()),
            ("timeformat", "unixtime".to_string()),
        ]);

        params
    }
}

fn join_names<V: Variable>(variables: &[V]) -> String {
    variables.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(",")
}

fn check_unique<V: Variable + std::hash::Hash>(variables: &[V]) -> Result<(), ArchiveError> {
    let mut seen = HashSet::new();
    for v in variables {
        if !seen.insert(*v) {
            return Err(ArchiveError::InvalidQuery(format!(
                "{} variable '{v}' is requested more than once",
                V::CADENCE
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_is_valid() {
        let query = Query::default();
        query.validate().expect("default query must validate");
        assert_eq!(query.hourly.len(), 5);
        assert_eq!(query.daily.len(), 10);
    }

    #[test]
    fn params_keep_request_order() {
        let params = Query::default().to_params();
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        assert_eq!(get("latitude"), "40.2338");
        assert_eq!(get("start_date"), "2010-01-01");
        assert_eq!(get("end_date"), "2020-12-31");
        assert_eq!(
            get("hourly"),
            "temperature_2m,cloud_cover,shortwave_radiation,direct_normal_irradiance,global_tilted_irradiance"
        );
        assert!(get("daily").starts_with("weather_code,temperature_2m_mean,sunrise,sunset"));
        assert_eq!(get("temperature_unit"), "fahrenheit");
        assert_eq!(get("wind_speed_unit"), "mph");
        assert_eq!(get("precipitation_unit"), "inch");
        assert_eq!(get("timezone"), "America/Los_Angeles");
        assert_eq!(get("timeformat"), "unixtime");
    }

    #[test]
    fn empty_variable_lists_are_not_sent() {
        let query = Query {
            daily: Vec::new(),
            ..Query::default()
        };
        assert!(!query.to_params().iter().any(|(k, _)| *k == "daily"));
    }

    #[test]
    fn validate_rejects_out_of_range_coordinates() {
        let query = Query {
            latitude: 91.0,
            ..Query::default()
        };
        let err = query.validate().unwrap_err();
        assert!(err.to_string().contains("latitude"));

        let query = Query {
            longitude: -180.5,
            ..Query::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn validate_rejects_reversed_dates() {
        let query = Query {
            start_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            ..Query::default()
        };
        let err = query.validate().unwrap_err();
        assert!(err.to_string().contains("after end_date"));
    }

    #[test]
    fn validate_rejects_duplicate_variables() {
        let query = Query {
            hourly: vec![HourlyVariable::CloudCover, HourlyVariable::CloudCover],
            ..Query::default()
        };
        let err = query.validate().unwrap_err();
        assert!(err.to_string().contains("'cloud_cover' is requested more than once"));
    }

    #[test]
    fn units_deserialize_from_lowercase() {
        let unit: WindSpeedUnit = serde_json::from_str(r#""kn""#).unwrap();
        assert_eq!(unit, WindSpeedUnit::Kn);
        let unit: PrecipitationUnit = serde_json::from_str(r#""inch""#).unwrap();
        assert_eq!(unit, PrecipitationUnit::Inch);
    }
}
