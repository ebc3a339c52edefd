//! Typed archive variables.
//!
//! Each requestable quantity is an enum variant carrying its API wire name, so
//! the list a [`Query`](crate::Query) requests is the same typed list used to
//! label decoded series and table columns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Time resolution of a response block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    Hourly,
    Daily,
}

impl Cadence {
    /// Query parameter and response key for this cadence.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Hourly => "hourly",
            Cadence::Daily => "daily",
        }
    }

    /// Nominal spacing between consecutive samples.
    pub fn interval_seconds(&self) -> i64 {
        match self {
            Cadence::Hourly => 3_600,
            Cadence::Daily => 86_400,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A quantity that can be requested for one cadence.
pub trait Variable: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    const CADENCE: Cadence;

    /// Name used in the request and in the response payload.
    fn as_str(&self) -> &'static str;

    fn all() -> &'static [Self];

    fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|v| v.as_str() == name)
    }
}

macro_rules! archive_variables {
    (
        $(#[$meta:meta])*
        $name:ident, $cadence:expr, {
            $($variant:ident => $wire:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $($variant,)+
        }

        impl Variable for $name {
            const CADENCE: Cadence = $cadence;

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            fn all() -> &'static [Self] {
                &[$($name::$variant,)+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }

        impl TryFrom<&str> for $name {
            type Error = String;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                <$name as Variable>::parse(value).ok_or_else(|| {
                    format!("Unknown {} variable '{value}'", <$name as Variable>::CADENCE)
                })
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::try_from(value.as_str())
            }
        }
    };
}

archive_variables! {
    /// Variables available at hourly resolution.
    HourlyVariable, Cadence::Hourly, {
        Temperature2m => "temperature_2m",
        RelativeHumidity2m => "relative_humidity_2m",
        DewPoint2m => "dew_point_2m",
        ApparentTemperature => "apparent_temperature",
        Precipitation => "precipitation",
        Rain => "rain",
        Snowfall => "snowfall",
        SnowDepth => "snow_depth",
        WeatherCode => "weather_code",
        PressureMsl => "pressure_msl",
        SurfacePressure => "surface_pressure",
        CloudCover => "cloud_cover",
        CloudCoverLow => "cloud_cover_low",
        CloudCoverMid => "cloud_cover_mid",
        CloudCoverHigh => "cloud_cover_high",
        Et0FaoEvapotranspiration => "et0_fao_evapotranspiration",
        VapourPressureDeficit => "vapour_pressure_deficit",
        WindSpeed10m => "wind_speed_10m",
        WindSpeed100m => "wind_speed_100m",
        WindDirection10m => "wind_direction_10m",
        WindDirection100m => "wind_direction_100m",
        WindGusts10m => "wind_gusts_10m",
        ShortwaveRadiation => "shortwave_radiation",
        DirectRadiation => "direct_radiation",
        DiffuseRadiation => "diffuse_radiation",
        DirectNormalIrradiance => "direct_normal_irradiance",
        GlobalTiltedIrradiance => "global_tilted_irradiance",
        TerrestrialRadiation => "terrestrial_radiation",
        SunshineDuration => "sunshine_duration",
        IsDay => "is_day",
    }
}

archive_variables! {
    /// Variables available at daily resolution.
    DailyVariable, Cadence::Daily, {
        WeatherCode => "weather_code",
        Temperature2mMax => "temperature_2m_max",
        Temperature2mMin => "temperature_2m_min",
        Temperature2mMean => "temperature_2m_mean",
        ApparentTemperatureMax => "apparent_temperature_max",
        ApparentTemperatureMin => "apparent_temperature_min",
        ApparentTemperatureMean => "apparent_temperature_mean",
        Sunrise => "sunrise",
        Sunset => "sunset",
        DaylightDuration => "daylight_duration",
        SunshineDuration => "sunshine_duration",
        PrecipitationSum => "precipitation_sum",
        RainSum => "rain_sum",
        SnowfallSum => "snowfall_sum",
        PrecipitationHours => "precipitation_hours",
        WindSpeed10mMax => "wind_speed_10m_max",
        WindGusts10mMax => "wind_gusts_10m_max",
        WindDirection10mDominant => "wind_direction_10m_dominant",
        ShortwaveRadiationSum => "shortwave_radiation_sum",
        Et0FaoEvapotranspiration => "et0_fao_evapotranspiration",
    }
}
