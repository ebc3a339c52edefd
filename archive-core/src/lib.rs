//! Core library for the `weather-archive` CLI.
//!
//! This crate defines:
//! - Typed queries against the Open-Meteo archive API
//! - A layered transport (HTTP, retry with backoff, persistent cache)
//! - Decoding of hourly and daily response blocks
//! - Assembly of hourly and daily tables as polars `DataFrame`s
//!
//! It is used by `archive-cli`, but the transport is injected, so the whole
//! fetch-and-shape pipeline can run against any [`Transport`].

pub mod client;
pub mod config;
pub mod decode;
pub mod display;
pub mod error;
pub mod model;
pub mod query;
pub mod report;
pub mod table;
pub mod transport;
pub mod variable;

pub use client::{ArchiveClient, DEFAULT_ENDPOINT};
pub use config::{CacheConfig, Config, HttpConfig};
pub use error::ArchiveError;
pub use model::{LocationMetadata, Response, TimeSeriesBlock, VariableSeries};
pub use query::{PrecipitationUnit, Query, TemperatureUnit, WindSpeedUnit};
pub use report::Report;
pub use table::Table;
pub use transport::{ArchiveRequest, Transport, transport_from_config};
pub use variable::{Cadence, DailyVariable, HourlyVariable, Variable};
