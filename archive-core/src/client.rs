use tracing::info;

use crate::{
    decode::decode_response,
    error::ArchiveError,
    model::Response,
    query::Query,
    transport::{ArchiveRequest, Transport},
};

pub const DEFAULT_ENDPOINT: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Fetches and decodes archive data through an injected [`Transport`].
#[derive(Debug)]
pub struct ArchiveClient {
    endpoint: String,
    transport: Box<dyn Transport>,
}

impl ArchiveClient {
    pub fn new(endpoint: impl Into<String>, transport: Box<dyn Transport>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run one query: validate, fetch, decode. Either a complete response or
    /// an error; never partial data.
    pub async fn execute(&self, query: &Query) -> Result<Response, ArchiveError> {
        query.validate()?;

        let request = ArchiveRequest::new(self.endpoint.as_str(), query);
        info!(
            latitude = query.latitude,
            longitude = query.longitude,
            start = %query.start_date,
            end = %query.end_date,
            "fetching archive data"
        );

        let body = self.transport.execute(&request).await?;
        decode_response(&body, query)
    }
}
