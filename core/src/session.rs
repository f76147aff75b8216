//! Test-facing round-trip operations.
//!
//! # Design
//! `MathjsSession` pairs a `MathjsClient` with a `Transport` and offers one
//! method per kind of call the conformance suite makes. Each method is a
//! single stateless build, execute, parse sequence; any non-2xx status comes
//! back as `ApiError::HttpError`.

use crate::client::MathjsClient;
use crate::config::{EnvSource, ScopeOverrides};
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};
use crate::types::Precision;

#[derive(Debug, Clone)]
pub struct MathjsSession<T: Transport = UreqTransport> {
    client: MathjsClient,
    transport: T,
}

impl MathjsSession<UreqTransport> {
    /// Resolve the base URL once and talk to it over blocking HTTP.
    pub fn from_config(env: &dyn EnvSource, scopes: &ScopeOverrides) -> Result<Self, ApiError> {
        Ok(Self::new(MathjsClient::from_config(env, scopes)?, UreqTransport::new()))
    }
}

impl<T: Transport> MathjsSession<T> {
    pub fn new(client: MathjsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Evaluate one expression via GET and return the body text.
    pub fn get(&self, expr: &str, precision: Option<Precision>) -> Result<String, ApiError> {
        let request = self.client.build_get(expr, precision.as_ref());
        self.client.parse_text(self.transport.execute(&request)?)
    }

    /// GET with a pre-built query string.
    pub fn get_raw(&self, query: &str) -> Result<String, ApiError> {
        let request = self.client.build_get_raw(query);
        self.client.parse_text(self.transport.execute(&request)?)
    }

    /// Evaluate several expressions in one POST; results keep input order.
    pub fn post<S: AsRef<str>>(&self, exprs: &[S], precision: Option<Precision>) -> Result<Vec<String>, ApiError> {
        let request = self.client.build_post(exprs, precision.as_ref())?;
        self.client.parse_results(self.transport.execute(&request)?)
    }

    /// POST a literal body with exactly `headers` and return the body text.
    pub fn post_raw(&self, body: &str, headers: &[(&str, &str)]) -> Result<String, ApiError> {
        let request = self.client.build_post_raw(body, headers);
        self.client.parse_text(self.transport.execute(&request)?)
    }
}
