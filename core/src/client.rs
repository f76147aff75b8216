//! Stateless HTTP request builder and response parser for the mathjs API.
//!
//! # Design
//! `MathjsClient` holds only a `BaseUrl` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller (usually `MathjsSession`) executes the actual
//! HTTP round-trip in between.

use tracing::warn;
use url::form_urlencoded;

use crate::config::{resolve_base_url, BaseUrl, EnvSource, ScopeOverrides};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{EvalRequest, EvalResponse, Precision};

/// Synchronous, stateless client for the mathjs API.
#[derive(Debug, Clone)]
pub struct MathjsClient {
    base_url: BaseUrl,
}

impl MathjsClient {
    pub fn new(base_url: BaseUrl) -> Self {
        Self { base_url }
    }

    /// Build a client from the first configured base URL source.
    pub fn from_config(env: &dyn EnvSource, scopes: &ScopeOverrides) -> Result<Self, ApiError> {
        let (base_url, _) = resolve_base_url(env, scopes)?;
        Ok(Self::new(base_url))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `GET <base>?expr=<expr>[&precision=<p>]`, form-urlencoded.
    pub fn build_get(&self, expr: &str, precision: Option<&Precision>) -> HttpRequest {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("expr", expr);
        if let Some(precision) = precision {
            query.append_pair("precision", &precision.to_string());
        }
        self.build_get_raw(&query.finish())
    }

    /// `GET <base>?<query>` with `query` appended untouched.
    pub fn build_get_raw(&self, query: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}?{query}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// `POST <base>` with a JSON `{"expr": [...], "precision": ...}` body.
    pub fn build_post<S: AsRef<str>>(
        &self,
        exprs: &[S],
        precision: Option<&Precision>,
    ) -> Result<HttpRequest, ApiError> {
        let input = EvalRequest {
            expr: exprs.iter().map(|e| e.as_ref().to_string()).collect(),
            precision: precision.cloned(),
        };
        let body = serde_json::to_string(&input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: self.base_url.to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// `POST <base>` with a literal body and exactly the given headers.
    pub fn build_post_raw(&self, body: &str, headers: &[(&str, &str)]) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: self.base_url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: Some(body.to_string()),
        }
    }

    /// Raw body text of a successful response.
    pub fn parse_text(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response)?;
        Ok(response.body)
    }

    /// The `result` list of a successful POST response, in input order.
    pub fn parse_results(&self, response: HttpResponse) -> Result<Vec<String>, ApiError> {
        check_status(&response)?;
        let reply: EvalResponse =
            serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        match reply.result {
            Some(result) => Ok(result),
            None => Err(ApiError::Evaluation(reply.error.unwrap_or_default())),
        }
    }
}

/// Map any status outside 200..=299 to `ApiError::HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, body = %response.body, "mathjs request failed");
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
