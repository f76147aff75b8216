//! Blocking test client for the mathjs expression-evaluation HTTP API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern); `MathjsSession` glues the
//! client to a `Transport` for the conformance suite.
//!
//! # Design
//! - `MathjsClient` is stateless; it holds only the resolved base URL.
//! - The base URL is resolved once, from an injected environment plus
//!   instance/class/module overrides (see `config`).
//! - Any status outside 2xx is returned as `ApiError::HttpError`; nothing is
//!   retried.
//! - DTOs are defined independently from the mock-server crate; the
//!   conformance tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use client::MathjsClient;
pub use config::{
    resolve_base_url, BaseUrl, ConfigSource, EnvSource, MapEnv, ProcessEnv, ScopeOverrides, BASE_URL_ENV,
    DEFAULT_BASE_URL,
};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::MathjsSession;
pub use transport::{Transport, UreqTransport};
pub use types::{EvalRequest, EvalResponse, Precision};
