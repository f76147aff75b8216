//! Base-URL resolution.
//!
//! # Design
//! The base URL comes from the first source that has a value, checked in a
//! fixed order: the `MATHJS_BASE_URL` environment variable, then the
//! instance, class and module overrides, then the public endpoint. There is
//! no merging between sources.
//!
//! The environment is reached only through an injected `EnvSource`, so
//! tests can resolve against an in-memory map instead of mutating the
//! process environment. A variable that is set but not valid UTF-8 fails
//! resolution instead of falling through to a lower-priority source.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;

use tracing::debug;

use crate::error::ApiError;

/// Environment variable that overrides every other source.
pub const BASE_URL_ENV: &str = "MATHJS_BASE_URL";

/// Public endpoint used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://api.mathjs.org/v4/";

/// Read access to environment variables.
pub trait EnvSource {
    /// Raw value of `key`, `None` when unset.
    fn var_os(&self, key: &str) -> Option<OsString>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

/// A fixed set of variables, for hermetic tests.
#[derive(Debug, Clone, Default)]
pub struct MapEnv(HashMap<String, OsString>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.with_os(key, OsString::from(value))
    }

    pub fn with_os(mut self, key: &str, value: OsString) -> Self {
        self.0.insert(key.to_string(), value);
        self
    }
}

impl EnvSource for MapEnv {
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.0.get(key).cloned()
    }
}

/// Reads `key` and rejects values that are not valid UTF-8.
fn read_env_strict(env: &dyn EnvSource, key: &str) -> Result<Option<String>, ApiError> {
    env.var_os(key).map_or(Ok(None), |raw| {
        raw.into_string()
            .map(Some)
            .map_err(|raw| ApiError::InvalidBaseUrl(format!("{key} is not valid UTF-8: {}", raw.to_string_lossy())))
    })
}

/// Overrides set at the test instance, test class and test module scopes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeOverrides {
    pub instance: Option<String>,
    pub class: Option<String>,
    pub module: Option<String>,
}

impl ScopeOverrides {
    pub fn instance(mut self, url: &str) -> Self {
        self.instance = Some(url.to_string());
        self
    }

    pub fn class(mut self, url: &str) -> Self {
        self.class = Some(url.to_string());
        self
    }

    pub fn module(mut self, url: &str) -> Self {
        self.module = Some(url.to_string());
        self
    }
}

/// Where a resolved base URL came from, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Env,
    Instance,
    Class,
    Module,
    Default,
}

impl ConfigSource {
    /// Lookup order used by `resolve_base_url`.
    pub const ORDER: [ConfigSource; 5] = [
        ConfigSource::Env,
        ConfigSource::Instance,
        ConfigSource::Class,
        ConfigSource::Module,
        ConfigSource::Default,
    ];

    fn lookup(self, env: &dyn EnvSource, scopes: &ScopeOverrides) -> Result<Option<String>, ApiError> {
        Ok(match self {
            ConfigSource::Env => read_env_strict(env, BASE_URL_ENV)?,
            ConfigSource::Instance => scopes.instance.clone(),
            ConfigSource::Class => scopes.class.clone(),
            ConfigSource::Module => scopes.module.clone(),
            ConfigSource::Default => Some(DEFAULT_BASE_URL.to_string()),
        })
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigSource::Env => BASE_URL_ENV,
            ConfigSource::Instance => "instance",
            ConfigSource::Class => "class",
            ConfigSource::Module => "module",
            ConfigSource::Default => "default",
        };
        f.write_str(name)
    }
}

/// A non-empty base URL, kept exactly as configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn new(url: &str) -> Result<Self, ApiError> {
        if url.trim().is_empty() {
            return Err(ApiError::InvalidBaseUrl(url.to_string()));
        }
        Ok(Self(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the base URL from the first source with a non-blank value.
///
/// # Errors
///
/// Returns `ApiError::InvalidBaseUrl` when `MATHJS_BASE_URL` is set but is
/// not valid UTF-8.
pub fn resolve_base_url(
    env: &dyn EnvSource,
    scopes: &ScopeOverrides,
) -> Result<(BaseUrl, ConfigSource), ApiError> {
    for source in ConfigSource::ORDER {
        let Some(value) = source.lookup(env, scopes)? else {
            continue;
        };
        if let Ok(url) = BaseUrl::new(&value) {
            debug!(%source, base_url = %url, "resolved mathjs base URL");
            return Ok((url, source));
        }
        debug!(%source, "ignoring blank base URL override");
    }
    Ok((BaseUrl(DEFAULT_BASE_URL.to_string()), ConfigSource::Default))
}
