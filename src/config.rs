//! Service configuration: defaults, overridden by flags, overridden by environment.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const ENV_BIND: &str = "ADDRESS_JOURNEY_BIND";
pub const ENV_ADDRESS_SERVICE: &str = "ADDRESS_SERVICE_URL";
pub const ENV_SESSION_TTL: &str = "ADDRESS_JOURNEY_SESSION_TTL";
pub const ENV_SESSION_COOKIE: &str = "ADDRESS_JOURNEY_SESSION_COOKIE";
pub const ENV_REDIS_URL: &str = "ADDRESS_JOURNEY_REDIS_URL";
pub const ENV_COMMIT_POLICY: &str = "ADDRESS_JOURNEY_COMMIT_POLICY";
pub const ENV_LOOKUP_TIMEOUT: &str = "ADDRESS_JOURNEY_LOOKUP_TIMEOUT";

/// How concurrent commits on one session are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitPolicy {
  /// Whole-context replace; the last commit silently wins.
  LastWriteWins,
  /// Commit only if nobody committed since this request loaded the session.
  #[default]
  Optimistic,
}

impl FromStr for CommitPolicy {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "last-write-wins" | "lww" => Ok(CommitPolicy::LastWriteWins),
      "optimistic" => Ok(CommitPolicy::Optimistic),
      other => Err(ConfigError::Invalid {
        key: ENV_COMMIT_POLICY,
        value: other.to_string(),
      }),
    }
  }
}

impl fmt::Display for CommitPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CommitPolicy::LastWriteWins => write!(f, "last-write-wins"),
      CommitPolicy::Optimistic => write!(f, "optimistic"),
    }
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("invalid value `{value}` for {key}")]
  Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub bind: SocketAddr,
  pub address_service_url: String,
  pub session_ttl: Duration,
  pub session_cookie: String,
  /// In-memory sessions when `None`.
  pub redis_url: Option<String>,
  pub commit_policy: CommitPolicy,
  /// No timeout on the lookup call when `None`.
  pub lookup_timeout: Option<Duration>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
      address_service_url: "http://localhost:3001".to_string(),
      session_ttl: Duration::from_secs(3600),
      session_cookie: "address-journey.sid".to_string(),
      redis_url: None,
      commit_policy: CommitPolicy::Optimistic,
      lookup_timeout: None,
    }
  }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
  value
    .trim()
    .parse()
    .map_err(|_| ConfigError::Invalid { key, value })
}

impl Config {
  /// Overrides fields from `var` (usually `std::env::var(..).ok()`).
  pub fn apply_env<F>(mut self, var: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    if let Some(v) = var(ENV_BIND) {
      self.bind = parse(ENV_BIND, v)?;
    }
    if let Some(v) = var(ENV_ADDRESS_SERVICE) {
      self.address_service_url = v;
    }
    if let Some(v) = var(ENV_SESSION_TTL) {
      self.session_ttl = Duration::from_secs(parse(ENV_SESSION_TTL, v)?);
    }
    if let Some(v) = var(ENV_SESSION_COOKIE) {
      self.session_cookie = v;
    }
    if let Some(v) = var(ENV_REDIS_URL) {
      self.redis_url = Some(v).filter(|u| !u.is_empty());
    }
    if let Some(v) = var(ENV_COMMIT_POLICY) {
      self.commit_policy = v.parse()?;
    }
    if let Some(v) = var(ENV_LOOKUP_TIMEOUT) {
      self.lookup_timeout = Some(Duration::from_secs(parse(ENV_LOOKUP_TIMEOUT, v)?));
    }
    Ok(self)
  }

  pub fn from_env() -> Result<Self, ConfigError> {
    Config::default().apply_env(|k| std::env::var(k).ok())
  }
}
