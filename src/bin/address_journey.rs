//! CLI: serve the address journey over HTTP.
//!
//! Usage: `address_journey [OPTIONS]`
//!
//! Set RUST_LOG=address_journey=trace for TRACE-level spans on store and navigation calls.

use std::net::SocketAddr;
use std::process;

use address_journey::config::{CommitPolicy, Config};
use address_journey::server;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Serve the address-capture journey.
#[derive(Parser, Debug)]
#[command(name = "address_journey")]
#[command(
  after_help = r#"Environment variables (override flags when set):
  ADDRESS_JOURNEY_BIND             Listen address.
  ADDRESS_SERVICE_URL              Base URL of the address lookup service.
  ADDRESS_JOURNEY_SESSION_TTL      Session lifetime in seconds.
  ADDRESS_JOURNEY_SESSION_COOKIE   Name of the session cookie.
  ADDRESS_JOURNEY_REDIS_URL        Redis URL; sessions are kept in memory when unset.
  ADDRESS_JOURNEY_COMMIT_POLICY    optimistic | last-write-wins.
  ADDRESS_JOURNEY_LOOKUP_TIMEOUT   Lookup timeout in seconds; none when unset."#
)]
struct Args {
  #[arg(long, value_name = "ADDR")]
  bind: Option<SocketAddr>,

  #[arg(long, value_name = "URL")]
  address_service: Option<String>,

  /// Session lifetime in seconds.
  #[arg(long, value_name = "SECS")]
  session_ttl: Option<u64>,

  #[arg(long, value_name = "NAME")]
  session_cookie: Option<String>,

  #[arg(long, value_name = "URL")]
  redis_url: Option<String>,

  /// optimistic | last-write-wins
  #[arg(long, value_name = "POLICY")]
  commit_policy: Option<CommitPolicy>,

  /// Lookup timeout in seconds.
  #[arg(long, value_name = "SECS")]
  lookup_timeout: Option<u64>,
}

impl Args {
  fn into_config(self) -> Config {
    let mut c = Config::default();
    if let Some(v) = self.bind {
      c.bind = v;
    }
    if let Some(v) = self.address_service {
      c.address_service_url = v;
    }
    if let Some(v) = self.session_ttl {
      c.session_ttl = std::time::Duration::from_secs(v);
    }
    if let Some(v) = self.session_cookie {
      c.session_cookie = v;
    }
    if self.redis_url.is_some() {
      c.redis_url = self.redis_url;
    }
    if let Some(v) = self.commit_policy {
      c.commit_policy = v;
    }
    if let Some(v) = self.lookup_timeout {
      c.lookup_timeout = Some(std::time::Duration::from_secs(v));
    }
    c
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();
  let config = match args.into_config().apply_env(|k| std::env::var(k).ok()) {
    Ok(c) => c,
    Err(e) => {
      eprintln!("Configuration error: {}", e);
      process::exit(2);
    }
  };
  info!(
    bind = %config.bind,
    address_service = %config.address_service_url,
    commit_policy = %config.commit_policy,
    redis = config.redis_url.is_some(),
    "address_journey starting"
  );

  if let Err(e) = server::serve(&config).await {
    error!(error = %e, "server stopped");
    process::exit(1);
  }
}
