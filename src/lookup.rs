//! Outbound postcode-to-address lookup.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{JourneyError, JourneyResult};

/// Body posted to the address service: the postcode plus any filter fields on the form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LookupQuery {
  #[serde(default)]
  pub postcode: String,
  #[serde(flatten)]
  pub filters: BTreeMap<String, String>,
}

impl LookupQuery {
  pub fn postcode(postcode: impl Into<String>) -> Self {
    Self {
      postcode: postcode.into(),
      filters: BTreeMap::new(),
    }
  }
}

/// Looks up the addresses matching a query.
///
/// Success is a (possibly empty) list of opaque address strings.
#[async_trait]
pub trait AddressLookupClient: Send + Sync {
  async fn lookup(&self, query: &LookupQuery) -> JourneyResult<Vec<String>>;
}

/// `POST <base>/address` with the query as JSON; expects 200 and a JSON string array.
#[derive(Debug, Clone)]
pub struct HttpAddressLookup {
  http: reqwest::Client,
  endpoint: String,
}

impl HttpAddressLookup {
  /// Builds a client for `base_url`. With `timeout` unset the call waits indefinitely.
  pub fn new(base_url: &str, timeout: Option<Duration>) -> JourneyResult<Self> {
    let mut builder = reqwest::Client::builder();
    if let Some(t) = timeout {
      builder = builder.timeout(t);
    }
    Ok(Self {
      http: builder.build()?,
      endpoint: format!("{}/address", base_url.trim_end_matches('/')),
    })
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }
}

#[async_trait]
impl AddressLookupClient for HttpAddressLookup {
  #[instrument(level = "trace", skip(self), fields(endpoint = %self.endpoint))]
  async fn lookup(&self, query: &LookupQuery) -> JourneyResult<Vec<String>> {
    let response = self.http.post(&self.endpoint).json(query).send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(JourneyError::LookupService {
        message: format!("address service returned {}", status),
      });
    }
    let addresses: Vec<String> = response.json().await?;
    debug!(count = addresses.len(), "address lookup returned");
    Ok(addresses)
  }
}
