//! Persisted shape of one session's journey.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::JourneyContext;

/// What the session store holds per session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
  pub data: JourneyContext,
  /// Back-link target, updated on every state-changing submission.
  pub previous_url: Option<String>,
  /// Incremented on every commit.
  #[serde(default)]
  pub version: u64,
  pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
  pub fn new(data: JourneyContext, previous_url: Option<String>, version: u64) -> Self {
    Self {
      data,
      previous_url,
      version,
      updated_at: Utc::now(),
    }
  }
}
