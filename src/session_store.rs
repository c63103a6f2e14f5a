//! Session store: key-value persistence of [SessionRecord]s by session id, with TTL.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::instrument;

use crate::error::{JourneyError, JourneyResult};
use crate::types::SessionRecord;

/// Backend holding one [SessionRecord] per session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
  /// Returns the live record for `session_id`, or `None` if absent or expired.
  async fn load(&self, session_id: &str) -> JourneyResult<Option<SessionRecord>>;

  /// Writes `record`, expiring it after `ttl`.
  ///
  /// With `expected_version` set, the write only happens if the stored version
  /// (0 when absent) equals it; otherwise [JourneyError::StaleCommit].
  async fn save(
    &self,
    session_id: &str,
    record: &SessionRecord,
    ttl: Duration,
    expected_version: Option<u64>,
  ) -> JourneyResult<()>;

  async fn destroy(&self, session_id: &str) -> JourneyResult<()>;
}

struct Entry {
  record: SessionRecord,
  expires_at: Instant,
}

/// In-process store; sessions vanish with the process.
#[derive(Default)]
pub struct MemorySessionStore {
  entries: Mutex<HashMap<String, Entry>>,
}

impl MemorySessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Entries held in memory, expired or not.
  #[cfg(test)]
  pub(crate) async fn resident_sessions(&self) -> usize {
    self.entries.lock().await.len()
  }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
  #[instrument(level = "trace", skip(self))]
  async fn load(&self, session_id: &str) -> JourneyResult<Option<SessionRecord>> {
    let mut entries = self.entries.lock().await;
    match entries.get(session_id) {
      Some(e) if e.expires_at > Instant::now() => Ok(Some(e.record.clone())),
      Some(_) => {
        entries.remove(session_id);
        Ok(None)
      }
      None => Ok(None),
    }
  }

  #[instrument(level = "trace", skip(self, record))]
  async fn save(
    &self,
    session_id: &str,
    record: &SessionRecord,
    ttl: Duration,
    expected_version: Option<u64>,
  ) -> JourneyResult<()> {
    let now = Instant::now();
    let mut entries = self.entries.lock().await;
    // Sessions that never come back are only reclaimed here.
    entries.retain(|_, e| e.expires_at > now);
    if let Some(expected) = expected_version {
      let found = entries
        .get(session_id)
        .map(|e| e.record.version)
        .unwrap_or(0);
      if found != expected {
        return Err(JourneyError::StaleCommit {
          session_id: session_id.to_string(),
          expected,
          found,
        });
      }
    }
    entries.insert(
      session_id.to_string(),
      Entry {
        record: record.clone(),
        expires_at: now + ttl,
      },
    );
    Ok(())
  }

  async fn destroy(&self, session_id: &str) -> JourneyResult<()> {
    self.entries.lock().await.remove(session_id);
    Ok(())
  }
}
