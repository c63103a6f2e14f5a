//! Loading and committing a session's journey context.
//!
//! Mutations on a [JourneyState] stay in memory until [JourneyContextPersistence::commit]
//! resolves. Callers must await the commit before sending a response that
//! depends on the new state (typically a redirect).

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::config::CommitPolicy;
use crate::error::JourneyResult;
use crate::session_store::SessionStore;
use crate::types::{JourneyContext, Route, SessionRecord};

/// Per-request journey state, loaded from the store and threaded through the handler.
#[derive(Debug, Clone)]
pub struct JourneyState {
  pub session_id: String,
  pub context: JourneyContext,
  pub previous_url: Option<String>,
  /// Version read from the store (0 for a session that was never committed).
  pub version: u64,
  /// True when the session id was minted for this request.
  pub is_new: bool,
}

impl JourneyState {
  /// Fresh, empty state under a new session id.
  pub fn fresh() -> Self {
    Self {
      session_id: Uuid::new_v4().to_string(),
      context: JourneyContext::new(),
      previous_url: None,
      version: 0,
      is_new: true,
    }
  }

  pub fn from_record(session_id: impl Into<String>, record: SessionRecord) -> Self {
    Self {
      session_id: session_id.into(),
      context: record.data,
      previous_url: record.previous_url,
      version: record.version,
      is_new: false,
    }
  }

  /// Records `route` as the back-link target.
  pub fn set_previous(&mut self, route: Route) {
    self.previous_url = Some(route.path().to_string());
  }
}

/// Commits journey state to a [SessionStore].
#[derive(Clone)]
pub struct JourneyContextPersistence {
  store: Arc<dyn SessionStore>,
  ttl: Duration,
  policy: CommitPolicy,
}

impl JourneyContextPersistence {
  pub fn new(store: Arc<dyn SessionStore>, ttl: Duration, policy: CommitPolicy) -> Self {
    Self { store, ttl, policy }
  }

  /// Loads the state for `session_id`.
  ///
  /// Without an id, or when the store has no live record for it, a fresh
  /// session is minted; ids are never taken from the client.
  #[instrument(level = "trace", skip(self))]
  pub async fn begin(&self, session_id: Option<&str>) -> JourneyResult<JourneyState> {
    let Some(id) = session_id else {
      return Ok(JourneyState::fresh());
    };
    match self.store.load(id).await? {
      Some(record) => Ok(JourneyState::from_record(id, record)),
      None => {
        debug!(session_id = id, "no live session; minting a new one");
        Ok(JourneyState::fresh())
      }
    }
  }

  /// Writes the whole context to the store and returns once it is durable.
  ///
  /// On success `state.version` is advanced to the stored version.
  #[instrument(level = "trace", skip(self, state), fields(session_id = %state.session_id))]
  pub async fn commit(&self, state: &mut JourneyState) -> JourneyResult<()> {
    let next = state.version + 1;
    let record = SessionRecord::new(state.context.clone(), state.previous_url.clone(), next);
    let expected = match self.policy {
      CommitPolicy::Optimistic => Some(state.version),
      CommitPolicy::LastWriteWins => None,
    };
    self
      .store
      .save(&state.session_id, &record, self.ttl, expected)
      .await?;
    state.version = next;
    debug!(version = next, waypoints = state.context.len(), "journey context committed");
    Ok(())
  }
}
