//! Error kinds raised while driving the journey.

use thiserror::Error;

use crate::types::Route;

/// Errors from journey operations, lookups and session persistence.
#[derive(Debug, Error)]
pub enum JourneyError {
  /// Address service unreachable, non-2xx, or returned a body that is not a list of strings.
  #[error("address lookup failed: {message}")]
  LookupService { message: String },

  /// A page was reached without the upstream data it depends on.
  #[error("missing prerequisite state `{waypoint}`; owned by {owner}")]
  MissingPrerequisiteState { waypoint: String, owner: Route },

  /// A submitted field was rejected.
  #[error("invalid `{field}` on {route}: {message}")]
  Validation {
    route: Route,
    field: String,
    message: String,
  },

  /// The session backend could not be reached or returned garbage.
  #[error("session store unavailable: {0}")]
  SessionStore(String),

  /// Optimistic commit lost against another commit on the same session.
  #[error("stale commit for session {session_id}: loaded version {expected}, store has {found}")]
  StaleCommit {
    session_id: String,
    expected: u64,
    found: u64,
  },

  #[error("failed to encode waypoint record: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl JourneyError {
  pub fn missing(waypoint: impl Into<String>, owner: Route) -> Self {
    JourneyError::MissingPrerequisiteState {
      waypoint: waypoint.into(),
      owner,
    }
  }

  pub fn required(route: Route, field: impl Into<String>) -> Self {
    JourneyError::Validation {
      route,
      field: field.into(),
      message: "a value is required".to_string(),
    }
  }

  /// Whether the user can carry on (re-shown form or redirect) after this error.
  pub fn is_recoverable(&self) -> bool {
    matches!(
      self,
      JourneyError::LookupService { .. }
        | JourneyError::MissingPrerequisiteState { .. }
        | JourneyError::Validation { .. }
    )
  }
}

impl From<redis::RedisError> for JourneyError {
  fn from(e: redis::RedisError) -> Self {
    JourneyError::SessionStore(e.to_string())
  }
}

impl From<reqwest::Error> for JourneyError {
  fn from(e: reqwest::Error) -> Self {
    JourneyError::LookupService {
      message: e.to_string(),
    }
  }
}

pub type JourneyResult<T> = Result<T, JourneyError>;
