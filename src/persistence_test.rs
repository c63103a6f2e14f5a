//! Tests for `JourneyContextPersistence`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::config::CommitPolicy;
use crate::error::JourneyError;
use crate::persistence::{JourneyContextPersistence, JourneyState};
use crate::session_store::{MemorySessionStore, SessionStore};
use crate::types::Route;

const TTL: Duration = Duration::from_secs(60);

fn persistence(policy: CommitPolicy) -> (Arc<MemorySessionStore>, JourneyContextPersistence) {
  let store = Arc::new(MemorySessionStore::new());
  let p = JourneyContextPersistence::new(store.clone(), TTL, policy);
  (store, p)
}

#[tokio::test]
async fn begin_without_id_mints_a_fresh_session() {
  let (_, p) = persistence(CommitPolicy::Optimistic);
  let state = p.begin(None).await.unwrap();
  assert!(state.is_new);
  assert!(state.context.is_empty());
  assert_eq!(state.version, 0);
  assert!(uuid::Uuid::parse_str(&state.session_id).is_ok());
}

#[tokio::test]
async fn begin_with_unknown_id_mints_a_new_one() {
  let (_, p) = persistence(CommitPolicy::Optimistic);
  let id = uuid::Uuid::new_v4().to_string();
  let state = p.begin(Some(&id)).await.unwrap();
  assert!(state.is_new);
  assert_ne!(state.session_id, id);
  assert!(state.context.is_empty());
  assert_eq!(state.version, 0);
}

#[tokio::test(start_paused = true)]
async fn expired_session_is_replaced_by_a_new_id() {
  let store = Arc::new(MemorySessionStore::new());
  let p = JourneyContextPersistence::new(store, Duration::from_secs(5), CommitPolicy::Optimistic);
  let mut state = p.begin(None).await.unwrap();
  state.context.set("edit", json!({ "edit": true }));
  p.commit(&mut state).await.unwrap();

  tokio::time::advance(Duration::from_secs(6)).await;
  let again = p.begin(Some(&state.session_id)).await.unwrap();
  assert!(again.is_new);
  assert_ne!(again.session_id, state.session_id);
  assert!(again.context.is_empty());
}

#[tokio::test]
async fn mutations_are_invisible_until_commit() {
  let (store, p) = persistence(CommitPolicy::Optimistic);
  let mut state = p.begin(None).await.unwrap();
  state.context.set("edit", json!({ "edit": true }));
  assert!(store.load(&state.session_id).await.unwrap().is_none());

  p.commit(&mut state).await.unwrap();
  let rec = store.load(&state.session_id).await.unwrap().unwrap();
  assert_eq!(rec.data.get("edit"), Some(&json!({ "edit": true })));
  assert_eq!(rec.version, 1);
  assert_eq!(state.version, 1);
}

#[tokio::test]
async fn commit_then_begin_restores_context_and_back_link() {
  let (_, p) = persistence(CommitPolicy::Optimistic);
  let mut state = p.begin(None).await.unwrap();
  state.context.set("post-code", json!({ "postcode": "AB1 2CD" }));
  state.set_previous(Route::PostCode);
  p.commit(&mut state).await.unwrap();

  let again = p.begin(Some(&state.session_id)).await.unwrap();
  assert_eq!(again.context, state.context);
  assert_eq!(again.previous_url.as_deref(), Some("/post-code"));
  assert_eq!(again.version, 1);
}

#[tokio::test]
async fn optimistic_policy_rejects_the_second_tab() {
  let (_, p) = persistence(CommitPolicy::Optimistic);
  let mut first = p.begin(None).await.unwrap();
  p.commit(&mut first).await.unwrap();

  let mut tab_a = p.begin(Some(&first.session_id)).await.unwrap();
  let mut tab_b = p.begin(Some(&first.session_id)).await.unwrap();
  tab_a.context.set("a", json!(1));
  tab_b.context.set("b", json!(2));
  p.commit(&mut tab_a).await.unwrap();
  let err = p.commit(&mut tab_b).await.unwrap_err();
  assert!(matches!(
    err,
    JourneyError::StaleCommit {
      expected: 1,
      found: 2,
      ..
    }
  ));
  let stored = p.begin(Some(&first.session_id)).await.unwrap();
  assert!(stored.context.contains("a"));
  assert!(!stored.context.contains("b"));
}

#[tokio::test]
async fn last_write_wins_policy_discards_the_first_tab() {
  let (_, p) = persistence(CommitPolicy::LastWriteWins);
  let mut first = p.begin(None).await.unwrap();
  p.commit(&mut first).await.unwrap();

  let mut tab_a = p.begin(Some(&first.session_id)).await.unwrap();
  let mut tab_b = p.begin(Some(&first.session_id)).await.unwrap();
  tab_a.context.set("a", json!(1));
  tab_b.context.set("b", json!(2));
  p.commit(&mut tab_a).await.unwrap();
  p.commit(&mut tab_b).await.unwrap();
  let stored = p.begin(Some(&first.session_id)).await.unwrap();
  assert!(!stored.context.contains("a"));
  assert!(stored.context.contains("b"));
}

#[test]
fn fresh_states_get_distinct_ids() {
  assert_ne!(JourneyState::fresh().session_id, JourneyState::fresh().session_id);
}
