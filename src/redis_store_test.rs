//! Tests for `RedisSessionStore`.
//!
//! These need a running server: set ADDRESS_JOURNEY_REDIS_URL (for example
//! `redis://127.0.0.1/`). Each test returns early when it is unset.

use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use crate::config::ENV_REDIS_URL;
use crate::error::JourneyError;
use crate::redis_store::RedisSessionStore;
use crate::session_store::SessionStore;
use crate::types::{JourneyContext, SessionRecord};

const TTL: Duration = Duration::from_secs(60);

async fn store() -> Option<RedisSessionStore> {
  let url = std::env::var(ENV_REDIS_URL).ok().filter(|u| !u.is_empty())?;
  Some(RedisSessionStore::connect(&url).await.unwrap())
}

fn session_id() -> String {
  format!("test-{}", Uuid::new_v4())
}

fn record(version: u64, marker: &str) -> SessionRecord {
  let mut ctx = JourneyContext::new();
  ctx.set("post-code", json!({ "postcode": marker }));
  SessionRecord::new(ctx, Some("/post-code".to_string()), version)
}

#[tokio::test]
async fn save_then_load_round_trips_the_record() {
  let Some(store) = store().await else { return };
  let id = session_id();
  store.save(&id, &record(1, "AB1 2CD"), TTL, None).await.unwrap();
  let got = store.load(&id).await.unwrap().unwrap();
  assert_eq!(got.version, 1);
  assert_eq!(got.previous_url.as_deref(), Some("/post-code"));
  assert_eq!(
    got.data.get("post-code"),
    Some(&json!({ "postcode": "AB1 2CD" }))
  );
  store.destroy(&id).await.unwrap();
}

#[tokio::test]
async fn absent_session_is_version_zero() {
  let Some(store) = store().await else { return };
  let id = session_id();
  assert!(store.load(&id).await.unwrap().is_none());
  store.save(&id, &record(1, "a"), TTL, Some(0)).await.unwrap();
  store.save(&id, &record(2, "b"), TTL, Some(1)).await.unwrap();
  assert_eq!(store.load(&id).await.unwrap().unwrap().version, 2);
  store.destroy(&id).await.unwrap();
}

#[tokio::test]
async fn mismatched_version_is_rejected_and_nothing_is_written() {
  let Some(store) = store().await else { return };
  let id = session_id();
  store.save(&id, &record(1, "first"), TTL, Some(0)).await.unwrap();
  let err = store
    .save(&id, &record(1, "second"), TTL, Some(0))
    .await
    .unwrap_err();
  match err {
    JourneyError::StaleCommit {
      expected, found, ..
    } => {
      assert_eq!(expected, 0);
      assert_eq!(found, 1);
    }
    other => panic!("expected stale commit, got {:?}", other),
  }
  let got = store.load(&id).await.unwrap().unwrap();
  assert_eq!(got.data.get("post-code"), Some(&json!({ "postcode": "first" })));
  store.destroy(&id).await.unwrap();
}

#[tokio::test]
async fn unchecked_save_overwrites_any_version() {
  let Some(store) = store().await else { return };
  let id = session_id();
  store.save(&id, &record(5, "a"), TTL, None).await.unwrap();
  store.save(&id, &record(1, "b"), TTL, None).await.unwrap();
  let got = store.load(&id).await.unwrap().unwrap();
  assert_eq!(got.version, 1);
  assert_eq!(got.data.get("post-code"), Some(&json!({ "postcode": "b" })));
  store.destroy(&id).await.unwrap();
}

#[tokio::test]
async fn sessions_expire_after_ttl() {
  let Some(store) = store().await else { return };
  let id = session_id();
  store
    .save(&id, &record(1, "a"), Duration::from_secs(1), None)
    .await
    .unwrap();
  assert!(store.load(&id).await.unwrap().is_some());
  tokio::time::sleep(Duration::from_millis(2100)).await;
  assert!(store.load(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn destroy_removes_the_session() {
  let Some(store) = store().await else { return };
  let id = session_id();
  store.save(&id, &record(1, "a"), TTL, None).await.unwrap();
  store.destroy(&id).await.unwrap();
  assert!(store.load(&id).await.unwrap().is_none());
}
