//! Redis-backed [SessionStore].

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::instrument;

use crate::error::{JourneyError, JourneyResult};
use crate::session_store::SessionStore;
use crate::types::SessionRecord;

/// Key prefix for session records.
pub const KEY_PREFIX: &str = "address-journey:sess:";

/// Compare-and-set: KEYS[1] session key; ARGV[1] record JSON, ARGV[2] ttl
/// seconds, ARGV[3] expected version or -1 to skip the check. Returns
/// `{written, stored_version}`.
const SAVE_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[1])
local found = 0
if current then
  found = tonumber(cjson.decode(current)['version']) or 0
end
local expected = tonumber(ARGV[3])
if expected >= 0 and found ~= expected then
  return {0, found}
end
redis.call('SET', KEYS[1], ARGV[1], 'EX', ARGV[2])
return {1, found}
"#;

/// Stores each session as one JSON document under `<KEY_PREFIX><session id>` with `EX ttl`.
#[derive(Clone)]
pub struct RedisSessionStore {
  conn: ConnectionManager,
  save_script: redis::Script,
}

impl RedisSessionStore {
  pub async fn connect(url: &str) -> JourneyResult<Self> {
    let client = redis::Client::open(url)?;
    let conn = ConnectionManager::new(client).await?;
    Ok(Self {
      conn,
      save_script: redis::Script::new(SAVE_SCRIPT),
    })
  }

  fn key(&self, session_id: &str) -> String {
    format!("{KEY_PREFIX}{session_id}")
  }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
  #[instrument(level = "trace", skip(self))]
  async fn load(&self, session_id: &str) -> JourneyResult<Option<SessionRecord>> {
    let mut conn = self.conn.clone();
    let raw: Option<String> = conn.get(self.key(session_id)).await?;
    raw
      .map(|json| {
        serde_json::from_str(&json)
          .map_err(|e| JourneyError::SessionStore(format!("corrupt session record: {e}")))
      })
      .transpose()
  }

  #[instrument(level = "trace", skip(self, record))]
  async fn save(
    &self,
    session_id: &str,
    record: &SessionRecord,
    ttl: Duration,
    expected_version: Option<u64>,
  ) -> JourneyResult<()> {
    let mut conn = self.conn.clone();
    let json = serde_json::to_string(record)?;
    let expected = expected_version.map(|v| v as i64).unwrap_or(-1);
    let (written, found): (i64, i64) = self
      .save_script
      .key(self.key(session_id))
      .arg(json)
      .arg(ttl.as_secs().max(1))
      .arg(expected)
      .invoke_async(&mut conn)
      .await?;
    if written == 1 {
      Ok(())
    } else {
      Err(JourneyError::StaleCommit {
        session_id: session_id.to_string(),
        expected: expected_version.unwrap_or_default(),
        found: found.max(0) as u64,
      })
    }
  }

  async fn destroy(&self, session_id: &str) -> JourneyResult<()> {
    let mut conn = self.conn.clone();
    let _: () = conn.del(self.key(session_id)).await?;
    Ok(())
  }
}
