//! Draft staging: unconfirmed records live under `temp-<waypoint>` until promoted.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::JourneyResult;
use crate::types::{JourneyContext, WaypointKey};

/// Stages `record` as the draft of `key`, leaving any canonical value untouched.
pub fn stage<T: Serialize>(
  ctx: &mut JourneyContext,
  key: WaypointKey<T>,
  record: &T,
) -> JourneyResult<()> {
  ctx.set_temp_record(key, record)
}

/// Draft if present, otherwise the canonical record.
pub fn read_preferring_draft<T: DeserializeOwned>(
  ctx: &JourneyContext,
  key: WaypointKey<T>,
) -> Option<T> {
  ctx
    .get_temp_record(key)
    .or_else(|| ctx.get_record(key))
}

pub fn has_draft<T>(ctx: &JourneyContext, key: WaypointKey<T>) -> bool {
  ctx.contains(&key.temp_name())
}

/// Replaces the canonical value of `key` with its draft and drops the draft.
///
/// Returns false, changing nothing, when no draft is staged.
#[instrument(level = "trace", skip(ctx))]
pub fn promote<T>(ctx: &mut JourneyContext, key: WaypointKey<T>) -> bool {
  let temp = key.temp_name();
  let Some(draft) = ctx.get(&temp).cloned() else {
    return false;
  };
  ctx.set(key.name(), draft);
  ctx.remove(&[temp], false);
  true
}

/// Drops the draft of `key` without promoting it.
pub fn discard<T>(ctx: &mut JourneyContext, key: WaypointKey<T>) {
  ctx.remove(&[key.temp_name()], false);
}
