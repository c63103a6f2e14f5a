//! Per-session mapping from waypoint name to record.

use std::collections::{BTreeMap, HashSet};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::waypoint::{WaypointKey, strip_temp};
use crate::error::JourneyError;

/// Raw waypoint name → record mapping.
pub type WaypointData = BTreeMap<String, Value>;

/// Journey context: every waypoint record held for one session.
///
/// Reads of absent keys return `None`; nothing here fails except encoding a
/// typed record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JourneyContext {
  data: WaypointData,
}

impl JourneyContext {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, waypoint: &str) -> Option<&Value> {
    self.data.get(waypoint)
  }

  /// Overwrites the whole record stored under `waypoint`.
  pub fn set(&mut self, waypoint: impl Into<String>, record: Value) {
    self.data.insert(waypoint.into(), record);
  }

  /// Snapshot of all waypoint records.
  pub fn get_all(&self) -> WaypointData {
    self.data.clone()
  }

  /// Replaces the entire context.
  pub fn set_all(&mut self, data: WaypointData) {
    self.data = data;
  }

  pub fn contains(&self, waypoint: &str) -> bool {
    self.data.contains_key(waypoint)
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Rebuilds the context without the named waypoints.
  ///
  /// An entry is dropped when its name is in `waypoints`, or, with
  /// `include_temp_variants`, when its name minus a leading `temp-` is. The
  /// kept entries are collected into a fresh mapping which then replaces the
  /// old one.
  #[instrument(level = "trace", skip(self, waypoints))]
  pub fn remove<S: AsRef<str>>(&mut self, waypoints: &[S], include_temp_variants: bool) {
    let names: HashSet<&str> = waypoints.iter().map(AsRef::as_ref).collect();
    let rebuilt: WaypointData = self
      .data
      .iter()
      .filter(|(name, _)| {
        let exact = names.contains(name.as_str());
        let draft = include_temp_variants && names.contains(strip_temp(name));
        !(exact || draft)
      })
      .map(|(name, record)| (name.clone(), record.clone()))
      .collect();
    self.set_all(rebuilt);
  }

  /// Reads the record under `key`, decoded as its record type.
  ///
  /// A record that does not decode reads as absent.
  pub fn get_record<T: DeserializeOwned>(&self, key: WaypointKey<T>) -> Option<T> {
    self.get_named(key.name())
  }

  /// Reads the draft record shadowing `key`.
  pub fn get_temp_record<T: DeserializeOwned>(&self, key: WaypointKey<T>) -> Option<T> {
    self.get_named(&key.temp_name())
  }

  pub fn set_record<T: Serialize>(
    &mut self,
    key: WaypointKey<T>,
    record: &T,
  ) -> Result<(), JourneyError> {
    self.set(key.name(), serde_json::to_value(record)?);
    Ok(())
  }

  pub fn set_temp_record<T: Serialize>(
    &mut self,
    key: WaypointKey<T>,
    record: &T,
  ) -> Result<(), JourneyError> {
    self.set(key.temp_name(), serde_json::to_value(record)?);
    Ok(())
  }

  fn get_named<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
    let value = self.data.get(name)?;
    match serde_json::from_value(value.clone()) {
      Ok(record) => Some(record),
      Err(e) => {
        debug!(waypoint = name, error = %e, "waypoint record does not match its type");
        None
      }
    }
  }
}
