//! Waypoint names and typed keys into the journey context.

use std::fmt;
use std::marker::PhantomData;

use super::{AddressRecord, EditFlag, FoundAddresses, ManualAddressRecord, PostCodeRecord};

/// Prefix marking a draft (unconfirmed) shadow of a canonical waypoint.
pub const TEMP_PREFIX: &str = "temp-";

/// Returns the draft key shadowing `waypoint` (e.g. `temp-address-confirmation`).
pub fn temp_name(waypoint: &str) -> String {
  format!("{TEMP_PREFIX}{waypoint}")
}

/// Strips one leading `temp-` prefix; names without it are returned unchanged.
pub fn strip_temp(name: &str) -> &str {
  name.strip_prefix(TEMP_PREFIX).unwrap_or(name)
}

/// Typed key naming a waypoint and the record type stored under it.
///
/// The same record type can live under several waypoints (an address is the
/// form data of `post-code-results` and the value of `address-confirmation`),
/// so the type rides on the key rather than on the record.
pub struct WaypointKey<T> {
  name: &'static str,
  _record: PhantomData<fn() -> T>,
}

impl<T> WaypointKey<T> {
  pub const fn new(name: &'static str) -> Self {
    Self {
      name,
      _record: PhantomData,
    }
  }

  pub const fn name(&self) -> &'static str {
    self.name
  }

  /// Name of this waypoint's draft shadow.
  pub fn temp_name(&self) -> String {
    temp_name(self.name)
  }
}

impl<T> Clone for WaypointKey<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for WaypointKey<T> {}

impl<T> fmt::Debug for WaypointKey<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("WaypointKey").field(&self.name).finish()
  }
}

impl<T> fmt::Display for WaypointKey<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

pub const POST_CODE: WaypointKey<PostCodeRecord> = WaypointKey::new("post-code");
pub const POST_CODE_RESULTS: WaypointKey<AddressRecord> = WaypointKey::new("post-code-results");
pub const ADDRESS_CONFIRMATION: WaypointKey<AddressRecord> =
  WaypointKey::new("address-confirmation");
pub const ADDRESS_MANUAL: WaypointKey<ManualAddressRecord> = WaypointKey::new("address-manual");
/// Synthetic flag set by the correction path.
pub const EDIT: WaypointKey<EditFlag> = WaypointKey::new("edit");
/// Last lookup result, independent of any single page's record.
pub const FOUND_ADDRESSES_DATA: WaypointKey<FoundAddresses> =
  WaypointKey::new("found-addresses-data");

/// Waypoints cleared by search-again (their drafts included).
pub const SEARCH_WAYPOINTS: [&str; 3] = [
  POST_CODE.name(),
  POST_CODE_RESULTS.name(),
  ADDRESS_MANUAL.name(),
];
