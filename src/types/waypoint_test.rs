//! Tests for waypoint names.

use super::waypoint::{
  ADDRESS_CONFIRMATION, SEARCH_WAYPOINTS, strip_temp, temp_name,
};

#[test]
fn temp_name_prefixes() {
  assert_eq!(temp_name("address-confirmation"), "temp-address-confirmation");
  assert_eq!(ADDRESS_CONFIRMATION.temp_name(), "temp-address-confirmation");
}

#[test]
fn strip_temp_removes_one_leading_prefix() {
  assert_eq!(strip_temp("temp-post-code"), "post-code");
  assert_eq!(strip_temp("post-code"), "post-code");
  assert_eq!(strip_temp("temp-temp-x"), "temp-x");
  assert_eq!(strip_temp("x-temp-y"), "x-temp-y");
}

#[test]
fn search_waypoints_leave_confirmation_alone() {
  assert_eq!(
    SEARCH_WAYPOINTS,
    ["post-code", "post-code-results", "address-manual"]
  );
  assert!(!SEARCH_WAYPOINTS.contains(&ADDRESS_CONFIRMATION.name()));
}
