//! Tests for navigation.

use serde_json::json;

use crate::error::JourneyError;
use crate::navigation::{
  NavigationFlags, NavigationInput, check_prerequisites, next_route, select_next_route,
};
use crate::types::{JourneyContext, Route};

fn input(from: Route, flags: NavigationFlags) -> NavigationInput {
  NavigationInput { from, flags }
}

#[test]
fn flags_from_empty_context_are_all_false() {
  assert_eq!(
    NavigationFlags::from_context(&JourneyContext::new()),
    NavigationFlags::default()
  );
}

#[test]
fn flags_read_edit_draft_and_confirmation() {
  let mut ctx = JourneyContext::new();
  ctx.set("edit", json!({ "edit": true }));
  ctx.set("temp-address-confirmation", json!({ "address": "1 High St" }));
  ctx.set("address-confirmation", json!({ "address": "2 High St" }));
  let f = NavigationFlags::from_context(&ctx);
  assert!(f.edit_mode);
  assert!(f.draft_present);
  assert!(f.has_confirmed_address);
}

#[test]
fn blank_confirmed_address_does_not_count() {
  let mut ctx = JourneyContext::new();
  ctx.set("address-confirmation", json!({ "address": "  " }));
  assert!(!NavigationFlags::from_context(&ctx).has_confirmed_address);
}

#[test]
fn edit_false_is_not_edit_mode() {
  let mut ctx = JourneyContext::new();
  ctx.set("edit", json!({ "edit": false }));
  assert!(!NavigationFlags::from_context(&ctx).edit_mode);
}

#[test]
fn address_route_resumes_when_confirmed() {
  let flags = NavigationFlags {
    has_confirmed_address: true,
    ..Default::default()
  };
  assert_eq!(
    select_next_route(&input(Route::AddressRoute, flags)),
    Route::AddressConfirmation
  );
}

#[test]
fn address_route_starts_search_otherwise() {
  let flags = NavigationFlags {
    draft_present: true,
    ..Default::default()
  };
  assert_eq!(
    select_next_route(&input(Route::AddressRoute, flags)),
    Route::PostCode
  );
}

#[test]
fn forward_steps_are_unconditional() {
  for flags in [
    NavigationFlags::default(),
    NavigationFlags {
      edit_mode: true,
      draft_present: true,
      has_confirmed_address: true,
    },
  ] {
    assert_eq!(select_next_route(&input(Route::SearchAgain, flags)), Route::PostCode);
    assert_eq!(
      select_next_route(&input(Route::PostCode, flags)),
      Route::PostCodeResults
    );
    assert_eq!(
      select_next_route(&input(Route::PostCodeResults, flags)),
      Route::AddressConfirmation
    );
    assert_eq!(
      select_next_route(&input(Route::AddressManual, flags)),
      Route::AddressConfirmation
    );
    assert_eq!(
      select_next_route(&input(Route::EditAddress, flags)),
      Route::AddressConfirmation
    );
  }
}

#[test]
fn confirmation_branches_on_edit_flag() {
  let normal = NavigationFlags::default();
  let edit = NavigationFlags {
    edit_mode: true,
    ..Default::default()
  };
  assert_eq!(
    select_next_route(&input(Route::AddressConfirmation, normal)),
    Route::Start
  );
  assert_eq!(
    select_next_route(&input(Route::AddressConfirmation, edit)),
    Route::CheckYourAnswers
  );
}

#[test]
fn same_snapshot_same_route() {
  let mut ctx = JourneyContext::new();
  ctx.set("edit", json!({ "edit": true }));
  let first: Vec<Route> = Route::ALL.iter().map(|r| next_route(*r, &ctx)).collect();
  let second: Vec<Route> = Route::ALL.iter().map(|r| next_route(*r, &ctx)).collect();
  assert_eq!(first, second);
}

#[test]
fn results_page_needs_lookup_data() {
  let mut ctx = JourneyContext::new();
  match check_prerequisites(Route::PostCodeResults, &ctx) {
    Err(JourneyError::MissingPrerequisiteState { waypoint, owner }) => {
      assert_eq!(waypoint, "found-addresses-data");
      assert_eq!(owner, Route::PostCode);
    }
    other => panic!("expected missing prerequisite, got {:?}", other),
  }
  ctx.set("found-addresses-data", json!({ "addresses": [] }));
  assert!(check_prerequisites(Route::PostCodeResults, &ctx).is_ok());
}

#[test]
fn confirmation_needs_draft_or_canonical() {
  let mut ctx = JourneyContext::new();
  assert!(check_prerequisites(Route::AddressConfirmation, &ctx).is_err());
  ctx.set("temp-address-confirmation", json!({ "address": "1 High St" }));
  assert!(check_prerequisites(Route::AddressConfirmation, &ctx).is_ok());
}

#[test]
fn other_routes_have_no_prerequisites() {
  let ctx = JourneyContext::new();
  for r in [Route::Start, Route::PostCode, Route::AddressManual, Route::SearchAgain] {
    assert!(check_prerequisites(r, &ctx).is_ok());
  }
}
