//! Next-route selection from accumulated journey state.
//!
//! Everything here is a pure function of the context snapshot and the route
//! being left; handlers mutate state first and then ask where to go.

use tracing::instrument;

use crate::draft;
use crate::error::JourneyError;
use crate::types::waypoint::{ADDRESS_CONFIRMATION, EDIT, FOUND_ADDRESSES_DATA};
use crate::types::{JourneyContext, Route};

/// Flags derived from the context that decide branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationFlags {
  /// User came in through the correction path.
  pub edit_mode: bool,
  /// An unconfirmed address is staged.
  pub draft_present: bool,
  /// A canonical, non-empty address has been confirmed.
  pub has_confirmed_address: bool,
}

impl NavigationFlags {
  pub fn from_context(ctx: &JourneyContext) -> Self {
    Self {
      edit_mode: ctx.get_record(EDIT).is_some_and(|f| f.edit),
      draft_present: draft::has_draft(ctx, ADDRESS_CONFIRMATION),
      has_confirmed_address: ctx
        .get_record(ADDRESS_CONFIRMATION)
        .is_some_and(|r| r.is_present()),
    }
  }
}

/// Input for [select_next_route].
#[derive(Debug, Clone, Copy)]
pub struct NavigationInput {
  /// Route being left (or the GET-only decision route being served).
  pub from: Route,
  pub flags: NavigationFlags,
}

impl NavigationInput {
  pub fn new(from: Route, ctx: &JourneyContext) -> Self {
    Self {
      from,
      flags: NavigationFlags::from_context(ctx),
    }
  }
}

/// Picks the route to send the user to after `input.from`.
#[instrument(level = "trace")]
pub fn select_next_route(input: &NavigationInput) -> Route {
  match input.from {
    Route::AddressRoute => {
      if input.flags.has_confirmed_address {
        Route::AddressConfirmation
      } else {
        Route::PostCode
      }
    }
    Route::SearchAgain => Route::PostCode,
    Route::PostCode => Route::PostCodeResults,
    Route::PostCodeResults | Route::AddressManual | Route::EditAddress => {
      Route::AddressConfirmation
    }
    Route::AddressConfirmation => {
      if input.flags.edit_mode {
        Route::CheckYourAnswers
      } else {
        Route::Start
      }
    }
    Route::Start => Route::Start,
    Route::CheckYourAnswers => Route::CheckYourAnswers,
  }
}

/// Convenience over [select_next_route] for a context snapshot.
pub fn next_route(from: Route, ctx: &JourneyContext) -> Route {
  select_next_route(&NavigationInput::new(from, ctx))
}

/// Checks that `route` has the upstream data it renders from.
///
/// Returns the error to redirect on when it does not.
pub fn check_prerequisites(route: Route, ctx: &JourneyContext) -> Result<(), JourneyError> {
  match route {
    Route::PostCodeResults if !ctx.contains(FOUND_ADDRESSES_DATA.name()) => Err(
      JourneyError::missing(FOUND_ADDRESSES_DATA.name(), Route::PostCode),
    ),
    Route::AddressConfirmation => {
      let flags = NavigationFlags::from_context(ctx);
      if flags.draft_present || flags.has_confirmed_address {
        Ok(())
      } else {
        Err(JourneyError::missing(
          ADDRESS_CONFIRMATION.name(),
          Route::PostCode,
        ))
      }
    }
    _ => Ok(()),
  }
}
