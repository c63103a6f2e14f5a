//! Routes of the address journey.

use std::fmt;

use serde::Serialize;

/// A route the journey can render or redirect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
  Start,
  AddressRoute,
  SearchAgain,
  PostCode,
  PostCodeResults,
  AddressConfirmation,
  AddressManual,
  EditAddress,
  /// Summary screen of the surrounding journey; not served here.
  CheckYourAnswers,
}

impl Route {
  pub const ALL: [Route; 9] = [
    Route::Start,
    Route::AddressRoute,
    Route::SearchAgain,
    Route::PostCode,
    Route::PostCodeResults,
    Route::AddressConfirmation,
    Route::AddressManual,
    Route::EditAddress,
    Route::CheckYourAnswers,
  ];

  /// Route name without the leading slash; doubles as the page/template name.
  pub fn name(self) -> &'static str {
    match self {
      Route::Start => "start",
      Route::AddressRoute => "address-route",
      Route::SearchAgain => "search-again",
      Route::PostCode => "post-code",
      Route::PostCodeResults => "post-code-results",
      Route::AddressConfirmation => "address-confirmation",
      Route::AddressManual => "address-manual",
      Route::EditAddress => "edit-address",
      Route::CheckYourAnswers => "check-your-answers",
    }
  }

  pub fn path(self) -> &'static str {
    match self {
      Route::Start => "/start",
      Route::AddressRoute => "/address-route",
      Route::SearchAgain => "/search-again",
      Route::PostCode => "/post-code",
      Route::PostCodeResults => "/post-code-results",
      Route::AddressConfirmation => "/address-confirmation",
      Route::AddressManual => "/address-manual",
      Route::EditAddress => "/edit-address",
      Route::CheckYourAnswers => "/check-your-answers",
    }
  }

  pub fn from_path(path: &str) -> Option<Route> {
    Route::ALL.into_iter().find(|r| r.path() == path)
  }
}

impl fmt::Display for Route {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.path())
  }
}
