//! Address journey operations.
//!
//! Each operation mutates the request's [JourneyState] and returns a
//! [Transition]: what to render or where to redirect, and whether the state
//! must be committed before responding.

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::draft;
use crate::error::{JourneyError, JourneyResult};
use crate::lookup::{AddressLookupClient, LookupQuery};
use crate::manual_address::compose_address;
use crate::navigation::{NavigationFlags, check_prerequisites, next_route};
use crate::persistence::JourneyState;
use crate::types::waypoint::{
  ADDRESS_CONFIRMATION, ADDRESS_MANUAL, EDIT, FOUND_ADDRESSES_DATA, POST_CODE, POST_CODE_RESULTS,
  SEARCH_WAYPOINTS,
};
use crate::types::{
  AddressOption, AddressRecord, EditFlag, FoundAddresses, ManualAddressRecord, PageView,
  PostCodeRecord, Route,
};

/// Message shown on the post-code form when the address service fails.
pub const LOOKUP_UNAVAILABLE: &str = "We could not look up addresses right now. Try again.";

/// What the response should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
  Render(PageView),
  Redirect(Route),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
  pub step: Step,
  /// Commit the state before the response is produced.
  pub commit: bool,
}

impl Transition {
  fn render(view: PageView) -> Self {
    Self {
      step: Step::Render(view),
      commit: false,
    }
  }

  fn redirect(route: Route) -> Self {
    Self {
      step: Step::Redirect(route),
      commit: false,
    }
  }

  fn committed(mut self) -> Self {
    self.commit = true;
    self
  }
}

/// Body of the results and confirmation forms.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressForm {
  #[serde(default)]
  pub address: Option<String>,
}

impl AddressForm {
  fn non_blank(&self) -> Option<&str> {
    self
      .address
      .as_deref()
      .map(str::trim)
      .filter(|a| !a.is_empty())
  }
}

/// Builds the view for a renderable route from the current state.
pub fn view(route: Route, state: &JourneyState) -> JourneyResult<PageView> {
  check_prerequisites(route, &state.context)?;
  let ctx = &state.context;
  let page = PageView::new(route).with_back_link(state.previous_url.clone());
  let page = match route {
    Route::PostCode => page.with_form_data(ctx.get(POST_CODE.name()).cloned()),
    Route::PostCodeResults => {
      let found = ctx
        .get_record(FOUND_ADDRESSES_DATA)
        .ok_or_else(|| JourneyError::missing(FOUND_ADDRESSES_DATA.name(), Route::PostCode))?;
      let options = found
        .addresses
        .iter()
        .map(|a| AddressOption::from_address(a))
        .collect();
      page
        .with_address_options(options)
        .with_form_data(ctx.get(POST_CODE_RESULTS.name()).cloned())
    }
    Route::AddressConfirmation => {
      let shown = draft::read_preferring_draft(ctx, ADDRESS_CONFIRMATION)
        .map(serde_json::to_value)
        .transpose()?;
      page.with_form_data(shown)
    }
    Route::AddressManual => page.with_form_data(ctx.get(ADDRESS_MANUAL.name()).cloned()),
    _ => page,
  };
  Ok(page)
}

/// GET on a form page: render it without touching state.
pub fn show(route: Route, state: &JourneyState) -> JourneyResult<Transition> {
  view(route, state).map(Transition::render)
}

/// `GET /start`: drops any draft and edit flag so a new pass starts clean.
#[instrument(level = "trace", skip(state))]
pub fn start(state: &mut JourneyState) -> JourneyResult<Transition> {
  draft::discard(&mut state.context, ADDRESS_CONFIRMATION);
  state.context.remove(&[EDIT.name()], false);
  Ok(Transition::render(view(Route::Start, state)?).committed())
}

/// `GET /address-route`: resume at confirmation if an address is confirmed, else search.
pub fn address_route(state: &JourneyState) -> Transition {
  let next = next_route(Route::AddressRoute, &state.context);
  info!(next = %next, "address route");
  Transition::redirect(next)
}

/// `GET /search-again`: clears search waypoints and their drafts; the confirmed address stays.
#[instrument(level = "trace", skip(state))]
pub fn search_again(state: &mut JourneyState) -> Transition {
  state.context.remove(&SEARCH_WAYPOINTS, true);
  Transition::redirect(next_route(Route::SearchAgain, &state.context)).committed()
}

/// `POST /post-code`: looks up addresses and stores them verbatim.
#[instrument(level = "trace", skip(state, lookup))]
pub async fn submit_post_code(
  state: &mut JourneyState,
  lookup: &dyn AddressLookupClient,
  query: &LookupQuery,
) -> JourneyResult<Transition> {
  if query.postcode.trim().is_empty() {
    return Err(JourneyError::required(Route::PostCode, "postcode"));
  }
  let addresses = lookup.lookup(query).await?;
  info!(count = addresses.len(), "postcode lookup complete");
  let ctx = &mut state.context;
  ctx.set_record(FOUND_ADDRESSES_DATA, &FoundAddresses { addresses })?;
  ctx.set_record(
    POST_CODE,
    &PostCodeRecord {
      postcode: query.postcode.clone(),
    },
  )?;
  state.set_previous(Route::PostCode);
  Ok(Transition::redirect(next_route(Route::PostCode, &state.context)).committed())
}

/// `POST /post-code-results`: records the selection and stages it as the draft address.
#[instrument(level = "trace", skip(state))]
pub fn submit_post_code_results(
  state: &mut JourneyState,
  form: &AddressForm,
) -> JourneyResult<Transition> {
  check_prerequisites(Route::PostCodeResults, &state.context)?;
  let address = form
    .non_blank()
    .ok_or_else(|| JourneyError::required(Route::PostCodeResults, "address"))?;
  let record = AddressRecord::new(address);
  state.context.set_record(POST_CODE_RESULTS, &record)?;
  draft::stage(&mut state.context, ADDRESS_CONFIRMATION, &record)?;
  state.set_previous(Route::PostCodeResults);
  Ok(Transition::redirect(next_route(Route::PostCodeResults, &state.context)).committed())
}

/// `POST /address-manual`: stages `"<line1> - <postCode>"` as the draft address.
#[instrument(level = "trace", skip(state))]
pub fn submit_address_manual(
  state: &mut JourneyState,
  form: &ManualAddressRecord,
) -> JourneyResult<Transition> {
  state.context.set_record(ADDRESS_MANUAL, form)?;
  draft::stage(
    &mut state.context,
    ADDRESS_CONFIRMATION,
    &AddressRecord::new(compose_address(form)),
  )?;
  state.set_previous(Route::AddressManual);
  Ok(Transition::redirect(next_route(Route::AddressManual, &state.context)).committed())
}

/// `POST /address-confirmation`: promotes the draft to canonical and continues.
///
/// Without a draft, an already confirmed address is re-confirmed, and failing
/// that a non-blank `address` in the body becomes the canonical value.
#[instrument(level = "trace", skip(state))]
pub fn submit_address_confirmation(
  state: &mut JourneyState,
  form: &AddressForm,
) -> JourneyResult<Transition> {
  if !draft::promote(&mut state.context, ADDRESS_CONFIRMATION) {
    let flags = NavigationFlags::from_context(&state.context);
    if !flags.has_confirmed_address {
      let address = form.non_blank().ok_or_else(|| {
        JourneyError::missing(ADDRESS_CONFIRMATION.name(), Route::PostCode)
      })?;
      state
        .context
        .set_record(ADDRESS_CONFIRMATION, &AddressRecord::new(address))?;
    }
  }
  state.set_previous(Route::AddressConfirmation);
  let next = next_route(Route::AddressConfirmation, &state.context);
  info!(next = %next, "address confirmed");
  Ok(Transition::redirect(next).committed())
}

/// `GET /edit-address`: flags the correction path and goes to confirmation.
#[instrument(level = "trace", skip(state))]
pub fn edit_address(state: &mut JourneyState) -> JourneyResult<Transition> {
  state.context.set_record(EDIT, &EditFlag { edit: true })?;
  Ok(Transition::redirect(next_route(Route::EditAddress, &state.context)).committed())
}

/// Which step to show the user after a recoverable error, if any.
///
/// `submitted` is the rejected form body; it pre-fills the re-shown form.
pub fn recover(err: &JourneyError, state: &JourneyState, submitted: Option<Value>) -> Option<Step> {
  match err {
    JourneyError::MissingPrerequisiteState { owner, .. } => Some(Step::Redirect(*owner)),
    JourneyError::LookupService { .. } => {
      let page = view(Route::PostCode, state).unwrap_or_else(|_| PageView::new(Route::PostCode));
      let form_data = submitted.or(page.form_data.clone());
      Some(Step::Render(
        page
          .with_form_data(form_data)
          .with_error("postcode", LOOKUP_UNAVAILABLE),
      ))
    }
    JourneyError::Validation {
      route,
      field,
      message,
    } => match view(*route, state) {
      Ok(page) => {
        let form_data = submitted.or(page.form_data.clone());
        Some(Step::Render(
          page
            .with_form_data(form_data)
            .with_error(field.as_str(), message.as_str()),
        ))
      }
      Err(e) => recover(&e, state, None),
    },
    _ => None,
  }
}
