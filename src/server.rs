//! HTTP surface: routes, session cookie, commit-before-respond.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{JourneyError, JourneyResult};
use crate::journey::{self, AddressForm, Step, Transition};
use crate::lookup::{AddressLookupClient, HttpAddressLookup, LookupQuery};
use crate::persistence::{JourneyContextPersistence, JourneyState};
use crate::redis_store::RedisSessionStore;
use crate::session_store::{MemorySessionStore, SessionStore};
use crate::types::{ManualAddressRecord, Route};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
  pub persistence: JourneyContextPersistence,
  pub lookup: Arc<dyn AddressLookupClient>,
  pub session_cookie: Arc<str>,
}

impl AppState {
  pub fn new(
    persistence: JourneyContextPersistence,
    lookup: Arc<dyn AddressLookupClient>,
    session_cookie: &str,
  ) -> Self {
    Self {
      persistence,
      lookup,
      session_cookie: Arc::from(session_cookie),
    }
  }

  /// Wires the configured session store and the HTTP address lookup.
  pub async fn from_config(config: &Config) -> JourneyResult<Self> {
    let store: Arc<dyn SessionStore> = match &config.redis_url {
      Some(url) => {
        info!(url = %url, "using redis session store");
        Arc::new(RedisSessionStore::connect(url).await?)
      }
      None => {
        info!("using in-memory session store");
        Arc::new(MemorySessionStore::new())
      }
    };
    let persistence =
      JourneyContextPersistence::new(store, config.session_ttl, config.commit_policy);
    let lookup = HttpAddressLookup::new(&config.address_service_url, config.lookup_timeout)?;
    Ok(Self::new(
      persistence,
      Arc::new(lookup),
      &config.session_cookie,
    ))
  }

  async fn begin(&self, headers: &HeaderMap) -> Result<JourneyState, AppError> {
    let id = session_id_from_headers(headers, &self.session_cookie);
    Ok(self.persistence.begin(id.as_deref()).await?)
  }

  /// Commits when the transition asks for it, then builds the response.
  ///
  /// Recoverable errors become a re-rendered page or a redirect and are not committed.
  async fn finish(
    &self,
    mut state: JourneyState,
    result: JourneyResult<Transition>,
    submitted: Option<Value>,
  ) -> Result<Response, AppError> {
    let transition = match result {
      Ok(t) => t,
      Err(e) if e.is_recoverable() => {
        warn!(error = %e, session_id = %state.session_id, "recoverable journey error");
        let status = match e {
          JourneyError::LookupService { .. } => StatusCode::BAD_GATEWAY,
          JourneyError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
          _ => StatusCode::OK,
        };
        let step = journey::recover(&e, &state, submitted).ok_or(AppError(e))?;
        return Ok(self.respond(&state, step, status));
      }
      Err(e) => return Err(AppError(e)),
    };
    if transition.commit {
      self.persistence.commit(&mut state).await?;
    }
    Ok(self.respond(&state, transition.step, StatusCode::OK))
  }

  fn respond(&self, state: &JourneyState, step: Step, status: StatusCode) -> Response {
    let mut response = match step {
      Step::Render(view) => (status, Json(view)).into_response(),
      Step::Redirect(route) => Redirect::to(route.path()).into_response(),
    };
    if state.is_new {
      let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        self.session_cookie, state.session_id
      );
      if let Ok(v) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(SET_COOKIE, v);
      }
    }
    response
  }
}

/// Session id carried in the `cookie_name` cookie, if it is a well-formed UUID.
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
  headers
    .get_all(COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, _)| *name == cookie_name)
    .map(|(_, value)| value.trim())
    .filter(|value| Uuid::parse_str(value).is_ok())
    .map(str::to_string)
}

/// Journey error surfaced as an HTTP response.
#[derive(Debug)]
pub struct AppError(pub JourneyError);

impl From<JourneyError> for AppError {
  fn from(e: JourneyError) -> Self {
    AppError(e)
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    match &self.0 {
      JourneyError::StaleCommit { .. } => {
        warn!(error = %self.0, "commit rejected");
        (
          StatusCode::CONFLICT,
          "This session was changed elsewhere. Reload the page and try again.",
        )
          .into_response()
      }
      JourneyError::SessionStore(_) => {
        error!(error = %self.0, "session store failure");
        (StatusCode::SERVICE_UNAVAILABLE, "Service unavailable").into_response()
      }
      _ => {
        error!(error = %self.0, "unhandled journey error");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
      }
    }
  }
}

pub fn router(state: AppState) -> Router {
  Router::new()
    .route(Route::Start.path(), get(start))
    .route(Route::AddressRoute.path(), get(address_route))
    .route(Route::SearchAgain.path(), get(search_again))
    .route(Route::PostCode.path(), get(show_post_code).post(submit_post_code))
    .route(
      Route::PostCodeResults.path(),
      get(show_post_code_results).post(submit_post_code_results),
    )
    .route(
      Route::AddressConfirmation.path(),
      get(show_address_confirmation).post(submit_address_confirmation),
    )
    .route(
      Route::AddressManual.path(),
      get(show_address_manual).post(submit_address_manual),
    )
    .route(Route::EditAddress.path(), get(edit_address))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// Binds `config.bind` and serves until ctrl-c.
pub async fn serve(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  let state = AppState::from_config(config).await?;
  let listener = tokio::net::TcpListener::bind(config.bind).await?;
  info!(addr = %listener.local_addr()?, "address journey listening");
  axum::serve(listener, router(state))
    .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
    .await?;
  Ok(())
}

/// Resolves when `signal` fires. If the handler cannot be installed the
/// server keeps running and this never resolves.
pub(crate) async fn shutdown_signal<F>(signal: F)
where
  F: std::future::Future<Output = std::io::Result<()>>,
{
  match signal.await {
    Ok(()) => info!("shutting down"),
    Err(e) => {
      warn!(error = %e, "failed to install ctrl-c handler; graceful shutdown disabled");
      std::future::pending::<()>().await;
    }
  }
}

type HandlerResult = Result<Response, AppError>;

async fn start(State(app): State<AppState>, headers: HeaderMap) -> HandlerResult {
  let mut state = app.begin(&headers).await?;
  let result = journey::start(&mut state);
  app.finish(state, result, None).await
}

async fn address_route(State(app): State<AppState>, headers: HeaderMap) -> HandlerResult {
  let state = app.begin(&headers).await?;
  let result = Ok(journey::address_route(&state));
  app.finish(state, result, None).await
}

async fn search_again(State(app): State<AppState>, headers: HeaderMap) -> HandlerResult {
  let mut state = app.begin(&headers).await?;
  let result = Ok(journey::search_again(&mut state));
  app.finish(state, result, None).await
}

async fn show(app: &AppState, headers: &HeaderMap, route: Route) -> HandlerResult {
  let state = app.begin(headers).await?;
  let result = journey::show(route, &state);
  app.finish(state, result, None).await
}

async fn show_post_code(State(app): State<AppState>, headers: HeaderMap) -> HandlerResult {
  show(&app, &headers, Route::PostCode).await
}

async fn submit_post_code(
  State(app): State<AppState>,
  headers: HeaderMap,
  Form(query): Form<LookupQuery>,
) -> HandlerResult {
  let mut state = app.begin(&headers).await?;
  let submitted = serde_json::to_value(&query).ok();
  let result = journey::submit_post_code(&mut state, app.lookup.as_ref(), &query).await;
  app.finish(state, result, submitted).await
}

async fn show_post_code_results(State(app): State<AppState>, headers: HeaderMap) -> HandlerResult {
  show(&app, &headers, Route::PostCodeResults).await
}

async fn submit_post_code_results(
  State(app): State<AppState>,
  headers: HeaderMap,
  Form(form): Form<AddressForm>,
) -> HandlerResult {
  let mut state = app.begin(&headers).await?;
  let result = journey::submit_post_code_results(&mut state, &form);
  app.finish(state, result, None).await
}

async fn show_address_confirmation(
  State(app): State<AppState>,
  headers: HeaderMap,
) -> HandlerResult {
  show(&app, &headers, Route::AddressConfirmation).await
}

async fn submit_address_confirmation(
  State(app): State<AppState>,
  headers: HeaderMap,
  Form(form): Form<AddressForm>,
) -> HandlerResult {
  let mut state = app.begin(&headers).await?;
  let result = journey::submit_address_confirmation(&mut state, &form);
  app.finish(state, result, None).await
}

async fn show_address_manual(State(app): State<AppState>, headers: HeaderMap) -> HandlerResult {
  show(&app, &headers, Route::AddressManual).await
}

async fn submit_address_manual(
  State(app): State<AppState>,
  headers: HeaderMap,
  Form(form): Form<ManualAddressRecord>,
) -> HandlerResult {
  let mut state = app.begin(&headers).await?;
  let submitted = serde_json::to_value(&form).ok();
  let result = journey::submit_address_manual(&mut state, &form);
  app.finish(state, result, submitted).await
}

async fn edit_address(State(app): State<AppState>, headers: HeaderMap) -> HandlerResult {
  let mut state = app.begin(&headers).await?;
  let result = journey::edit_address(&mut state);
  app.finish(state, result, None).await
}
