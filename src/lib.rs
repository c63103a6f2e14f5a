//! # address-journey
//!
//! State model and navigation for a multi-step address-capture wizard:
//! postcode lookup, address selection, manual entry, confirmation and an
//! edit re-entry path back to the surrounding journey's summary.
//!
//! ## Architecture
//!
//! - [types::JourneyContext]: per-session waypoint → record mapping.
//! - [draft]: `temp-` shadow keys, promoted on confirmation.
//! - [navigation]: pure next-route selection from context flags.
//! - [persistence]: per-request [JourneyState] and explicit commit to a
//!   [session_store::SessionStore] before any dependent response.
//! - [lookup]: outbound address search.
//! - [journey]: the route operations; [server] maps them onto axum.

pub mod config;
pub mod draft;
pub mod error;
pub mod journey;
pub mod lookup;
pub mod manual_address;
pub mod navigation;
#[cfg(test)]
mod navigation_test;
pub mod persistence;
#[cfg(test)]
mod persistence_test;
pub mod redis_store;
#[cfg(test)]
mod redis_store_test;
pub mod server;
pub mod session_store;
pub mod types;

pub use config::{CommitPolicy, Config};
pub use error::{JourneyError, JourneyResult};
pub use lookup::{AddressLookupClient, HttpAddressLookup, LookupQuery};
pub use persistence::{JourneyContextPersistence, JourneyState};
pub use server::{AppState, router};
pub use types::{JourneyContext, Route};
