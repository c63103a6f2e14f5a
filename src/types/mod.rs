//! Journey types: waypoint keys, the journey context, records, routes and views.

mod journey_context;
mod page_view;
mod records;
mod route;
#[cfg(test)]
mod route_test;
mod session_record;
pub mod waypoint;
#[cfg(test)]
mod waypoint_test;

pub use journey_context::{JourneyContext, WaypointData};
pub use page_view::{FieldError, PageView};
pub use records::{
  AddressOption, AddressRecord, EditFlag, FoundAddresses, ManualAddressRecord, PostCodeRecord,
};
pub use route::Route;
pub use session_record::SessionRecord;
pub use waypoint::WaypointKey;
