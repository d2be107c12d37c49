//! Traits and types for the third-party APIs the site's tools sit on.
//!
//! Each trait has one concrete implementation under [`crate::infra`]; the
//! HTTP handlers only ever see the trait objects.

pub mod places_api;
pub mod scheduling_api;
pub mod tides_api;
pub mod transit_api;

pub use places_api::{Place, PlacesApi};
pub use scheduling_api::{SchedulingApi, Slot};
pub use tides_api::{TideEvent, TideKind, TidesApi};
pub use transit_api::{Arrival, TransitApi};
