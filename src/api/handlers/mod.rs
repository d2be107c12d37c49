//! Request handlers, one module per tool.

pub mod arrivals;
pub mod currents;
pub mod gallery;
pub mod health;
pub mod places;
pub mod saunas;
pub mod tax;
pub mod tides;
