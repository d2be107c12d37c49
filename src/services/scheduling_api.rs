//! Trait and types for booking availability.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::directory::Booking;

/// An open booking time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    /// Start time as reported upstream (ISO-8601 with offset).
    pub time: String,
    pub slots_available: u32,
}

/// Abstraction over an appointment scheduler (Acuity / Squarespace Scheduling).
#[async_trait::async_trait]
pub trait SchedulingApi: Send + Sync {
    async fn availability(&self, booking: &Booking, date: NaiveDate) -> Result<Vec<Slot>>;
}
