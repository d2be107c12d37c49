use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use crate::directory::Booking;
use crate::fetch::{HttpClient, fetch_json};
use crate::infra::join_path;
use crate::services::scheduling_api::{SchedulingApi, Slot};

pub const DEFAULT_BASE_URL: &str = "https://app.acuityscheduling.com";

/// Client for Acuity / Squarespace Scheduling availability.
///
/// Public booking pages need no credentials; wrap the transport in
/// [`BasicAuth`](crate::fetch::auth::BasicAuth) for accounts that do.
pub struct AcuityClient<C> {
    http: C,
    base_url: String,
}

impl<C: HttpClient> AcuityClient<C> {
    pub fn new(http: C, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

fn to_slot(v: &Value) -> Option<Slot> {
    let time = v.get("time")?.as_str()?.to_string();
    // one-to-one appointment types omit the count
    let slots_available = v
        .get("slotsAvailable")
        .and_then(Value::as_u64)
        .map_or(1, |n| u32::try_from(n).unwrap_or(u32::MAX));
    Some(Slot {
        time,
        slots_available,
    })
}

/// Availability comes back either as a bare array of slots or as an object
/// keyed by `YYYY-MM-DD`; only the requested day is kept from the latter.
pub(crate) fn normalize_slots(payload: &Value, date: NaiveDate) -> Result<Vec<Slot>> {
    let records: &[Value] = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(by_day) => {
            let key = date.format("%Y-%m-%d").to_string();
            match by_day.get(&key) {
                Some(Value::Array(items)) => items.as_slice(),
                Some(_) => anyhow::bail!("availability for {key} is not a list"),
                None => &[],
            }
        }
        _ => anyhow::bail!("unexpected availability payload"),
    };

    let slots: Vec<Slot> = records.iter().filter_map(to_slot).collect();
    if slots.len() < records.len() {
        warn!(
            dropped = records.len() - slots.len(),
            "Availability records without a time were dropped"
        );
    }
    Ok(slots)
}

#[async_trait]
impl<C: HttpClient> SchedulingApi for AcuityClient<C> {
    async fn availability(&self, booking: &Booking, date: NaiveDate) -> Result<Vec<Slot>> {
        let mut url = join_path(
            &self.base_url,
            &["api", "scheduling", "v1", "availability", "times"],
        )?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("owner", &booking.owner)
                .append_pair("appointmentTypeId", &booking.appointment_type_id)
                .append_pair("startDate", &date.format("%Y-%m-%d").to_string())
                .append_pair("timezone", &booking.timezone);
            if let Some(calendar) = &booking.calendar_id {
                query.append_pair("calendarId", calendar);
            }
        }

        debug!(owner = %booking.owner, date = %date, "Requesting availability");
        let payload: Value = fetch_json(&self.http, url.as_str()).await?;
        normalize_slots(&payload, date)
    }
}
