use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub psychologist_id: Uuid,
    pub scheduled_at: NaiveDateTime,
    pub status: AppointmentStatus,
    pub motive: Option<String>,
    pub cancel_reason: Option<String>,
    pub session_note: Option<String>,
    /// Flat session price in cents, assigned once at creation.
    pub price_cents: i64,
    /// 10-digit payment reference token, assigned once at creation.
    pub capture_line: String,
    pub capture_due_date: NaiveDate,
    pub created_at: NaiveDateTime,
}
