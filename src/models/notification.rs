use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub psychologist_id: Uuid,
    pub message: String,
    pub created_at: NaiveDateTime,
    pub read: bool,
}
