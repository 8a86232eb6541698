use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub psychologist_id: Option<Uuid>,
}
