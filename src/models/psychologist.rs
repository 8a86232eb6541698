use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Psychologist {
    pub id: Uuid,
    pub name: String,
}
