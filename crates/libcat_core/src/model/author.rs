use super::EntityId;
use serde::{Deserialize, Serialize};

/// Book author.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    pub id: EntityId,
    pub full_name: String,
}

impl Author {
    pub fn new(id: EntityId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
        }
    }
}
