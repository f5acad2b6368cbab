use super::EntityId;
use serde::{Deserialize, Serialize};

/// Literary genre. A book may belong to many genres.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: EntityId,
    pub name: String,
}

impl Genre {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
