//! Doctor models.

use serde::{Deserialize, Serialize};

/// A doctor record as stored in `doctors`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Doctor {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
}
