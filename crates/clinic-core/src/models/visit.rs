//! Visit models.

use serde::{Deserialize, Serialize};

/// A visit links one patient to one doctor on a given date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Visit {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    /// Visit date, `YYYY-MM-DD`
    pub visit_date: String,
    pub diagnosis: String,
}

/// The per-visit slice exposed in a [`super::PatientAggregate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitSummary {
    pub visit_date: String,
    pub diagnosis: String,
}

