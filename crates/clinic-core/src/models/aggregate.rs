//! Read-only patient view joined with doctors and visits.

use serde::{Deserialize, Serialize};

use super::{Doctor, Gender, VisitSummary};

/// A patient together with every distinct doctor seen and every visit made.
///
/// `doctors` and `visits` are always present; a patient without visits has
/// both as empty arrays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientAggregate {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub doctors: Vec<Doctor>,
    pub visits: Vec<VisitSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists_serialize_as_arrays() {
        let aggregate = PatientAggregate {
            id: "a1b2c3d4-0000-4000-8000-000000000000".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            date_of_birth: "1990-01-01".into(),
            gender: Gender::Male,
            doctors: vec![],
            visits: vec![],
        };

        let value = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(value["doctors"], serde_json::json!([]));
        assert_eq!(value["visits"], serde_json::json!([]));
    }
}
