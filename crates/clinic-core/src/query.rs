//! SQL statement construction.
//!
//! Builders here only produce text and an ordered parameter list; nothing is
//! executed. Identifiers in generated SQL always come from a
//! [`Column`](crate::schema::Column) enum, never from caller input.

use serde_json::{Map, Value};

use crate::schema::{Column, VisitColumn};

/// SQL text plus positional parameters, in binding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// A statement without parameters.
    pub fn bare(sql: impl Into<String>) -> Self {
        Self::new(sql, Vec::new())
    }
}

/// `id` followed by every column of `C`, comma separated.
fn column_list<C: Column>() -> String {
    std::iter::once("id")
        .chain(C::ALL.iter().map(|c| c.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every row of `C::TABLE`, in insertion order.
pub fn select_all<C: Column>() -> Statement {
    Statement::bare(format!(
        "SELECT {} FROM {} ORDER BY rowid",
        column_list::<C>(),
        C::TABLE
    ))
}

pub fn select_by_id<C: Column>(id: &str) -> Statement {
    Statement::new(
        format!("SELECT {} FROM {} WHERE id = ?", column_list::<C>(), C::TABLE),
        vec![id.to_string()],
    )
}

pub fn delete_by_id<C: Column>(id: &str) -> Statement {
    Statement::new(
        format!("DELETE FROM {} WHERE id = ?", C::TABLE),
        vec![id.to_string()],
    )
}

/// Insert with an explicit column list: `id` then `C::ALL` in schema order.
///
/// `values` must line up with `C::ALL`.
pub fn insert<C: Column>(id: &str, values: Vec<String>) -> Statement {
    debug_assert_eq!(values.len(), C::ALL.len());
    let placeholders = vec!["?"; C::ALL.len() + 1].join(", ");
    let mut params = Vec::with_capacity(values.len() + 1);
    params.push(id.to_string());
    params.extend(values);
    Statement::new(
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            C::TABLE,
            column_list::<C>(),
            placeholders
        ),
        params,
    )
}

/// `UPDATE ... SET c1 = ?, c2 = ? WHERE id = ?`.
///
/// Parameters are the change values in the given order, then `id`.
/// Returns `None` when there is nothing to set.
pub fn update<C: Column>(id: &str, changes: &[(C, String)]) -> Option<Statement> {
    if changes.is_empty() {
        return None;
    }
    let assignments = changes
        .iter()
        .map(|(column, _)| format!("{} = ?", column.name()))
        .collect::<Vec<_>>()
        .join(", ");
    let mut params: Vec<String> = changes.iter().map(|(_, value)| value.clone()).collect();
    params.push(id.to_string());
    Some(Statement::new(
        format!("UPDATE {} SET {} WHERE id = ?", C::TABLE, assignments),
        params,
    ))
}

/// Reduce a JSON object to allow-listed `(column, value)` pairs.
///
/// Unknown keys and non-string values are dropped. Order follows the map's
/// iteration order.
pub fn changes_from_payload<C: Column>(payload: &Map<String, Value>) -> Vec<(C, String)> {
    payload
        .iter()
        .filter_map(|(key, value)| {
            let column = C::from_key(key)?;
            let value = value.as_str()?;
            Some((column, value.to_string()))
        })
        .collect()
}

/// Values of every `C` column read out of a validated JSON object, in schema
/// order. `None` if any column is missing or not a string.
pub fn values_from_payload<C: Column>(payload: &Map<String, Value>) -> Option<Vec<String>> {
    C::ALL
        .iter()
        .map(|column| payload.get(column.name())?.as_str().map(str::to_string))
        .collect()
}

/// Case-insensitive substring search on first and/or last name.
///
/// `C` must have `first_name` and `last_name` columns; returns `None` when
/// neither term is given.
pub fn search<C: Column>(first_name: Option<&str>, last_name: Option<&str>) -> Option<Statement> {
    let mut clauses = Vec::new();
    let mut params = Vec::new();
    for (column, term) in [("first_name", first_name), ("last_name", last_name)] {
        let Some(term) = term else { continue };
        let Some(column) = C::from_key(column) else { continue };
        clauses.push(format!("{} LIKE ? ESCAPE '\\'", column.name()));
        params.push(format!("%{}%", escape_like(term)));
    }
    if clauses.is_empty() {
        return None;
    }
    Some(Statement::new(
        format!(
            "SELECT {} FROM {} WHERE {} ORDER BY rowid",
            column_list::<C>(),
            C::TABLE,
            clauses.join(" AND ")
        ),
        params,
    ))
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Insert a visit; `values` line up with [`VisitColumn::ALL`].
pub fn insert_visit(id: &str, values: Vec<String>) -> Statement {
    insert::<VisitColumn>(id, values)
}

pub fn delete_visit(id: &str) -> Statement {
    delete_by_id::<VisitColumn>(id)
}

/// Patients with their distinct doctors and all their visits.
///
/// Doctors and visits are aggregated in separate per-patient groups and only
/// then joined, so a patient with several visits to several doctors does not
/// get a doctor x visit cross product. Both lists come back as JSON text,
/// `[]` when empty.
pub const PATIENTS_WITH_DOCTORS_VISITS: &str = r#"
WITH patient_doctors AS (
    SELECT DISTINCT
        v.patient_id,
        d.id,
        d.first_name,
        d.last_name,
        d.specialization
    FROM visits v
    JOIN doctors d ON d.id = v.doctor_id
),
patients_with_doctors AS (
    SELECT
        p.id,
        p.first_name,
        p.last_name,
        p.date_of_birth,
        p.gender,
        p.rowid AS seq,
        coalesce(json_group_array(
            json_object(
                'id', pd.id,
                'first_name', pd.first_name,
                'last_name', pd.last_name,
                'specialization', pd.specialization)
            ) FILTER (WHERE pd.id IS NOT NULL), '[]') AS doctors
    FROM patients p
    LEFT JOIN patient_doctors pd ON pd.patient_id = p.id
    GROUP BY p.id
),
patients_with_visits AS (
    SELECT
        p.id,
        coalesce(json_group_array(
            json_object(
                'visit_date', v.visit_date,
                'diagnosis', v.diagnosis)
            ) FILTER (WHERE v.id IS NOT NULL), '[]') AS visits
    FROM patients p
    LEFT JOIN visits v ON v.patient_id = p.id
    GROUP BY p.id
)
SELECT
    pwd.id,
    pwd.first_name,
    pwd.last_name,
    pwd.date_of_birth,
    pwd.gender,
    pwd.doctors,
    pwv.visits
FROM patients_with_doctors pwd
JOIN patients_with_visits pwv ON pwd.id = pwv.id
ORDER BY pwd.seq
"#;

pub fn patients_with_doctors_visits() -> Statement {
    Statement::bare(PATIENTS_WITH_DOCTORS_VISITS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DoctorColumn, PatientColumn};
    use serde_json::json;

    const ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    #[test]
    fn test_fixed_statements() {
        assert_eq!(
            select_all::<PatientColumn>().sql,
            "SELECT id, first_name, last_name, date_of_birth, gender FROM patients ORDER BY rowid"
        );

        let stmt = select_by_id::<DoctorColumn>(ID);
        assert_eq!(
            stmt.sql,
            "SELECT id, first_name, last_name, specialization FROM doctors WHERE id = ?"
        );
        assert_eq!(stmt.params, vec![ID.to_string()]);

        let stmt = delete_by_id::<PatientColumn>(ID);
        assert_eq!(stmt.sql, "DELETE FROM patients WHERE id = ?");
        assert_eq!(stmt.params, vec![ID.to_string()]);
    }

    #[test]
    fn test_insert_lists_columns_in_schema_order() {
        let stmt = insert::<DoctorColumn>(
            ID,
            vec!["Gregory".into(), "House".into(), "Diagnostics".into()],
        );
        assert_eq!(
            stmt.sql,
            "INSERT INTO doctors (id, first_name, last_name, specialization) VALUES (?, ?, ?, ?)"
        );
        assert_eq!(stmt.params, vec![ID, "Gregory", "House", "Diagnostics"]);
    }

    #[test]
    fn test_partial_update_single_column() {
        let payload = json!({"last_name": "Smith"});
        let changes = changes_from_payload::<PatientColumn>(payload.as_object().unwrap());
        let stmt = update(ID, &changes).unwrap();

        assert_eq!(stmt.sql, "UPDATE patients SET last_name = ? WHERE id = ?");
        assert_eq!(stmt.params, vec!["Smith", ID]);
    }

    #[test]
    fn test_partial_update_drops_unknown_keys() {
        let payload = json!({
            "first_name": "Jo",
            "id": "00000000-0000-4000-8000-000000000000",
            "name = 'x', gender": "Male",
            "gender": "Female"
        });
        let changes = changes_from_payload::<PatientColumn>(payload.as_object().unwrap());
        assert_eq!(
            changes,
            vec![
                (PatientColumn::FirstName, "Jo".to_string()),
                (PatientColumn::Gender, "Female".to_string()),
            ]
        );

        let stmt = update(ID, &changes).unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE patients SET first_name = ?, gender = ? WHERE id = ?"
        );
        assert_eq!(stmt.params, vec!["Jo", "Female", ID]);
    }

    #[test]
    fn test_update_with_no_changes() {
        assert!(update::<DoctorColumn>(ID, &[]).is_none());
    }

    #[test]
    fn test_values_from_payload() {
        let payload = json!({
            "gender": "Male",
            "first_name": "A",
            "date_of_birth": "1990-01-01",
            "last_name": "B"
        });
        let values = values_from_payload::<PatientColumn>(payload.as_object().unwrap()).unwrap();
        assert_eq!(values, vec!["A", "B", "1990-01-01", "Male"]);

        let partial = json!({"first_name": "A"});
        assert!(values_from_payload::<PatientColumn>(partial.as_object().unwrap()).is_none());
    }

    #[test]
    fn test_search() {
        let stmt = search::<PatientColumn>(Some("an"), None).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT id, first_name, last_name, date_of_birth, gender FROM patients \
             WHERE first_name LIKE ? ESCAPE '\\' ORDER BY rowid"
        );
        assert_eq!(stmt.params, vec!["%an%"]);

        let stmt = search::<DoctorColumn>(Some("Greg"), Some("Ho_use")).unwrap();
        assert!(stmt.sql.contains("first_name LIKE ? ESCAPE '\\' AND last_name LIKE ?"));
        assert_eq!(stmt.params, vec!["%Greg%", "%Ho\\_use%"]);

        assert!(search::<DoctorColumn>(None, None).is_none());
    }

    #[test]
    fn test_visit_statements() {
        let stmt = insert_visit(
            ID,
            vec!["p".into(), "d".into(), "2024-01-01".into(), "Flu".into()],
        );
        assert_eq!(
            stmt.sql,
            "INSERT INTO visits (id, patient_id, doctor_id, visit_date, diagnosis) VALUES (?, ?, ?, ?, ?)"
        );
        assert_eq!(delete_visit(ID).sql, "DELETE FROM visits WHERE id = ?");
    }
}
