//! Statement execution over the connection pool.

use std::time::Instant;

use log::{debug, error};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};

use super::{ConnectionPool, DbError, DbResult, PoolConfig};
use crate::query::Statement;

/// Executes built statements on pooled connections.
///
/// Every call checks out exactly one connection and returns it before
/// returning, whether the statement succeeded or not.
pub struct Gateway {
    pool: ConnectionPool,
}

impl Gateway {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }

    /// Open a pool with `config` and wrap it.
    pub fn open(config: PoolConfig) -> DbResult<Self> {
        Ok(Self::new(ConnectionPool::open(config)?))
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Run one write statement in its own transaction and commit.
    ///
    /// Returns `Ok(true)` iff at least one row was affected. A statement that
    /// matched nothing is `Ok(false)`; storage failures are `Err`.
    pub fn execute(&self, stmt: &Statement) -> DbResult<bool> {
        let started_at = Instant::now();
        let mut conn = self.pool.acquire()?;

        match execute_in_transaction(&mut conn, stmt) {
            Ok(affected) => {
                debug!(
                    "event=db_execute module=db status=ok rows={} duration_ms={}",
                    affected,
                    started_at.elapsed().as_millis()
                );
                Ok(affected > 0)
            }
            Err(err) => {
                error!(
                    "event=db_execute module=db status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Run a read statement and map every row.
    pub fn query<T, F>(&self, stmt: &Statement, map: F) -> DbResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.pool.acquire()?;
        let mut prepared = conn.prepare(&stmt.sql)?;
        let rows = prepared.query_map(params_from_iter(stmt.params.iter()), map)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Run a read statement expected to match at most one row.
    pub fn query_one<T, F>(&self, stmt: &Statement, map: F) -> DbResult<Option<T>>
    where
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.pool.acquire()?;
        conn.query_row(&stmt.sql, params_from_iter(stmt.params.iter()), map)
            .optional()
            .map_err(Into::into)
    }

    /// Drain and close the pool. Idempotent.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }
}

fn execute_in_transaction(conn: &mut Connection, stmt: &Statement) -> DbResult<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let affected = tx
        .execute(&stmt.sql, params_from_iter(stmt.params.iter()))
        .map_err(DbError::classify)?;
    tx.commit()?;
    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{doctor_from_row, patient_from_row};
    use crate::query;
    use crate::schema::{DoctorColumn, PatientColumn};

    const ID: &str = "123e4567-e89b-12d3-a456-426614174000";

    fn setup() -> (tempfile::TempDir, Gateway) {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Gateway::open(PoolConfig::new(dir.path().join("clinic.db"))).unwrap();
        (dir, gateway)
    }

    fn insert_patient(gateway: &Gateway, id: &str, last_name: &str) -> bool {
        let stmt = query::insert::<PatientColumn>(
            id,
            vec!["A".into(), last_name.into(), "1990-01-01".into(), "Male".into()],
        );
        gateway.execute(&stmt).unwrap()
    }

    #[test]
    fn test_execute_reports_affected_rows() {
        let (_dir, gateway) = setup();
        assert!(insert_patient(&gateway, ID, "B"));

        let changes = vec![(PatientColumn::LastName, "Smith".to_string())];
        let stmt = query::update(ID, &changes).unwrap();
        assert!(gateway.execute(&stmt).unwrap());

        let patient = gateway
            .query_one(&query::select_by_id::<PatientColumn>(ID), patient_from_row)
            .unwrap()
            .unwrap();
        assert_eq!(patient.last_name, "Smith");
        assert_eq!(patient.first_name, "A");
    }

    #[test]
    fn test_zero_rows_is_not_an_error() {
        let (_dir, gateway) = setup();
        let stmt = query::delete_by_id::<DoctorColumn>(ID);
        assert!(!gateway.execute(&stmt).unwrap());
    }

    #[test]
    fn test_constraint_violation_surfaces_as_error() {
        let (_dir, gateway) = setup();
        assert!(insert_patient(&gateway, ID, "B"));

        let stmt = query::insert::<PatientColumn>(
            ID,
            vec!["A".into(), "B".into(), "1990-01-01".into(), "Male".into()],
        );
        assert!(matches!(gateway.execute(&stmt), Err(DbError::Constraint(_))));
    }

    #[test]
    fn test_connection_released_after_failure() {
        let (_dir, gateway) = setup();
        let bad = Statement::bare("UPDATE nowhere SET x = 1");
        assert!(gateway.execute(&bad).is_err());
        assert!(gateway.query(&bad, |row| row.get::<_, i64>(0)).is_err());

        let status = gateway.pool().status();
        assert_eq!(status.open, status.idle);
    }

    #[test]
    fn test_query_maps_rows() {
        let (_dir, gateway) = setup();
        gateway
            .execute(&query::insert::<DoctorColumn>(
                ID,
                vec!["Gregory".into(), "House".into(), "Diagnostics".into()],
            ))
            .unwrap();

        let doctors = gateway
            .query(&query::select_all::<DoctorColumn>(), doctor_from_row)
            .unwrap();
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].specialization, "Diagnostics");

        let missing = gateway
            .query_one(
                &query::select_by_id::<DoctorColumn>("00000000-0000-4000-8000-000000000000"),
                doctor_from_row,
            )
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_shutdown_refuses_new_work() {
        let (_dir, gateway) = setup();
        gateway.shutdown();
        gateway.shutdown();
        let result = gateway.execute(&query::delete_by_id::<PatientColumn>(ID));
        assert!(matches!(result, Err(DbError::PoolClosed)));
    }
}
