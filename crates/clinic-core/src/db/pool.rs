//! Bounded SQLite connection pool.
//!
//! A thin layer over `r2d2`: `pool_floor` maps to `min_idle`, `pool_ceiling`
//! to `max_size` and `acquire_timeout` to `connection_timeout`. A caller that
//! finds every slot busy fails with [`DbError::PoolExhausted`] once the
//! timeout elapses.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use r2d2::{CustomizeConnection, Pool};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use super::{DbError, DbResult, SCHEMA};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A checked-out connection; goes back to its pool when dropped.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Pool sizing and location of the backing database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub database_path: PathBuf,
    /// Connections opened eagerly at startup
    pub pool_floor: usize,
    /// Maximum simultaneously open connections
    pub pool_ceiling: usize,
    /// Longest a caller waits for a free slot
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    /// Default bounds (floor 1, ceiling 10, 5s wait) for the given file.
    pub fn new<P: AsRef<Path>>(database_path: P) -> Self {
        Self {
            database_path: database_path.as_ref().to_path_buf(),
            pool_floor: 1,
            pool_ceiling: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_bounds(mut self, pool_floor: usize, pool_ceiling: usize) -> Self {
        self.pool_floor = pool_floor;
        self.pool_ceiling = pool_ceiling;
        self
    }

    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }

    /// Require `1 <= pool_floor <= pool_ceiling`, both within `u32`.
    pub fn validate(&self) -> DbResult<()> {
        self.bounds().map(|_| ())
    }

    fn bounds(&self) -> DbResult<(u32, u32)> {
        let invalid = || DbError::InvalidPoolBounds {
            floor: self.pool_floor,
            ceiling: self.pool_ceiling,
        };
        let floor = u32::try_from(self.pool_floor).map_err(|_| invalid())?;
        let ceiling = u32::try_from(self.pool_ceiling).map_err(|_| invalid())?;
        if floor == 0 || floor > ceiling {
            return Err(invalid());
        }
        Ok((floor, ceiling))
    }
}

/// Snapshot of pool occupancy. A shut-down pool reports no connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Connections currently open (idle + checked out)
    pub open: usize,
    /// Connections waiting in the pool
    pub idle: usize,
    pub closed: bool,
}

/// Per-connection setup, run once when `r2d2` opens a connection.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<Connection, rusqlite::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        Ok(())
    }
}

/// A fixed-ceiling pool of SQLite connections to one database file.
pub struct ConnectionPool {
    acquire_timeout: Duration,
    inner: Mutex<Option<Pool<SqliteConnectionManager>>>,
}

impl ConnectionPool {
    /// Validate bounds, open `pool_floor` connections and apply the schema.
    pub fn open(config: PoolConfig) -> DbResult<Self> {
        let (floor, ceiling) = config.bounds()?;
        let started_at = Instant::now();

        let manager = SqliteConnectionManager::file(&config.database_path);
        let pool = Pool::builder()
            .min_idle(Some(floor))
            .max_size(ceiling)
            .connection_timeout(config.acquire_timeout)
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)
            .map_err(|err| {
                error!(
                    "event=pool_open module=db status=error error_code=db_open_failed path={} error={}",
                    config.database_path.display(),
                    err
                );
                DbError::Pool(err)
            })?;

        if let Err(err) = pool.get()?.execute_batch(SCHEMA) {
            error!(
                "event=pool_open module=db status=error error_code=schema_failed error={}",
                err
            );
            return Err(err.into());
        }

        info!(
            "event=pool_open module=db status=ok floor={} ceiling={} path={} duration_ms={}",
            floor,
            ceiling,
            config.database_path.display(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            acquire_timeout: config.acquire_timeout,
            inner: Mutex::new(Some(pool)),
        })
    }

    /// Check out a connection, waiting up to `acquire_timeout` for a slot.
    pub fn acquire(&self) -> DbResult<PooledConnection> {
        let pool = self.lock().clone().ok_or(DbError::PoolClosed)?;
        pool.get().map_err(|err| {
            warn!(
                "event=pool_acquire module=db status=error error_code=pool_exhausted ceiling={} waited_ms={} error={}",
                pool.max_size(),
                self.acquire_timeout.as_millis(),
                err
            );
            DbError::PoolExhausted(self.acquire_timeout)
        })
    }

    /// Close every idle connection and refuse further checkouts.
    ///
    /// Connections still checked out are closed as they come back. Calling
    /// this more than once is a no-op.
    pub fn shutdown(&self) {
        let Some(pool) = self.lock().take() else {
            return;
        };
        let idle = pool.state().idle_connections;
        drop(pool);
        info!(
            "event=pool_shutdown module=db status=ok closed_connections={}",
            idle
        );
    }

    pub fn status(&self) -> PoolStatus {
        match self.lock().as_ref() {
            Some(pool) => {
                let state = pool.state();
                PoolStatus {
                    open: state.connections as usize,
                    idle: state.idle_connections as usize,
                    closed: false,
                }
            }
            None => PoolStatus {
                open: 0,
                idle: 0,
                closed: true,
            },
        }
    }

    /// The guarded value is only ever swapped whole, so a poisoned lock is
    /// still consistent.
    fn lock(&self) -> MutexGuard<'_, Option<Pool<SqliteConnectionManager>>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
