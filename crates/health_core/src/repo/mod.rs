//! Repository layer: change tracking, query building and SQLite persistence.
//!
//! # Responsibility
//! - Define entity-oriented data access contracts.
//! - Keep SQL details inside the persistence boundary.
//! - Defer writes until `UnitOfWork::save_changes`.
//!
//! # Invariants
//! - Reads never return soft-deleted rows.
//! - `create`/`update`/`delete` only record intent; nothing is written until
//!   the owning unit of work saves.
//! - Persisted rows that fail domain validation surface as `InvalidData`.

use crate::db::DbError;
use crate::model::entity::{Entity, EntityId};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod beneficiary_repo;
pub mod filter;
pub mod health_plan_repo;
pub mod interceptors;
pub mod unit_of_work;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
    NotFound(EntityId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::NotFound(id) => write!(f, "entity not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Pending write recorded by a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    Added,
    Modified,
    Deleted,
}

/// Entity snapshot plus the write it is waiting for.
#[derive(Debug, Clone)]
pub struct Tracked<T> {
    pub entity: T,
    pub state: EntityState,
}

/// Object-safe view of a pending change, handed to save interceptors.
pub trait ChangeEntry {
    fn entity_id(&self) -> EntityId;
    fn state(&self) -> EntityState;
    fn set_state(&mut self, state: EntityState);
    fn mark_updated(&mut self, now: DateTime<Utc>);
    fn mark_deleted(&mut self, now: DateTime<Utc>);
}

impl<T: Entity> ChangeEntry for Tracked<T> {
    fn entity_id(&self) -> EntityId {
        self.entity.id()
    }

    fn state(&self) -> EntityState {
        self.state
    }

    fn set_state(&mut self, state: EntityState) {
        self.state = state;
    }

    fn mark_updated(&mut self, now: DateTime<Utc>) {
        self.entity.update_entity(now);
    }

    fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.entity.delete_entity(now);
    }
}

/// Write-side contract shared by every repository.
///
/// Entities are snapshotted on call, so later mutation of the caller's copy
/// is not observed by the pending change.
pub trait Repository<T: Entity> {
    fn create(&mut self, entity: &T);
    fn update(&mut self, entity: &T);
    fn delete(&mut self, entity: &T);
    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<T>>;
    /// Takes every pending change, leaving the repository clean.
    fn take_pending(&mut self) -> Vec<Tracked<T>>;
    /// Puts changes taken by a failed save back ahead of any newer ones.
    fn restore_pending(&mut self, changes: Vec<Tracked<T>>);
}

pub(crate) fn restore<T>(pending: &mut Vec<Tracked<T>>, mut changes: Vec<Tracked<T>>) {
    changes.append(pending);
    *pending = changes;
}

pub(crate) fn track<T: Entity>(pending: &mut Vec<Tracked<T>>, entity: &T, state: EntityState) {
    pending.push(Tracked {
        entity: entity.clone(),
        state,
    });
}

pub(crate) fn parse_id(value: &str) -> RepoResult<EntityId> {
    EntityId::parse_str(value)
        .map_err(|err| RepoError::InvalidData(format!("invalid id `{value}`: {err}")))
}

pub(crate) fn millis_to_datetime(value: i64) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| RepoError::InvalidData(format!("timestamp out of range: {value}")))
}

pub(crate) fn optional_millis_to_datetime(value: Option<i64>) -> RepoResult<Option<DateTime<Utc>>> {
    value.map(millis_to_datetime).transpose()
}

pub(crate) fn datetime_to_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

/// Runs a read through the command interceptors and maps every row.
pub(crate) fn query_all<T>(
    conn: &rusqlite::Connection,
    interceptors: &interceptors::Interceptors,
    query: &filter::SelectQuery,
    mut parse: impl FnMut(&rusqlite::Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let sql = interceptors.reader_executing(query.sql());
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(query.bindings().iter()))?;

    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}
