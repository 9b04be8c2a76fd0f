//! Health plan repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Load plans (optionally with their live beneficiaries) from `health_plans`.
//! - Answer uniqueness probes used by command handlers.
//! - Serve keyset pages ordered by id.
//!
//! # Invariants
//! - Name probes compare through the `case_insensitive` column collation.
//! - Pages hold at most `page_size + 1` rows; the extra row is a sentinel
//!   telling the caller another page exists.

use crate::model::entity::{AuditStamps, EntityId};
use crate::model::health_plan::HealthPlan;
use crate::model::value_objects::{AnsRegistrationCode, Name};
use crate::repo::beneficiary_repo::{parse_beneficiary_row, BENEFICIARY_SELECT_SQL};
use crate::repo::filter::{Filter, SelectQuery};
use crate::repo::interceptors::Interceptors;
use crate::repo::{
    datetime_to_millis, millis_to_datetime, optional_millis_to_datetime, parse_id, query_all,
    restore, track, EntityState, RepoError, RepoResult, Repository, Tracked,
};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::sync::Arc;

const HEALTH_PLAN_SELECT_SQL: &str = "SELECT
    id,
    name,
    ans_registration_code,
    created_at,
    modified_at,
    deleted_at
FROM health_plans";

/// Uniqueness probes over live plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthPlanPredicate {
    /// Same name, ignoring case.
    NameEquals(String),
    AnsCodeEquals(String),
}

/// Contains-filters for plan listings. Blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthPlanFilter {
    pub name: Option<String>,
    pub ans_code: Option<String>,
}

impl Filter<HealthPlan> for HealthPlanFilter {
    fn apply(&self, query: &mut SelectQuery) {
        if let Some(name) = self.name.as_deref() {
            query.and_contains("name", name);
        }
        if let Some(ans_code) = self.ans_code.as_deref() {
            query.and_contains("ans_registration_code", ans_code);
        }
    }
}

/// Repository interface for health plans.
pub trait HealthPlanRepository: Repository<HealthPlan> {
    /// Loads a plan with its live beneficiaries ordered by full name, then id.
    fn get_by_id_with_beneficiaries(&self, id: EntityId) -> RepoResult<Option<HealthPlan>>;
    fn exists(&self, predicate: &HealthPlanPredicate) -> RepoResult<bool>;
    /// Returns up to `page_size + 1` plans with ids strictly after `after_key`.
    fn get_paged(
        &self,
        filter: &dyn Filter<HealthPlan>,
        page_size: u32,
        after_key: Option<EntityId>,
    ) -> RepoResult<Vec<HealthPlan>>;
}

/// SQLite-backed health plan repository.
pub struct SqliteHealthPlanRepository<'conn> {
    conn: &'conn Connection,
    interceptors: Arc<Interceptors>,
    pending: Vec<Tracked<HealthPlan>>,
}

impl<'conn> SqliteHealthPlanRepository<'conn> {
    pub fn new(conn: &'conn Connection, interceptors: Arc<Interceptors>) -> Self {
        Self {
            conn,
            interceptors,
            pending: Vec::new(),
        }
    }

    fn fetch(&self, query: &SelectQuery) -> RepoResult<Vec<HealthPlan>> {
        query_all(self.conn, &self.interceptors, query, parse_health_plan_row)
    }
}

impl Repository<HealthPlan> for SqliteHealthPlanRepository<'_> {
    fn create(&mut self, entity: &HealthPlan) {
        track(&mut self.pending, entity, EntityState::Added);
    }

    fn update(&mut self, entity: &HealthPlan) {
        track(&mut self.pending, entity, EntityState::Modified);
    }

    fn delete(&mut self, entity: &HealthPlan) {
        track(&mut self.pending, entity, EntityState::Deleted);
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<HealthPlan>> {
        let mut query = SelectQuery::live(HEALTH_PLAN_SELECT_SQL);
        query
            .and_where("id = ?", [Value::Text(id.to_string())])
            .limit(1);
        Ok(self.fetch(&query)?.into_iter().next())
    }

    fn take_pending(&mut self) -> Vec<Tracked<HealthPlan>> {
        std::mem::take(&mut self.pending)
    }

    fn restore_pending(&mut self, changes: Vec<Tracked<HealthPlan>>) {
        restore(&mut self.pending, changes);
    }
}

impl HealthPlanRepository for SqliteHealthPlanRepository<'_> {
    fn get_by_id_with_beneficiaries(&self, id: EntityId) -> RepoResult<Option<HealthPlan>> {
        let Some(mut plan) = self.get_by_id(id)? else {
            return Ok(None);
        };

        let mut query = SelectQuery::live(BENEFICIARY_SELECT_SQL);
        query
            .and_where("health_plan_id = ?", [Value::Text(id.to_string())])
            .order_by("full_name ASC, id ASC");
        plan.beneficiaries = query_all(
            self.conn,
            &self.interceptors,
            &query,
            parse_beneficiary_row,
        )?;

        Ok(Some(plan))
    }

    fn exists(&self, predicate: &HealthPlanPredicate) -> RepoResult<bool> {
        let mut query = SelectQuery::live("SELECT 1 FROM health_plans");
        match predicate {
            HealthPlanPredicate::NameEquals(name) => {
                query.and_where("name = ?", [Value::Text(name.trim().to_string())])
            }
            HealthPlanPredicate::AnsCodeEquals(code) => query.and_where(
                "ans_registration_code = ?",
                [Value::Text(code.trim().to_string())],
            ),
        };
        query.limit(1);

        let hits = query_all(self.conn, &self.interceptors, &query, |_| Ok(()))?;
        Ok(!hits.is_empty())
    }

    fn get_paged(
        &self,
        filter: &dyn Filter<HealthPlan>,
        page_size: u32,
        after_key: Option<EntityId>,
    ) -> RepoResult<Vec<HealthPlan>> {
        let mut query = SelectQuery::live(HEALTH_PLAN_SELECT_SQL);
        filter.apply(&mut query);
        if let Some(after_key) = after_key {
            query.and_where("id > ?", [Value::Text(after_key.to_string())]);
        }
        query
            .order_by("id ASC")
            .limit(i64::from(page_size) + 1);
        self.fetch(&query)
    }
}

/// Writes drained plan changes in order. Runs inside the caller's transaction.
pub(crate) fn write_health_plan_changes(
    conn: &Connection,
    changes: &[Tracked<HealthPlan>],
) -> RepoResult<()> {
    for change in changes {
        let plan = &change.entity;
        match change.state {
            EntityState::Added => {
                conn.execute(
                    "INSERT INTO health_plans (
                        id,
                        name,
                        ans_registration_code,
                        created_at,
                        modified_at,
                        deleted_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                    params![
                        plan.id.to_string(),
                        plan.name.value(),
                        plan.ans_registration_code.value(),
                        datetime_to_millis(plan.audit.created_at),
                        plan.audit.updated_at.map(datetime_to_millis),
                        plan.audit.deleted_at.map(datetime_to_millis),
                    ],
                )?;
            }
            EntityState::Modified => {
                let changed = conn.execute(
                    "UPDATE health_plans
                     SET
                        name = ?1,
                        ans_registration_code = ?2,
                        modified_at = ?3,
                        deleted_at = ?4
                     WHERE id = ?5
                       AND deleted_at IS NULL;",
                    params![
                        plan.name.value(),
                        plan.ans_registration_code.value(),
                        plan.audit.updated_at.map(datetime_to_millis),
                        plan.audit.deleted_at.map(datetime_to_millis),
                        plan.id.to_string(),
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound(plan.id));
                }
            }
            EntityState::Deleted => {
                let changed = conn.execute(
                    "DELETE FROM health_plans WHERE id = ?1;",
                    params![plan.id.to_string()],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound(plan.id));
                }
            }
        }
    }
    Ok(())
}

fn parse_health_plan_row(row: &Row<'_>) -> RepoResult<HealthPlan> {
    let id_text: String = row.get(0)?;
    let name_text: String = row.get(1)?;
    let code_text: String = row.get(2)?;
    let created_at: i64 = row.get(3)?;
    let modified_at: Option<i64> = row.get(4)?;
    let deleted_at: Option<i64> = row.get(5)?;

    let name = Name::create(&name_text)
        .map_err(|err| RepoError::InvalidData(format!("health plan name: {err}")))?;
    let code = AnsRegistrationCode::create(&code_text)
        .map_err(|err| RepoError::InvalidData(format!("health plan ANS code: {err}")))?;

    Ok(HealthPlan::from_parts(
        parse_id(&id_text)?,
        name,
        code,
        AuditStamps {
            created_at: millis_to_datetime(created_at)?,
            updated_at: optional_millis_to_datetime(modified_at)?,
            deleted_at: optional_millis_to_datetime(deleted_at)?,
        },
    ))
}
