//! Beneficiary repository contract and SQLite implementation.

use crate::model::beneficiary::{Beneficiary, Status};
use crate::model::entity::{AuditStamps, EntityId};
use crate::model::value_objects::{BirthDate, Cpf, Name};
use crate::repo::filter::{Filter, SelectQuery};
use crate::repo::interceptors::Interceptors;
use crate::repo::{
    datetime_to_millis, millis_to_datetime, optional_millis_to_datetime, parse_id, query_all,
    restore, track, EntityState, RepoError, RepoResult, Repository, Tracked,
};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::sync::Arc;

pub(crate) const BENEFICIARY_SELECT_SQL: &str = "SELECT
    id,
    full_name,
    cpf,
    status,
    birth_date,
    health_plan_id,
    created_at,
    modified_at,
    deleted_at
FROM beneficiaries";

const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Uniqueness probes over live beneficiaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeneficiaryPredicate {
    /// Same CPF after sanitizing punctuation.
    CpfEquals(String),
}

/// Contains-filters for beneficiary listings. Blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeneficiaryFilter {
    pub full_name: Option<String>,
    pub cpf: Option<String>,
}

impl Filter<Beneficiary> for BeneficiaryFilter {
    fn apply(&self, query: &mut SelectQuery) {
        if let Some(full_name) = self.full_name.as_deref() {
            query.and_contains("full_name", full_name);
        }
        if let Some(cpf) = self.cpf.as_deref() {
            // Formatted fragments such as `456.789` match the stored digits.
            let digits = Cpf::sanitize(cpf);
            let needle = if digits.is_empty() { cpf } else { digits.as_str() };
            query.and_contains("cpf", needle);
        }
    }
}

/// Repository interface for beneficiaries.
pub trait BeneficiaryRepository: Repository<Beneficiary> {
    fn exists(&self, predicate: &BeneficiaryPredicate) -> RepoResult<bool>;
    fn count_by_health_plan(&self, health_plan_id: EntityId) -> RepoResult<u64>;
    /// Returns up to `page_size + 1` beneficiaries of one plan with ids
    /// strictly after `after_key`.
    fn get_paged_by_health_plan(
        &self,
        health_plan_id: EntityId,
        filter: &dyn Filter<Beneficiary>,
        page_size: u32,
        after_key: Option<EntityId>,
    ) -> RepoResult<Vec<Beneficiary>>;
}

/// SQLite-backed beneficiary repository.
pub struct SqliteBeneficiaryRepository<'conn> {
    conn: &'conn Connection,
    interceptors: Arc<Interceptors>,
    pending: Vec<Tracked<Beneficiary>>,
}

impl<'conn> SqliteBeneficiaryRepository<'conn> {
    pub fn new(conn: &'conn Connection, interceptors: Arc<Interceptors>) -> Self {
        Self {
            conn,
            interceptors,
            pending: Vec::new(),
        }
    }
}

impl Repository<Beneficiary> for SqliteBeneficiaryRepository<'_> {
    fn create(&mut self, entity: &Beneficiary) {
        track(&mut self.pending, entity, EntityState::Added);
    }

    fn update(&mut self, entity: &Beneficiary) {
        track(&mut self.pending, entity, EntityState::Modified);
    }

    fn delete(&mut self, entity: &Beneficiary) {
        track(&mut self.pending, entity, EntityState::Deleted);
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<Beneficiary>> {
        let mut query = SelectQuery::live(BENEFICIARY_SELECT_SQL);
        query
            .and_where("id = ?", [Value::Text(id.to_string())])
            .limit(1);
        let rows = query_all(self.conn, &self.interceptors, &query, parse_beneficiary_row)?;
        Ok(rows.into_iter().next())
    }

    fn take_pending(&mut self) -> Vec<Tracked<Beneficiary>> {
        std::mem::take(&mut self.pending)
    }

    fn restore_pending(&mut self, changes: Vec<Tracked<Beneficiary>>) {
        restore(&mut self.pending, changes);
    }
}

impl BeneficiaryRepository for SqliteBeneficiaryRepository<'_> {
    fn exists(&self, predicate: &BeneficiaryPredicate) -> RepoResult<bool> {
        let mut query = SelectQuery::live("SELECT 1 FROM beneficiaries");
        match predicate {
            BeneficiaryPredicate::CpfEquals(cpf) => {
                query.and_where("cpf = ?", [Value::Text(Cpf::sanitize(cpf))]);
            }
        }
        query.limit(1);

        let hits = query_all(self.conn, &self.interceptors, &query, |_| Ok(()))?;
        Ok(!hits.is_empty())
    }

    fn count_by_health_plan(&self, health_plan_id: EntityId) -> RepoResult<u64> {
        let mut query = SelectQuery::live("SELECT COUNT(*) FROM beneficiaries");
        query.and_where(
            "health_plan_id = ?",
            [Value::Text(health_plan_id.to_string())],
        );

        let counts = query_all(self.conn, &self.interceptors, &query, |row| {
            let count: i64 = row.get(0)?;
            u64::try_from(count)
                .map_err(|_| RepoError::InvalidData(format!("negative row count: {count}")))
        })?;
        Ok(counts.into_iter().next().unwrap_or(0))
    }

    fn get_paged_by_health_plan(
        &self,
        health_plan_id: EntityId,
        filter: &dyn Filter<Beneficiary>,
        page_size: u32,
        after_key: Option<EntityId>,
    ) -> RepoResult<Vec<Beneficiary>> {
        let mut query = SelectQuery::live(BENEFICIARY_SELECT_SQL);
        query.and_where(
            "health_plan_id = ?",
            [Value::Text(health_plan_id.to_string())],
        );
        filter.apply(&mut query);
        if let Some(after_key) = after_key {
            query.and_where("id > ?", [Value::Text(after_key.to_string())]);
        }
        query
            .order_by("id ASC")
            .limit(i64::from(page_size) + 1);
        query_all(self.conn, &self.interceptors, &query, parse_beneficiary_row)
    }
}

/// Writes drained beneficiary changes in order. Runs inside the caller's transaction.
pub(crate) fn write_beneficiary_changes(
    conn: &Connection,
    changes: &[Tracked<Beneficiary>],
) -> RepoResult<()> {
    for change in changes {
        let beneficiary = &change.entity;
        match change.state {
            EntityState::Added => {
                conn.execute(
                    "INSERT INTO beneficiaries (
                        id,
                        full_name,
                        cpf,
                        status,
                        birth_date,
                        health_plan_id,
                        created_at,
                        modified_at,
                        deleted_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
                    params![
                        beneficiary.id.to_string(),
                        beneficiary.full_name.value(),
                        beneficiary.cpf.value(),
                        beneficiary.status.as_str(),
                        beneficiary.birth_date.value().format(BIRTH_DATE_FORMAT).to_string(),
                        beneficiary.health_plan_id.to_string(),
                        datetime_to_millis(beneficiary.audit.created_at),
                        beneficiary.audit.updated_at.map(datetime_to_millis),
                        beneficiary.audit.deleted_at.map(datetime_to_millis),
                    ],
                )?;
            }
            EntityState::Modified => {
                let changed = conn.execute(
                    "UPDATE beneficiaries
                     SET
                        full_name = ?1,
                        cpf = ?2,
                        status = ?3,
                        birth_date = ?4,
                        health_plan_id = ?5,
                        modified_at = ?6,
                        deleted_at = ?7
                     WHERE id = ?8
                       AND deleted_at IS NULL;",
                    params![
                        beneficiary.full_name.value(),
                        beneficiary.cpf.value(),
                        beneficiary.status.as_str(),
                        beneficiary.birth_date.value().format(BIRTH_DATE_FORMAT).to_string(),
                        beneficiary.health_plan_id.to_string(),
                        beneficiary.audit.updated_at.map(datetime_to_millis),
                        beneficiary.audit.deleted_at.map(datetime_to_millis),
                        beneficiary.id.to_string(),
                    ],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound(beneficiary.id));
                }
            }
            EntityState::Deleted => {
                let changed = conn.execute(
                    "DELETE FROM beneficiaries WHERE id = ?1;",
                    params![beneficiary.id.to_string()],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound(beneficiary.id));
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn parse_beneficiary_row(row: &Row<'_>) -> RepoResult<Beneficiary> {
    let id_text: String = row.get(0)?;
    let full_name_text: String = row.get(1)?;
    let cpf_text: String = row.get(2)?;
    let status_text: String = row.get(3)?;
    let birth_date_text: String = row.get(4)?;
    let health_plan_id_text: String = row.get(5)?;
    let created_at: i64 = row.get(6)?;
    let modified_at: Option<i64> = row.get(7)?;
    let deleted_at: Option<i64> = row.get(8)?;

    let full_name = Name::create(&full_name_text)
        .map_err(|err| RepoError::InvalidData(format!("beneficiary name: {err}")))?;
    let cpf = Cpf::create(&cpf_text)
        .map_err(|err| RepoError::InvalidData(format!("beneficiary cpf: {err}")))?;
    let status = status_text
        .parse::<Status>()
        .map_err(RepoError::InvalidData)?;
    let birth_date = NaiveDate::parse_from_str(&birth_date_text, BIRTH_DATE_FORMAT)
        .map_err(|err| {
            RepoError::InvalidData(format!("invalid birth date `{birth_date_text}`: {err}"))
        })
        .and_then(|date| {
            BirthDate::create(date)
                .map_err(|err| RepoError::InvalidData(format!("beneficiary birth date: {err}")))
        })?;

    Ok(Beneficiary {
        id: parse_id(&id_text)?,
        full_name,
        cpf,
        status,
        birth_date,
        health_plan_id: parse_id(&health_plan_id_text)?,
        audit: AuditStamps {
            created_at: millis_to_datetime(created_at)?,
            updated_at: optional_millis_to_datetime(modified_at)?,
            deleted_at: optional_millis_to_datetime(deleted_at)?,
        },
    })
}
