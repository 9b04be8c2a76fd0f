//! Unit of work over one SQLite connection.
//!
//! # Responsibility
//! - Own the repositories used by one request.
//! - Flush their pending changes atomically through the save interceptors.
//! - Expose explicit transaction control for multi-step commands.
//!
//! # Invariants
//! - Plan changes are written before beneficiary changes, so a plan created
//!   in the same unit of work satisfies the beneficiary foreign key.
//! - Dropping a unit of work with an open transaction rolls it back.
//! - A failed save leaves no partial writes, even inside an explicit
//!   transaction, and keeps its changes pending.

use crate::repo::beneficiary_repo::{
    write_beneficiary_changes, BeneficiaryRepository, SqliteBeneficiaryRepository,
};
use crate::repo::health_plan_repo::{
    write_health_plan_changes, HealthPlanRepository, SqliteHealthPlanRepository,
};
use crate::repo::interceptors::Interceptors;
use crate::repo::{ChangeEntry, RepoError, RepoResult, Repository};
use chrono::Utc;
use log::{debug, error};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::sync::Arc;
use std::time::Instant;

/// Repository access plus atomic persistence of their pending changes.
pub trait UnitOfWork {
    fn health_plans(&mut self) -> &mut dyn HealthPlanRepository;
    fn beneficiaries(&mut self) -> &mut dyn BeneficiaryRepository;
    /// Writes every pending change and returns how many were written.
    fn save_changes(&mut self) -> RepoResult<usize>;
    /// Opens an explicit transaction. No-op when one is already open.
    fn begin_transaction(&mut self) -> RepoResult<()>;
    /// No-op without an open transaction.
    fn commit_transaction(&mut self) -> RepoResult<()>;
    /// No-op without an open transaction.
    fn rollback_transaction(&mut self) -> RepoResult<()>;
}

/// SQLite-backed unit of work borrowing a connection for its lifetime.
pub struct SqliteUnitOfWork<'conn> {
    conn: &'conn Connection,
    interceptors: Arc<Interceptors>,
    health_plans: SqliteHealthPlanRepository<'conn>,
    beneficiaries: SqliteBeneficiaryRepository<'conn>,
    transaction: Option<Transaction<'conn>>,
}

impl<'conn> SqliteUnitOfWork<'conn> {
    pub fn new(conn: &'conn Connection, interceptors: Arc<Interceptors>) -> Self {
        Self {
            conn,
            health_plans: SqliteHealthPlanRepository::new(conn, Arc::clone(&interceptors)),
            beneficiaries: SqliteBeneficiaryRepository::new(conn, Arc::clone(&interceptors)),
            interceptors,
            transaction: None,
        }
    }

    pub fn has_open_transaction(&self) -> bool {
        self.transaction.is_some()
    }
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    fn health_plans(&mut self) -> &mut dyn HealthPlanRepository {
        &mut self.health_plans
    }

    fn beneficiaries(&mut self) -> &mut dyn BeneficiaryRepository {
        &mut self.beneficiaries
    }

    fn save_changes(&mut self) -> RepoResult<usize> {
        let started_at = Instant::now();
        let mut plans = self.health_plans.take_pending();
        let mut beneficiaries = self.beneficiaries.take_pending();
        let total = plans.len() + beneficiaries.len();
        if total == 0 {
            return Ok(0);
        }
        // Interceptors rewrite the tracked entries; a failed save restores
        // the changes as the caller recorded them.
        let recorded_plans = plans.clone();
        let recorded_beneficiaries = beneficiaries.clone();

        {
            let mut entries: Vec<&mut dyn ChangeEntry> = Vec::with_capacity(total);
            for change in plans.iter_mut() {
                entries.push(change);
            }
            for change in beneficiaries.iter_mut() {
                entries.push(change);
            }
            self.interceptors.saving_changes(&mut entries, Utc::now());
        }

        let result = match self.transaction.as_mut() {
            Some(tx) => tx
                .savepoint()
                .map_err(RepoError::from)
                .and_then(|savepoint| -> RepoResult<()> {
                    write_health_plan_changes(&savepoint, &plans)?;
                    write_beneficiary_changes(&savepoint, &beneficiaries)?;
                    savepoint.commit()?;
                    Ok(())
                }),
            None => Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
                .map_err(RepoError::from)
                .and_then(|tx| -> RepoResult<()> {
                    write_health_plan_changes(&tx, &plans)?;
                    write_beneficiary_changes(&tx, &beneficiaries)?;
                    tx.commit()?;
                    Ok(())
                }),
        };

        if result.is_err() {
            self.health_plans.restore_pending(recorded_plans);
            self.beneficiaries.restore_pending(recorded_beneficiaries);
        }

        match result {
            Ok(()) => {
                debug!(
                    "event=save_changes module=repo status=ok changes={} duration_ms={}",
                    total,
                    started_at.elapsed().as_millis()
                );
                Ok(total)
            }
            Err(err) => {
                error!(
                    "event=save_changes module=repo status=error changes={} duration_ms={} error={}",
                    total,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn begin_transaction(&mut self) -> RepoResult<()> {
        if self.transaction.is_none() {
            self.transaction = Some(Transaction::new_unchecked(
                self.conn,
                TransactionBehavior::Immediate,
            )?);
        }
        Ok(())
    }

    fn commit_transaction(&mut self) -> RepoResult<()> {
        if let Some(tx) = self.transaction.take() {
            tx.commit()?;
        }
        Ok(())
    }

    fn rollback_transaction(&mut self) -> RepoResult<()> {
        if let Some(tx) = self.transaction.take() {
            tx.rollback()?;
        }
        Ok(())
    }
}
