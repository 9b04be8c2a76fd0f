//! Cross-cutting persistence hooks.
//!
//! # Responsibility
//! - Stamp audit timestamps and turn deletes into soft deletes before save.
//! - Rewrite read statements so `LIKE` matching ignores Unicode case.
//!
//! # Invariants
//! - After save interceptors run, no pending change is in `Deleted` state.

use crate::db::CASEFOLD_FUNCTION;
use crate::repo::{ChangeEntry, EntityState};
use chrono::{DateTime, Utc};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static LIKE_OPERAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_][A-Za-z0-9_.]*)\s+LIKE\s+(\?[0-9]*)").expect("valid LIKE regex")
});

/// Hook run over pending changes right before they are written.
pub trait SaveChangesInterceptor: Send + Sync {
    fn saving_changes(&self, entries: &mut [&mut dyn ChangeEntry], now: DateTime<Utc>);
}

/// Hook run over read statements right before they are prepared.
pub trait CommandInterceptor: Send + Sync {
    fn reader_executing(&self, sql: String) -> String;
}

/// Stamps `updated_at` on modifications and converts deletes into tombstones.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditInterceptor;

impl SaveChangesInterceptor for AuditInterceptor {
    fn saving_changes(&self, entries: &mut [&mut dyn ChangeEntry], now: DateTime<Utc>) {
        for entry in entries.iter_mut() {
            match entry.state() {
                EntityState::Added => {}
                EntityState::Modified => entry.mark_updated(now),
                EntityState::Deleted => {
                    entry.set_state(EntityState::Modified);
                    entry.mark_deleted(now);
                    debug!(
                        "event=soft_delete module=repo status=ok id={}",
                        entry.entity_id()
                    );
                }
            }
        }
    }
}

/// Rewrites `<column> LIKE <param>` into a Unicode case-folded comparison.
#[derive(Debug, Default, Clone, Copy)]
pub struct CaseInterceptor;

impl CaseInterceptor {
    pub fn make_like_case_insensitive(sql: &str) -> String {
        if !sql.contains("LIKE") {
            return sql.to_string();
        }
        LIKE_OPERAND_RE
            .replace_all(
                sql,
                format!("{CASEFOLD_FUNCTION}($1) LIKE {CASEFOLD_FUNCTION}($2)").as_str(),
            )
            .into_owned()
    }
}

impl CommandInterceptor for CaseInterceptor {
    fn reader_executing(&self, sql: String) -> String {
        Self::make_like_case_insensitive(&sql)
    }
}

/// Interceptor chains shared by every unit of work on a connection.
pub struct Interceptors {
    save: Vec<Box<dyn SaveChangesInterceptor>>,
    command: Vec<Box<dyn CommandInterceptor>>,
}

impl Interceptors {
    /// No hooks at all; reads and writes go through unchanged.
    pub fn empty() -> Self {
        Self {
            save: Vec::new(),
            command: Vec::new(),
        }
    }

    pub fn with_save(mut self, interceptor: impl SaveChangesInterceptor + 'static) -> Self {
        self.save.push(Box::new(interceptor));
        self
    }

    pub fn with_command(mut self, interceptor: impl CommandInterceptor + 'static) -> Self {
        self.command.push(Box::new(interceptor));
        self
    }

    pub fn saving_changes(&self, entries: &mut [&mut dyn ChangeEntry], now: DateTime<Utc>) {
        for interceptor in &self.save {
            interceptor.saving_changes(entries, now);
        }
    }

    pub fn reader_executing(&self, sql: String) -> String {
        self.command
            .iter()
            .fold(sql, |sql, interceptor| interceptor.reader_executing(sql))
    }
}

/// Audit and case-insensitive search hooks.
impl Default for Interceptors {
    fn default() -> Self {
        Self::empty()
            .with_save(AuditInterceptor)
            .with_command(CaseInterceptor)
    }
}

#[cfg(test)]
mod tests {
    use super::{AuditInterceptor, CaseInterceptor, Interceptors, SaveChangesInterceptor};
    use crate::model::health_plan::HealthPlan;
    use crate::repo::{ChangeEntry, EntityState, Tracked};
    use chrono::Utc;

    fn tracked(state: EntityState) -> Tracked<HealthPlan> {
        Tracked {
            entity: HealthPlan::create("Plano Ouro", "123456").unwrap(),
            state,
        }
    }

    #[test]
    fn audit_interceptor_stamps_and_soft_deletes() {
        let now = Utc::now();
        let mut added = tracked(EntityState::Added);
        let mut modified = tracked(EntityState::Modified);
        let mut deleted = tracked(EntityState::Deleted);

        {
            let mut entries: [&mut dyn ChangeEntry; 3] = [&mut added, &mut modified, &mut deleted];
            AuditInterceptor.saving_changes(&mut entries, now);
        }

        assert_eq!(added.state, EntityState::Added);
        assert!(added.entity.audit.updated_at.is_none());
        assert_eq!(modified.entity.audit.updated_at, Some(now));
        assert_eq!(deleted.state, EntityState::Modified);
        assert_eq!(deleted.entity.audit.deleted_at, Some(now));
    }

    #[test]
    fn case_interceptor_wraps_both_like_operands() {
        let sql = "SELECT id FROM health_plans WHERE deleted_at IS NULL AND name LIKE ? ESCAPE '\\' AND ans_registration_code LIKE ?2";
        assert_eq!(
            CaseInterceptor::make_like_case_insensitive(sql),
            "SELECT id FROM health_plans WHERE deleted_at IS NULL AND casefold(name) LIKE casefold(?) ESCAPE '\\' AND casefold(ans_registration_code) LIKE casefold(?2)"
        );
    }

    #[test]
    fn case_interceptor_leaves_statements_without_like_alone() {
        let sql = "SELECT id FROM health_plans WHERE id = ?";
        assert_eq!(CaseInterceptor::make_like_case_insensitive(sql), sql);
    }

    #[test]
    fn empty_chain_is_a_passthrough() {
        let sql = "SELECT id FROM beneficiaries WHERE full_name LIKE ?".to_string();
        assert_eq!(Interceptors::empty().reader_executing(sql.clone()), sql);
        assert_ne!(Interceptors::default().reader_executing(sql.clone()), sql);
    }
}
