//! Identity and audit stamps shared by every persisted entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Stable identifier of a persisted entity.
pub type EntityId = Uuid;

/// Creation, modification and tombstone timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AuditStamps {
    /// Stamps for an entity created now.
    pub fn new() -> Self {
        Self::created_at(Utc::now())
    }

    pub fn created_at(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            updated_at: None,
            deleted_at: None,
        }
    }
}

impl Default for AuditStamps {
    fn default() -> Self {
        Self::new()
    }
}

/// Common behavior of persisted entities.
///
/// Audit timestamps are written by the persistence layer's audit
/// interceptor; domain code never calls the stamping methods directly.
pub trait Entity: Clone {
    fn id(&self) -> EntityId;
    fn audit(&self) -> &AuditStamps;
    fn audit_mut(&mut self) -> &mut AuditStamps;

    /// Records a modification time.
    fn update_entity(&mut self, now: DateTime<Utc>) {
        self.audit_mut().updated_at = Some(now);
    }

    /// Records a soft-delete tombstone.
    fn delete_entity(&mut self, now: DateTime<Utc>) {
        self.audit_mut().deleted_at = Some(now);
    }

    fn is_deleted(&self) -> bool {
        self.audit().deleted_at.is_some()
    }
}
