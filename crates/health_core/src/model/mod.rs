//! Domain model for health plans and their beneficiaries.
//!
//! # Responsibility
//! - Define entities and the value objects that guard their invariants.
//! - Keep every business rule independent from storage and transport.
//!
//! # Invariants
//! - Value objects can only be built through validating constructors.
//! - Every entity is identified by a stable `EntityId`.
//! - Deletion is represented by a `deleted_at` tombstone, never a hard delete.

pub mod beneficiary;
pub mod entity;
pub mod error;
pub mod health_plan;
pub mod value_objects;
