//! Self-validating value objects.
//!
//! Each type owns its normalized representation and can only be produced by
//! a constructor that enforces the rule set, so holding one is proof of
//! validity.

mod ans_registration_code;
mod birth_date;
mod cpf;
mod name;

pub use ans_registration_code::AnsRegistrationCode;
pub use birth_date::BirthDate;
pub use cpf::Cpf;
pub use name::{Name, NAME_PATTERN};
pub(crate) use name::NAME_RE;
