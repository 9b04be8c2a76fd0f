use crate::model::error::DomainError;
use std::fmt::{Display, Formatter};

/// Health-agency (ANS) operator registration code: six digits, no leading zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnsRegistrationCode(String);

impl AnsRegistrationCode {
    pub const CODE_LENGTH: usize = 6;

    pub fn create(value: &str) -> Result<Self, DomainError> {
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::AnsCodeNotNumeric);
        }

        if value.starts_with('0') {
            return Err(DomainError::AnsCodeLeadingZero);
        }

        if value.len() != Self::CODE_LENGTH {
            return Err(DomainError::InvalidAnsCodeLength {
                expected: Self::CODE_LENGTH,
            });
        }

        Ok(Self(value.to_string()))
    }

    /// Bare digits, as persisted.
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Renders as `ANS-<digits>`.
impl Display for AnsRegistrationCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ANS-{}", self.0)
    }
}
