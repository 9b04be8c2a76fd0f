use crate::model::error::DomainError;
use std::fmt::{Display, Formatter};

/// Brazilian individual taxpayer id, stored as eleven bare digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cpf(String);

impl Cpf {
    pub const CPF_LENGTH: usize = 11;

    /// Sanitizes punctuation away and validates both check digits.
    pub fn create(value: &str) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::EmptyCpf);
        }

        let sanitized = Self::sanitize(value);
        Self::validate(&sanitized)?;
        Ok(Self(sanitized))
    }

    /// Checks length, repeated digits and the two mod-11 check digits.
    pub fn validate(cpf: &str) -> Result<(), DomainError> {
        if cpf.len() != Self::CPF_LENGTH || !cpf.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidCpfLength {
                expected: Self::CPF_LENGTH,
            });
        }

        let digits: Vec<u32> = cpf.bytes().map(|b| u32::from(b - b'0')).collect();
        if digits.iter().all(|digit| *digit == digits[0]) {
            return Err(DomainError::RepeatedCpfDigits);
        }

        if digits[9] != check_digit(&digits[..9]) || digits[10] != check_digit(&digits[..10]) {
            return Err(DomainError::InvalidCpfChecksum);
        }

        Ok(())
    }

    /// Keeps only ASCII digits.
    pub fn sanitize(document: &str) -> String {
        document.chars().filter(char::is_ascii_digit).collect()
    }

    /// Formats eleven digits as `XXX.XXX.XXX-XX`; other inputs are returned unchanged.
    pub fn format(document: &str) -> String {
        if document.len() != Self::CPF_LENGTH || !document.is_ascii() {
            return document.to_string();
        }
        format!(
            "{}.{}.{}-{}",
            &document[..3],
            &document[3..6],
            &document[6..9],
            &document[9..11]
        )
    }

    /// Bare digits, as persisted.
    pub fn value(&self) -> &str {
        &self.0
    }
}

/// Mod-11 check digit where weights run from `len + 1` down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let top_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(index, digit)| digit * (top_weight - index as u32))
        .sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

impl Display for Cpf {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&Self::format(&self.0))
    }
}
