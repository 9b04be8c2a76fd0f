//! Domain rule violations raised by value objects.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rule violations raised while building value objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    EmptyName,
    InvalidNameLength { min: usize, max: usize },
    InvalidName,
    EmptyCpf,
    InvalidCpfLength { expected: usize },
    RepeatedCpfDigits,
    InvalidCpfChecksum,
    AnsCodeNotNumeric,
    AnsCodeLeadingZero,
    InvalidAnsCodeLength { expected: usize },
    FutureBirthDate,
    InvalidAge { max: i32 },
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::InvalidNameLength { min, max } => {
                write!(f, "name must contain between {min} and {max} characters")
            }
            Self::InvalidName => write!(f, "name contains invalid characters"),
            Self::EmptyCpf => write!(f, "CPF cannot be empty"),
            Self::InvalidCpfLength { expected } => {
                write!(f, "CPF must contain {expected} digits")
            }
            Self::RepeatedCpfDigits => write!(f, "CPF cannot be made of a single repeated digit"),
            Self::InvalidCpfChecksum => write!(f, "CPF is invalid"),
            Self::AnsCodeNotNumeric => write!(f, "ANS code must contain only digits"),
            Self::AnsCodeLeadingZero => write!(f, "ANS code cannot start with zero"),
            Self::InvalidAnsCodeLength { expected } => {
                write!(f, "ANS code must contain exactly {expected} digits")
            }
            Self::FutureBirthDate => write!(f, "birth date cannot be in the future"),
            Self::InvalidAge { max } => write!(f, "maximum allowed age is {max} years"),
        }
    }
}

impl Error for DomainError {}
