use crate::model::error::DomainError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

/// Letters (Latin-1 accents included) in words separated by a single space,
/// apostrophe or hyphen.
pub const NAME_PATTERN: &str = r"^[A-Za-zÀ-ÖØ-öø-ÿ]+([ '-][A-Za-zÀ-ÖØ-öø-ÿ]+)*$";

/// Compiled [`NAME_PATTERN`], shared with request validation.
pub(crate) static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(NAME_PATTERN).expect("valid name regex"));

/// Person or plan name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
    pub const MIN_LENGTH: usize = 5;
    pub const MAX_LENGTH: usize = 255;

    /// Trims and validates a name.
    ///
    /// Lengths are exclusive bounds: a trimmed name must be longer than
    /// `MIN_LENGTH` and shorter than `MAX_LENGTH` characters.
    pub fn create(value: &str) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyName);
        }

        let length = trimmed.chars().count();
        if length <= Self::MIN_LENGTH || length >= Self::MAX_LENGTH {
            return Err(DomainError::InvalidNameLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
            });
        }

        if !Self::matches_pattern(trimmed) {
            return Err(DomainError::InvalidName);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns whether `value` matches [`NAME_PATTERN`].
    pub fn matches_pattern(value: &str) -> bool {
        NAME_RE.is_match(value)
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Name;
    use crate::model::error::DomainError;

    #[test]
    fn create_trims_and_accepts_accented_names() {
        let name = Name::create("  João D'Ávila-Souza ").unwrap();
        assert_eq!(name.value(), "João D'Ávila-Souza");
        assert_eq!(name.to_string(), "João D'Ávila-Souza");
    }

    #[test]
    fn create_rejects_blank_values() {
        assert_eq!(Name::create("   \n").unwrap_err(), DomainError::EmptyName);
    }

    #[test]
    fn create_uses_exclusive_length_bounds() {
        assert!(matches!(
            Name::create("Maria").unwrap_err(),
            DomainError::InvalidNameLength { min: 5, max: 255 }
        ));
        assert!(Name::create("Marian").is_ok());
        assert!(Name::create(&"a".repeat(254)).is_ok());
        assert!(matches!(
            Name::create(&"a".repeat(255)).unwrap_err(),
            DomainError::InvalidNameLength { .. }
        ));
    }

    #[test]
    fn create_rejects_digits_and_doubled_separators() {
        assert_eq!(Name::create("Plano 123").unwrap_err(), DomainError::InvalidName);
        assert_eq!(Name::create("Plano  Saude").unwrap_err(), DomainError::InvalidName);
        assert_eq!(Name::create("Plano@Saude").unwrap_err(), DomainError::InvalidName);
    }
}
