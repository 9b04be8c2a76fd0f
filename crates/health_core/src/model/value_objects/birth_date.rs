use crate::model::error::DomainError;
use chrono::{Datelike, NaiveDate, Utc};
use std::fmt::{Display, Formatter};

/// Date of birth, never in the future and at most `MAXIMUM_AGE` years back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    pub const MAXIMUM_AGE: i32 = 150;

    /// Validates against today's UTC date.
    pub fn create(value: NaiveDate) -> Result<Self, DomainError> {
        Self::create_at(value, Utc::now().date_naive())
    }

    /// Validates against an explicit reference date.
    pub fn create_at(value: NaiveDate, today: NaiveDate) -> Result<Self, DomainError> {
        if value > today {
            return Err(DomainError::FutureBirthDate);
        }

        if Self::calculate_age(value, today) > Self::MAXIMUM_AGE {
            return Err(DomainError::InvalidAge {
                max: Self::MAXIMUM_AGE,
            });
        }

        Ok(Self(value))
    }

    /// Age in calendar years, counted by year number only.
    pub fn calculate_age(birth_date: NaiveDate, today: NaiveDate) -> i32 {
        today.year() - birth_date.year()
    }

    pub fn age(&self) -> i32 {
        Self::calculate_age(self.0, Utc::now().date_naive())
    }

    pub fn value(&self) -> NaiveDate {
        self.0
    }
}

/// Renders as `dd/mm/yyyy`.
impl Display for BirthDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%d/%m/%Y"))
    }
}

#[cfg(test)]
mod tests {
    use super::BirthDate;
    use crate::model::error::DomainError;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn create_at_accepts_today_and_formats_brazilian_style() {
        let today = date(2025, 11, 14);
        let birth = BirthDate::create_at(today, today).unwrap();
        assert_eq!(birth.to_string(), "14/11/2025");
    }

    #[test]
    fn create_at_rejects_future_dates() {
        let today = date(2025, 11, 14);
        assert_eq!(
            BirthDate::create_at(date(2025, 11, 15), today).unwrap_err(),
            DomainError::FutureBirthDate
        );
    }

    #[test]
    fn create_at_bounds_age_by_year_difference() {
        let today = date(2025, 1, 1);
        assert!(BirthDate::create_at(date(1875, 12, 31), today).is_ok());
        assert_eq!(
            BirthDate::create_at(date(1874, 12, 31), today).unwrap_err(),
            DomainError::InvalidAge { max: 150 }
        );
    }
}
