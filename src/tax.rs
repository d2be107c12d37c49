//! Marriage penalty / bonus calculator.
//!
//! Compares two people's federal income tax filed as single against the tax
//! on their combined income filed jointly. Wage income only: no credits,
//! itemized deductions or capital-gains rates.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedJoint,
}

#[derive(Debug, Error, PartialEq)]
pub enum TaxError {
    #[error("unsupported tax year {0} (supported: 2023, 2024)")]
    UnsupportedYear(u16),

    #[error("{field} must be a non-negative amount no greater than 1e12")]
    InvalidIncome { field: &'static str },
}

pub const DEFAULT_YEAR: u16 = 2024;

/// Largest income accepted; keeps every intermediate sum representable to the cent.
pub const MAX_INCOME: f64 = 1e12;

/// Upper bound of each bracket and its marginal rate; the last bracket is
/// unbounded.
type Schedule = &'static [(f64, f64)];

struct YearTable {
    single: Schedule,
    joint: Schedule,
    deduction_single: f64,
    deduction_joint: f64,
}

static TABLE_2023: YearTable = YearTable {
    single: &[
        (11_000.0, 0.10),
        (44_725.0, 0.12),
        (95_375.0, 0.22),
        (182_100.0, 0.24),
        (231_250.0, 0.32),
        (578_125.0, 0.35),
        (f64::INFINITY, 0.37),
    ],
    joint: &[
        (22_000.0, 0.10),
        (89_450.0, 0.12),
        (190_750.0, 0.22),
        (364_200.0, 0.24),
        (462_500.0, 0.32),
        (693_750.0, 0.35),
        (f64::INFINITY, 0.37),
    ],
    deduction_single: 13_850.0,
    deduction_joint: 27_700.0,
};

static TABLE_2024: YearTable = YearTable {
    single: &[
        (11_600.0, 0.10),
        (47_150.0, 0.12),
        (100_525.0, 0.22),
        (191_950.0, 0.24),
        (243_725.0, 0.32),
        (609_350.0, 0.35),
        (f64::INFINITY, 0.37),
    ],
    joint: &[
        (23_200.0, 0.10),
        (94_300.0, 0.12),
        (201_050.0, 0.22),
        (383_900.0, 0.24),
        (487_450.0, 0.32),
        (731_200.0, 0.35),
        (f64::INFINITY, 0.37),
    ],
    deduction_single: 14_600.0,
    deduction_joint: 29_200.0,
};

fn table(year: u16) -> Result<&'static YearTable, TaxError> {
    match year {
        2023 => Ok(&TABLE_2023),
        2024 => Ok(&TABLE_2024),
        other => Err(TaxError::UnsupportedYear(other)),
    }
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn check_income(field: &'static str, income: f64) -> Result<(), TaxError> {
    if (0.0..=MAX_INCOME).contains(&income) {
        Ok(())
    } else {
        Err(TaxError::InvalidIncome { field })
    }
}

/// Federal tax owed on `income` of wages after the standard deduction.
pub fn compute_tax(income: f64, status: FilingStatus, year: u16) -> Result<f64, TaxError> {
    check_income("income", income)?;
    let t = table(year)?;
    let (schedule, deduction) = match status {
        FilingStatus::Single => (t.single, t.deduction_single),
        FilingStatus::MarriedJoint => (t.joint, t.deduction_joint),
    };

    let taxable = (income - deduction).max(0.0);
    let mut owed = 0.0;
    let mut floor = 0.0;

    for &(ceiling, rate) in schedule {
        if taxable <= floor {
            break;
        }
        owed += (taxable.min(ceiling) - floor) * rate;
        floor = ceiling;
    }

    Ok(round_cents(owed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Penalty,
    Bonus,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarriageTaxComparison {
    pub year: u16,
    pub single_a: f64,
    pub single_b: f64,
    pub combined_single: f64,
    pub married_joint: f64,
    /// Joint minus combined single; positive is a penalty.
    pub difference: f64,
    pub outcome: Outcome,
}

pub fn compare(income_a: f64, income_b: f64, year: u16) -> Result<MarriageTaxComparison, TaxError> {
    check_income("income_a", income_a)?;
    check_income("income_b", income_b)?;

    let single_a = compute_tax(income_a, FilingStatus::Single, year)?;
    let single_b = compute_tax(income_b, FilingStatus::Single, year)?;
    let married_joint = compute_tax(income_a + income_b, FilingStatus::MarriedJoint, year)?;
    let combined_single = round_cents(single_a + single_b);
    let difference = round_cents(married_joint - combined_single);

    let outcome = if difference > 0.0 {
        Outcome::Penalty
    } else if difference < 0.0 {
        Outcome::Bonus
    } else {
        Outcome::Neutral
    };

    Ok(MarriageTaxComparison {
        year,
        single_a,
        single_b,
        combined_single,
        married_joint,
        difference,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_standard_deduction_owes_nothing() {
        assert_eq!(compute_tax(10_000.0, FilingStatus::Single, 2024), Ok(0.0));
        assert_eq!(compute_tax(0.0, FilingStatus::MarriedJoint, 2023), Ok(0.0));
    }

    #[test]
    fn test_single_2024_known_value() {
        // taxable 85_400: 1160 + 4266 + 8415
        assert_eq!(compute_tax(100_000.0, FilingStatus::Single, 2024), Ok(13_841.0));
    }

    #[test]
    fn test_joint_2023_known_value() {
        // taxable 72_300: 2200 + 6036
        assert_eq!(compute_tax(100_000.0, FilingStatus::MarriedJoint, 2023), Ok(8_236.0));
    }

    #[test]
    fn test_top_bracket_reached() {
        let low = compute_tax(1_000_000.0, FilingStatus::Single, 2024).unwrap();
        let high = compute_tax(1_000_100.0, FilingStatus::Single, 2024).unwrap();
        assert!((high - low - 37.0).abs() < 0.01);
    }

    #[test]
    fn test_equal_moderate_incomes_are_neutral() {
        let c = compare(60_000.0, 60_000.0, 2024).unwrap();
        assert_eq!(c.outcome, Outcome::Neutral);
        assert_eq!(c.married_joint, c.combined_single);
    }

    #[test]
    fn test_single_earner_gets_bonus() {
        let c = compare(150_000.0, 0.0, 2024).unwrap();
        assert_eq!(c.outcome, Outcome::Bonus);
        assert!(c.difference < 0.0);
    }

    #[test]
    fn test_high_equal_incomes_get_penalty() {
        // joint 35% bracket starts below twice the single 35% bracket
        let c = compare(700_000.0, 700_000.0, 2024).unwrap();
        assert_eq!(c.outcome, Outcome::Penalty);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            compare(-1.0, 0.0, 2024),
            Err(TaxError::InvalidIncome { field: "income_a" })
        );
        assert_eq!(
            compare(0.0, f64::NAN, 2024),
            Err(TaxError::InvalidIncome { field: "income_b" })
        );
        assert_eq!(compare(1.0, 1.0, 1999), Err(TaxError::UnsupportedYear(1999)));
    }

    #[test]
    fn test_rejects_income_above_cap() {
        assert_eq!(
            compare(1e307, 1e307, 2024),
            Err(TaxError::InvalidIncome { field: "income_a" })
        );
        assert_eq!(
            compute_tax(f64::INFINITY, FilingStatus::Single, 2024),
            Err(TaxError::InvalidIncome { field: "income" })
        );

        let c = compare(MAX_INCOME, MAX_INCOME, 2024).unwrap();
        assert!(c.difference.is_finite());
        assert_eq!(c.outcome, Outcome::Penalty);
    }
}
