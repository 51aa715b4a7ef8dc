use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use crate::EngineError;

/// Basis points in a whole (100%).
///
/// Percent weights are carried as integer basis points so the 100% sum check
/// is exact integer equality, never a float comparison.
pub const BASIS_POINTS_PER_WHOLE: i64 = 10_000;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (expense totals,
/// per-member shares) to avoid floating-point drift. Floats exist only at the
/// wire boundary, where [`from_major_units`] converts them once.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// [`from_major_units`]: MoneyCents::from_major_units
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Converts a major-unit decimal (e.g. `12.50`) into cents.
    ///
    /// Rounds to the nearest cent, ties away from zero (`0.125` → 13 cents).
    ///
    /// Validation rules:
    /// - rejects non-finite input
    /// - rejects zero and negative input
    /// - rejects input that rounds to zero cents or exceeds the `i64` range
    pub fn from_major_units(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(
                "amount must be a finite number".to_string(),
            ));
        }
        if value <= 0.0 {
            return Err(EngineError::InvalidAmount(
                "amount must be positive".to_string(),
            ));
        }

        let cents = (value * 100.0).round();
        if cents >= i64::MAX as f64 {
            return Err(EngineError::InvalidAmount(
                "amount too large".to_string(),
            ));
        }
        if cents < 1.0 {
            return Err(EngineError::InvalidAmount(
                "amount rounds to zero".to_string(),
            ));
        }
        Ok(Self(cents as i64))
    }

    /// Integer division by `n` participants.
    ///
    /// Returns the floored quotient and a remainder in `[0, n)`.
    /// `n` must be positive.
    #[must_use]
    pub fn floor_div(self, n: i64) -> (MoneyCents, i64) {
        debug_assert!(n > 0);
        (MoneyCents(self.0.div_euclid(n)), self.0.rem_euclid(n))
    }

    /// Scales by a basis-point weight: `floor(self * bp / 10_000)`.
    ///
    /// Returns the floored share together with the discarded sub-cent
    /// residue (in `cents * basis_points` units), so the caller decides what
    /// happens to the loss instead of this method rounding internally.
    #[must_use]
    pub fn scale_by_basis_points(self, basis_points: i64) -> (MoneyCents, i64) {
        debug_assert!((0..=BASIS_POINTS_PER_WHOLE).contains(&basis_points));
        let product = i128::from(self.0) * i128::from(basis_points);
        let share = product.div_euclid(i128::from(BASIS_POINTS_PER_WHOLE));
        let residue = product.rem_euclid(i128::from(BASIS_POINTS_PER_WHOLE));
        (MoneyCents(share as i64), residue as i64)
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }
}

/// Converts a decimal percent weight (`0.0..=100.0`) into basis points.
///
/// Same rounding rule as [`MoneyCents::from_major_units`]: nearest hundredth
/// of a percent, ties away from zero. Zero is a valid weight here; a
/// participant may carry 0% of an expense.
pub fn basis_points_from_percent(percent: f64) -> Result<i64, EngineError> {
    if !percent.is_finite() {
        return Err(EngineError::InvalidAmount(
            "percent weight must be a finite number".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&percent) {
        return Err(EngineError::InvalidAmount(
            "percent weight must be between 0 and 100".to_string(),
        ));
    }
    Ok((percent * 100.0).round() as i64)
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{major}.{cents:02}")
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}

impl SubAssign for MoneyCents {
    fn sub_assign(&mut self, rhs: MoneyCents) {
        self.0 -= rhs.0;
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}
