//! Currency handling and major-to-minor unit conversion.
//!
//! The deployment charges in exactly one active currency. The multiplier from
//! major to minor units is looked up per currency rather than assumed to be
//! 100, so zero-decimal currencies convert correctly.

use crate::domain::foundation::ValidationError;

/// Minor-unit factors for currencies the provider settles in.
const BUILTIN_FACTORS: &[(&str, u32)] = &[
    ("KES", 100),
    ("NGN", 100),
    ("GHS", 100),
    ("ZAR", 100),
    ("USD", 100),
    ("EUR", 100),
    ("GBP", 100),
    ("XOF", 1),
    ("JPY", 1),
];

/// Looks up the built-in minor-unit factor for an ISO currency code.
pub fn builtin_minor_unit_factor(code: &str) -> Option<u32> {
    BUILTIN_FACTORS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, f)| *f)
}

/// The single currency this deployment charges in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCurrency {
    code: String,
    minor_unit_factor: u32,
}

impl ActiveCurrency {
    /// Resolves the active currency, preferring an explicit factor override.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the code is blank, the override is zero,
    /// or no factor is known for the code.
    pub fn resolve(code: &str, factor_override: Option<u32>) -> Result<Self, ValidationError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ValidationError::empty_field("active_currency"));
        }
        let minor_unit_factor = match factor_override {
            Some(0) => {
                return Err(ValidationError::out_of_range(
                    "minor_unit_factor",
                    "must be at least 1",
                ))
            }
            Some(f) => f,
            None => builtin_minor_unit_factor(code).ok_or_else(|| {
                ValidationError::invalid_format(
                    "active_currency",
                    format!("no minor-unit factor known for '{}'", code),
                )
            })?,
        };
        Ok(Self {
            code: code.to_ascii_uppercase(),
            minor_unit_factor,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn minor_unit_factor(&self) -> u32 {
        self.minor_unit_factor
    }

    /// Exact match, as required for caller-supplied currencies.
    pub fn accepts(&self, requested: &str) -> bool {
        requested == self.code
    }

    /// Lenient match used when auditing provider-reported currencies.
    pub fn matches_reported(&self, reported: &str) -> bool {
        reported.trim().eq_ignore_ascii_case(&self.code)
    }

    /// Converts a major-unit amount to minor units, rounding to nearest.
    ///
    /// # Errors
    ///
    /// Rejects non-finite or non-positive amounts, amounts that round to zero
    /// minor units, and amounts that do not fit in an `i64`.
    pub fn to_minor_units(&self, amount: f64) -> Result<i64, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::invalid_format("amount", "must be a finite number"));
        }
        if amount <= 0.0 {
            return Err(ValidationError::out_of_range("amount", "must be positive"));
        }
        let minor = (amount * f64::from(self.minor_unit_factor)).round();
        if minor < 1.0 {
            return Err(ValidationError::out_of_range(
                "amount",
                "rounds to zero minor units",
            ));
        }
        if minor >= i64::MAX as f64 {
            return Err(ValidationError::out_of_range("amount", "too large"));
        }
        Ok(minor as i64)
    }
}
