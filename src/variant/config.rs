//! Arithmetic configuration for the default numeric engine.
//!
//! [`ArithmeticConfig`] selects how [`crate::variant::StandardEngine`] handles the two raw-scalar
//! corner cases that have no single obvious answer: integer overflow and integer division by
//! zero. Floating-point arithmetic always follows IEEE-754 and is not configurable.
//!
//! # Configuration Presets
//!
//! - [`ArithmeticConfig::strict()`] - Wrapping overflow, division by zero poisons to `Nil`
//! - [`ArithmeticConfig::lenient()`] - Saturating overflow, division by zero yields `0`
//!
//! # Example
//!
//! ```rust
//! use netvariant::variant::{ArithmeticConfig, DivisionPolicy, OverflowPolicy};
//!
//! // Use a preset
//! let config = ArithmeticConfig::lenient();
//! assert_eq!(config.division_by_zero, DivisionPolicy::Zero);
//!
//! // Or customize
//! let config = ArithmeticConfig::new().with_overflow(OverflowPolicy::Saturating);
//! assert_eq!(config.division_by_zero, DivisionPolicy::Poison);
//! ```

/// Behavior of integer division when the divisor is zero.
///
/// The choice is deterministic for a given configuration and never aborts the process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DivisionPolicy {
    /// The left operand becomes `Nil`, consistent with kind-mismatch poisoning.
    #[default]
    Poison,

    /// The result is `0` of the promoted result sub-kind.
    Zero,
}

/// Behavior of integer arithmetic whose result does not fit the promoted result sub-kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Two's complement wrap-around at the result width.
    #[default]
    Wrapping,

    /// Clamp to the minimum or maximum of the result sub-kind.
    Saturating,
}

/// Configuration for [`crate::variant::StandardEngine`].
///
/// The default configuration is identical to [`ArithmeticConfig::strict()`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArithmeticConfig {
    /// Integer division by zero handling.
    pub division_by_zero: DivisionPolicy,

    /// Integer overflow handling.
    pub overflow: OverflowPolicy,
}

impl ArithmeticConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrapping overflow; division by zero poisons the result to `Nil`.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            division_by_zero: DivisionPolicy::Poison,
            overflow: OverflowPolicy::Wrapping,
        }
    }

    /// Saturating overflow; division by zero yields zero.
    ///
    /// Suited to configuration values and counters, where a numeric result is always preferred
    /// over `Nil`.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            division_by_zero: DivisionPolicy::Zero,
            overflow: OverflowPolicy::Saturating,
        }
    }

    /// Sets the division-by-zero policy.
    #[must_use]
    pub fn with_division_by_zero(mut self, policy: DivisionPolicy) -> Self {
        self.division_by_zero = policy;
        self
    }

    /// Sets the overflow policy.
    #[must_use]
    pub fn with_overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_strict() {
        assert_eq!(ArithmeticConfig::default(), ArithmeticConfig::strict());
    }

    #[test]
    fn test_builder() {
        let config = ArithmeticConfig::strict()
            .with_division_by_zero(DivisionPolicy::Zero)
            .with_overflow(OverflowPolicy::Saturating);
        assert_eq!(config, ArithmeticConfig::lenient());
    }
}
