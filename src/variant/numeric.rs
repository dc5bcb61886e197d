//! Raw-scalar arithmetic.
//!
//! The merge policies of [`crate::Variant`] arithmetic only decide what happens for strings,
//! dictionaries and `Nil`. Once both operands are scalars the operation is handed to a
//! [`NumericEngine`], which owns sub-kind promotion, overflow and division by zero.
//!
//! [`StandardEngine`] is the engine used by the operator traits. It follows the C usual
//! arithmetic conversions:
//!
//! | Step | Rule |
//! |------|------|
//! | Integer promotion | `Bool`, 8- and 16-bit sub-kinds become `I32` |
//! | Result sub-kind | the higher rank of `I32 < U32 < I64 < U64 < Float < Double` |
//! | Floating point | computed in `f64`, stored as `f32` for `Float`, IEEE-754 semantics |
//! | Integer overflow | [`OverflowPolicy`] at the result width |
//! | Integer division by zero | [`DivisionPolicy`] |

use strum::{Display, EnumCount, EnumIter};
use tracing::trace;

use crate::variant::{
    config::{ArithmeticConfig, DivisionPolicy, OverflowPolicy},
    raw::{Raw, RawKind},
    value::Variant,
};

/// The four binary arithmetic operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ArithmeticOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
}

/// Performs arithmetic between two scalar values.
///
/// Implementations are invoked with two `Raw` operands and mutate `left` in place. They must be
/// total: an operation that has no numeric result (for example a division by zero under a
/// poisoning policy) turns `left` into `Nil` or into a documented sentinel, never panics.
///
/// # Examples
///
/// ```rust
/// use netvariant::variant::{ArithmeticOp, NumericEngine, StandardEngine};
/// use netvariant::Variant;
///
/// let mut value = Variant::from(7_i32);
/// StandardEngine::default().perform(&mut value, &Variant::from(2_i32), ArithmeticOp::Div);
/// assert_eq!(value, Variant::from(3_i32));
/// ```
pub trait NumericEngine {
    /// Applies `op` to `left` and `right`, storing the result in `left`.
    fn perform(&self, left: &mut Variant, right: &Variant, op: ArithmeticOp);
}

/// The default [`NumericEngine`], configured by an [`ArithmeticConfig`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StandardEngine {
    config: ArithmeticConfig,
}

impl StandardEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub const fn new(config: ArithmeticConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ArithmeticConfig {
        &self.config
    }

    /// Result sub-kind of an operation between `left` and `right`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use netvariant::variant::{RawKind, StandardEngine};
    ///
    /// assert_eq!(StandardEngine::promote(RawKind::U8, RawKind::I16), RawKind::I32);
    /// assert_eq!(StandardEngine::promote(RawKind::I32, RawKind::U32), RawKind::U32);
    /// assert_eq!(StandardEngine::promote(RawKind::U64, RawKind::Float), RawKind::Float);
    /// ```
    #[must_use]
    pub fn promote(left: RawKind, right: RawKind) -> RawKind {
        left.max(right).max(RawKind::I32)
    }

    /// Computes `left op right`.
    ///
    /// Returns `None` when the result is poisoned, which only happens for integer division by
    /// zero under [`DivisionPolicy::Poison`].
    #[must_use]
    pub fn compute(&self, left: Raw, right: Raw, op: ArithmeticOp) -> Option<Raw> {
        let kind = Self::promote(left.kind(), right.kind());
        if kind.is_floating() {
            let (l, r) = (left.as_f64(), right.as_f64());
            let value = match op {
                ArithmeticOp::Add => l + r,
                ArithmeticOp::Sub => l - r,
                ArithmeticOp::Mul => l * r,
                ArithmeticOp::Div => l / r,
            };
            return Some(Raw::from_f64(kind, value));
        }

        let (l, r) = (widen(kind, left.bits()), widen(kind, right.bits()));
        if op == ArithmeticOp::Div && r == 0 {
            return match self.config.division_by_zero {
                DivisionPolicy::Poison => None,
                DivisionPolicy::Zero => Some(Raw::from_bits(kind, 0)),
            };
        }

        let exact = match op {
            ArithmeticOp::Add => l.checked_add(r),
            ArithmeticOp::Sub => l.checked_sub(r),
            ArithmeticOp::Mul => l.checked_mul(r),
            ArithmeticOp::Div => l.checked_div(r),
        };
        let Some(exact) = exact else {
            // Only a product of two large `u64` operands leaves the i128 range.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let bits = match self.config.overflow {
                OverflowPolicy::Wrapping => (l as u64).wrapping_mul(r as u64),
                OverflowPolicy::Saturating => u64::MAX,
            };
            return Some(Raw::from_bits(kind, bits));
        };
        Some(self.narrow(kind, exact))
    }

    /// Fits an exact result into the range of `kind`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn narrow(&self, kind: RawKind, value: i128) -> Raw {
        match self.config.overflow {
            OverflowPolicy::Wrapping => Raw::from_bits(kind, value as u64),
            OverflowPolicy::Saturating => {
                let (min, max) = integer_range(kind);
                Raw::from_bits(kind, value.clamp(min, max) as u64)
            }
        }
    }
}

impl NumericEngine for StandardEngine {
    fn perform(&self, left: &mut Variant, right: &Variant, op: ArithmeticOp) {
        let (Some(l), Some(r)) = (left.as_raw().copied(), right.as_raw().copied()) else {
            trace!(%op, left = %left.kind(), right = %right.kind(), "non-scalar operand, result poisoned to nil");
            left.become_nil();
            return;
        };

        match self.compute(l, r, op) {
            Some(result) => *left = Variant::Raw(result),
            None => {
                trace!(%op, "integer division by zero, result poisoned to nil");
                left.become_nil();
            }
        }
    }
}

/// Reinterprets a canonical pattern at the width and signedness of `kind`.
fn widen(kind: RawKind, bits: u64) -> i128 {
    let bits = Raw::from_bits(kind, bits).bits();
    if kind.is_signed() {
        #[allow(clippy::cast_possible_wrap)]
        i128::from(bits as i64)
    } else {
        i128::from(bits)
    }
}

fn integer_range(kind: RawKind) -> (i128, i128) {
    match kind {
        RawKind::Bool => (0, 1),
        RawKind::I8 => (i8::MIN.into(), i8::MAX.into()),
        RawKind::U8 => (0, u8::MAX.into()),
        RawKind::I16 => (i16::MIN.into(), i16::MAX.into()),
        RawKind::U16 => (0, u16::MAX.into()),
        RawKind::I32 => (i32::MIN.into(), i32::MAX.into()),
        RawKind::U32 => (0, u32::MAX.into()),
        RawKind::I64 => (i64::MIN.into(), i64::MAX.into()),
        RawKind::U64 => (0, u64::MAX.into()),
        RawKind::Float | RawKind::Double => (i128::MIN, i128::MAX),
    }
}
