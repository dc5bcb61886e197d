//! Fixed-width scalar payload of a [`crate::Variant`].
//!
//! A [`Raw`] value stores its scalar as a canonical 64-bit pattern together with a [`RawKind`]
//! tag. The encoding is fixed per sub-kind so that comparing two patterns is meaningful:
//!
//! | Sub-kind | Pattern |
//! |----------|---------|
//! | `Bool` | `0` or `1` |
//! | `I8`..`I64` | sign-extended two's complement |
//! | `U8`..`U64` | zero-extended |
//! | `Float` | IEEE-754 single bits in the low 32 bits |
//! | `Double` | IEEE-754 double bits |

use std::fmt;

use strum::{Display, EnumCount, EnumIter};

/// Scalar sub-kind of a [`Raw`] value.
///
/// The declaration order is the promotion rank used by
/// [`crate::variant::StandardEngine`]; deriving `Ord` relies on it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter,
)]
pub enum RawKind {
    /// `bool`
    #[strum(serialize = "bool")]
    Bool,
    /// `i8`
    #[strum(serialize = "int8")]
    I8,
    /// `u8`
    #[strum(serialize = "uint8")]
    U8,
    /// `i16`
    #[strum(serialize = "int16")]
    I16,
    /// `u16`
    #[strum(serialize = "uint16")]
    U16,
    /// `i32`
    #[strum(serialize = "int32")]
    I32,
    /// `u32`
    #[strum(serialize = "uint32")]
    U32,
    /// `i64`
    #[strum(serialize = "int64")]
    I64,
    /// `u64`
    #[strum(serialize = "uint64")]
    U64,
    /// `f32`
    #[strum(serialize = "float")]
    Float,
    /// `f64`
    #[strum(serialize = "double")]
    Double,
}

impl RawKind {
    /// Returns `true` for `Float` and `Double`.
    #[must_use]
    pub const fn is_floating(self) -> bool {
        matches!(self, RawKind::Float | RawKind::Double)
    }

    /// Returns `true` for the signed integer sub-kinds.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            RawKind::I8 | RawKind::I16 | RawKind::I32 | RawKind::I64
        )
    }

    /// Returns `true` for the unsigned integer sub-kinds and `Bool`.
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        !self.is_floating() && !self.is_signed()
    }

    /// Width of the scalar in bits (`Bool` counts as 8).
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            RawKind::Bool | RawKind::I8 | RawKind::U8 => 8,
            RawKind::I16 | RawKind::U16 => 16,
            RawKind::I32 | RawKind::U32 | RawKind::Float => 32,
            RawKind::I64 | RawKind::U64 | RawKind::Double => 64,
        }
    }
}

/// A fixed-width scalar with its sub-kind.
///
/// `Raw` is `Copy`; assigning it is a verbatim copy of tag and pattern.
#[derive(Clone, Copy, Debug)]
pub struct Raw {
    kind: RawKind,
    bits: u64,
}

impl Raw {
    /// Builds a raw value from its tag and an already canonical pattern.
    ///
    /// The pattern is normalized for the sub-kind: integers are re-extended from their width,
    /// `Bool` collapses to `0`/`1` and `Float` keeps only the low 32 bits.
    #[must_use]
    pub const fn from_bits(kind: RawKind, bits: u64) -> Self {
        let bits = match kind {
            RawKind::Bool => (bits != 0) as u64,
            RawKind::I8 => bits as i8 as i64 as u64,
            RawKind::U8 => bits as u8 as u64,
            RawKind::I16 => bits as i16 as i64 as u64,
            RawKind::U16 => bits as u16 as u64,
            RawKind::I32 => bits as i32 as i64 as u64,
            RawKind::U32 | RawKind::Float => bits as u32 as u64,
            RawKind::I64 | RawKind::U64 | RawKind::Double => bits,
        };
        Raw { kind, bits }
    }

    /// Builds a signed integer raw of `kind`, truncating `value` to the sub-kind width.
    #[must_use]
    pub const fn from_i64(kind: RawKind, value: i64) -> Self {
        Self::from_bits(kind, value as u64)
    }

    /// Builds a raw of `kind` from an `f64`, converting numerically for integer sub-kinds
    /// (saturating, NaN to zero).
    #[must_use]
    pub fn from_f64(kind: RawKind, value: f64) -> Self {
        match kind {
            RawKind::Double => Raw::from(value),
            #[allow(clippy::cast_possible_truncation)]
            RawKind::Float => Raw::from(value as f32),
            RawKind::Bool => Raw::from(value != 0.0),
            #[allow(clippy::cast_possible_truncation)]
            k if k.is_signed() => Self::from_i64(k, value as i64),
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            k => Self::from_bits(k, value as u64),
        }
    }

    /// The scalar sub-kind.
    #[must_use]
    pub const fn kind(&self) -> RawKind {
        self.kind
    }

    /// The canonical 64-bit pattern.
    #[must_use]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Returns `true` if the sub-kind is `Float` or `Double`.
    #[must_use]
    pub const fn is_floating(&self) -> bool {
        self.kind.is_floating()
    }

    /// Numeric value as `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match self.kind {
            RawKind::Double => f64::from_bits(self.bits),
            #[allow(clippy::cast_possible_truncation)]
            RawKind::Float => f64::from(f32::from_bits(self.bits as u32)),
            k if k.is_signed() => self.bits as i64 as f64,
            _ => self.bits as f64,
        }
    }

    /// Numeric value as `i64` (floats truncate and saturate, large `u64` wraps).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn as_i64(&self) -> i64 {
        if self.is_floating() {
            self.as_f64() as i64
        } else {
            self.bits as i64
        }
    }

    /// Numeric value as `u64`.
    ///
    /// Integers return their pattern, so negative signed values wrap. Floats truncate toward
    /// zero and saturate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_u64(&self) -> u64 {
        if self.is_floating() {
            self.as_f64() as u64
        } else {
            self.bits
        }
    }

    /// Truthiness: non-zero integers and non-zero floats are `true`.
    #[must_use]
    pub fn as_bool(&self) -> bool {
        if self.is_floating() {
            self.as_f64() != 0.0
        } else {
            self.bits != 0
        }
    }

    /// Coerces to a non-negative repeat count.
    ///
    /// Fractions truncate toward zero; negative values and NaN give zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn as_count(&self) -> usize {
        let count = if self.is_floating() {
            // `as` saturates: negatives and NaN become 0.
            self.as_f64() as u64
        } else if self.kind.is_signed() {
            self.as_i64().max(0) as u64
        } else {
            self.bits
        };
        usize::try_from(count).unwrap_or(usize::MAX)
    }
}

impl fmt::Display for Raw {
    #[allow(clippy::cast_possible_truncation)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RawKind::Bool => write!(f, "{}", self.bits != 0),
            RawKind::Float => write!(f, "{}", f32::from_bits(self.bits as u32)),
            RawKind::Double => write!(f, "{}", f64::from_bits(self.bits)),
            k if k.is_signed() => write!(f, "{}", self.bits as i64),
            _ => write!(f, "{}", self.bits),
        }
    }
}

macro_rules! raw_from_signed {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl From<$ty> for Raw {
                fn from(value: $ty) -> Self {
                    Raw::from_i64(RawKind::$kind, i64::from(value))
                }
            }
        )*
    };
}

macro_rules! raw_from_unsigned {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl From<$ty> for Raw {
                fn from(value: $ty) -> Self {
                    Raw::from_bits(RawKind::$kind, u64::from(value))
                }
            }
        )*
    };
}

raw_from_signed!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
raw_from_unsigned!(bool => Bool, u8 => U8, u16 => U16, u32 => U32, u64 => U64);

impl From<f32> for Raw {
    fn from(value: f32) -> Self {
        Raw::from_bits(RawKind::Float, u64::from(value.to_bits()))
    }
}

impl From<f64> for Raw {
    fn from(value: f64) -> Self {
        Raw::from_bits(RawKind::Double, value.to_bits())
    }
}
