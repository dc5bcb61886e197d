//! Arithmetic between [`Variant`] values.
//!
//! Each operator first applies its merge policy for the non-scalar kinds and only hands two
//! scalars to the [`NumericEngine`]:
//!
//! | Operation | `Dict` `Dict` | `Str` involved | `Nil` involved |
//! |-----------|---------------|----------------|----------------|
//! | `+` | union, right wins on collision | concatenation | `Nil` |
//! | `-` | remove the right keys | remove every occurrence of the right text | `Nil` |
//! | `*` | key intersection, left values | repetition with a scalar count | `Nil` |
//! | `/` | symmetric difference | `Nil` | `Nil` |
//!
//! A `Dict` paired with any other kind is `Nil`. Invalid combinations never fail; they poison
//! the left operand to `Nil`.

use std::{
    borrow::Cow,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign},
};

use tracing::{error, trace};

use crate::{
    utils::{filter_out, repeat_into},
    variant::{
        numeric::{ArithmeticOp, NumericEngine, StandardEngine},
        raw::Raw,
        value::{Kind, Variant},
    },
    Error, Result,
};

impl Variant {
    /// In-place `+` with the default [`StandardEngine`].
    pub fn add_equal(&mut self, rhs: &Variant) {
        self.add_equal_with(rhs, &StandardEngine::default());
    }

    /// In-place `+`, delegating scalar arithmetic to `engine`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use netvariant::Variant;
    ///
    /// let mut greeting = Variant::from("foo");
    /// greeting.add_equal(&Variant::from("bar"));
    /// assert_eq!(greeting, Variant::from("foobar"));
    ///
    /// let mut text = Variant::from("n=");
    /// text.add_equal(&Variant::from(5_u8));
    /// assert_eq!(text, Variant::from("n=5"));
    /// ```
    pub fn add_equal_with<E: NumericEngine + ?Sized>(&mut self, rhs: &Variant, engine: &E) {
        match (self.kind(), rhs.kind()) {
            (Kind::Nil, _) | (_, Kind::Nil) => self.poison(ArithmeticOp::Add, rhs),
            (Kind::Dict, Kind::Dict) => self.dict_union(rhs),
            (Kind::Dict, _) | (_, Kind::Dict) => self.poison(ArithmeticOp::Add, rhs),
            (Kind::Str, _) | (_, Kind::Str) => self.concat(rhs),
            (Kind::Raw, Kind::Raw) => engine.perform(self, rhs, ArithmeticOp::Add),
        }
    }

    /// In-place `-` with the default [`StandardEngine`].
    pub fn sub_equal(&mut self, rhs: &Variant) {
        self.sub_equal_with(rhs, &StandardEngine::default());
    }

    /// In-place `-`, delegating scalar arithmetic to `engine`.
    ///
    /// Dictionaries lose every key present in `rhs`; strings lose every non-overlapping
    /// occurrence of `rhs`'s text, scanned left to right.
    pub fn sub_equal_with<E: NumericEngine + ?Sized>(&mut self, rhs: &Variant, engine: &E) {
        match (self.kind(), rhs.kind()) {
            (Kind::Nil, _) | (_, Kind::Nil) => self.poison(ArithmeticOp::Sub, rhs),
            (Kind::Dict, Kind::Dict) => {
                if let (Variant::Dict(Some(dst)), Some(src)) = (&mut *self, rhs.as_dict()) {
                    for key in src.keys() {
                        if dst.is_empty() {
                            break;
                        }
                        dst.remove(key);
                    }
                }
            }
            (Kind::Dict, _) | (_, Kind::Dict) => self.poison(ArithmeticOp::Sub, rhs),
            (Kind::Str, _) | (_, Kind::Str) => self.strip(rhs),
            (Kind::Raw, Kind::Raw) => engine.perform(self, rhs, ArithmeticOp::Sub),
        }
    }

    /// In-place `*` with the default [`StandardEngine`].
    pub fn mul_equal(&mut self, rhs: &Variant) {
        self.mul_equal_with(rhs, &StandardEngine::default());
    }

    /// In-place `*`, delegating scalar arithmetic to `engine`.
    ///
    /// A string times a scalar (in either order) repeats the string; the scalar is truncated
    /// toward zero and negative counts repeat it zero times. An empty string stays empty for any
    /// count. A non-empty result longer than `isize::MAX` bytes aborts the process, like any
    /// other allocation failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use netvariant::Variant;
    ///
    /// let mut value = Variant::from(3_i32);
    /// value.mul_equal(&Variant::from("ab"));
    /// assert_eq!(value, Variant::from("ababab"));
    ///
    /// value.mul_equal(&Variant::from("ab"));
    /// assert!(value.is_nil());
    /// ```
    pub fn mul_equal_with<E: NumericEngine + ?Sized>(&mut self, rhs: &Variant, engine: &E) {
        match (self.kind(), rhs.kind()) {
            (Kind::Nil, _) | (_, Kind::Nil) => self.poison(ArithmeticOp::Mul, rhs),
            (Kind::Dict, Kind::Dict) => {
                if let (Variant::Dict(Some(dst)), Some(src)) = (&mut *self, rhs.as_dict()) {
                    dst.retain(|key, _| src.contains_key(key));
                }
            }
            (Kind::Dict, _) | (_, Kind::Dict) => self.poison(ArithmeticOp::Mul, rhs),
            (Kind::Str, Kind::Raw) => {
                let count = rhs.as_raw().map_or(0, Raw::as_count);
                if let Variant::Str(Some(buffer)) = self {
                    repeat_or_abort(buffer, count);
                }
            }
            (Kind::Raw, Kind::Str) => {
                let count = self.as_raw().map_or(0, Raw::as_count);
                let mut text = rhs.as_str().unwrap_or_default().to_owned();
                repeat_or_abort(&mut text, count);
                *self = Variant::from(text);
            }
            (Kind::Str, _) | (_, Kind::Str) => self.poison(ArithmeticOp::Mul, rhs),
            (Kind::Raw, Kind::Raw) => engine.perform(self, rhs, ArithmeticOp::Mul),
        }
    }

    /// In-place `/` with the default [`StandardEngine`].
    pub fn div_equal(&mut self, rhs: &Variant) {
        self.div_equal_with(rhs, &StandardEngine::default());
    }

    /// In-place `/`, delegating scalar arithmetic to `engine`.
    ///
    /// Two dictionaries produce their symmetric difference by key: keys of `rhs` missing from
    /// `self` are inserted with `rhs`'s value, keys present in both are removed. Strings cannot
    /// be divided.
    pub fn div_equal_with<E: NumericEngine + ?Sized>(&mut self, rhs: &Variant, engine: &E) {
        match (self.kind(), rhs.kind()) {
            (Kind::Nil, _) | (_, Kind::Nil) => self.poison(ArithmeticOp::Div, rhs),
            (Kind::Dict, Kind::Dict) => {
                let Some(src) = rhs.as_dict().filter(|src| !src.is_empty()) else {
                    return;
                };
                let dst = self.dict_mut();
                // keys of `src` are unique, so toggling each one leaves the original keys intact
                // for every later lookup
                for (key, value) in src {
                    if dst.remove(key).is_none() {
                        dst.insert(key.clone(), value.clone());
                    }
                }
            }
            (Kind::Dict, _) | (_, Kind::Dict) | (Kind::Str, _) | (_, Kind::Str) => {
                self.poison(ArithmeticOp::Div, rhs);
            }
            (Kind::Raw, Kind::Raw) => engine.perform(self, rhs, ArithmeticOp::Div),
        }
    }

    /// Returns `self + rhs`, leaving both operands untouched.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, rhs: &Variant) -> Variant {
        let mut result = self.clone();
        result.add_equal(rhs);
        result
    }

    /// Returns `self - rhs`, leaving both operands untouched.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn sub(&self, rhs: &Variant) -> Variant {
        let mut result = self.clone();
        result.sub_equal(rhs);
        result
    }

    /// Returns `self * rhs`, leaving both operands untouched.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn mul(&self, rhs: &Variant) -> Variant {
        let mut result = self.clone();
        result.mul_equal(rhs);
        result
    }

    /// Returns `self / rhs`, leaving both operands untouched.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn div(&self, rhs: &Variant) -> Variant {
        let mut result = self.clone();
        result.div_equal(rhs);
        result
    }

    /// Division that reports an integer division by zero instead of applying the
    /// [`crate::variant::DivisionPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] if both operands are scalars, their promoted sub-kind is
    /// an integer and `rhs` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use netvariant::{Error, Variant};
    ///
    /// assert_eq!(Variant::from(9).checked_div(&Variant::from(3))?, Variant::from(3));
    /// assert_eq!(
    ///     Variant::from(9).checked_div(&Variant::from(0)),
    ///     Err(Error::DivisionByZero)
    /// );
    /// # Ok::<(), netvariant::Error>(())
    /// ```
    pub fn checked_div(&self, rhs: &Variant) -> Result<Variant> {
        if let (Some(l), Some(r)) = (self.as_raw(), rhs.as_raw()) {
            let kind = StandardEngine::promote(l.kind(), r.kind());
            if !kind.is_floating() && r.bits() == 0 {
                return Err(Error::DivisionByZero);
            }
        }
        Ok(self.div(rhs))
    }

    fn poison(&mut self, op: ArithmeticOp, rhs: &Variant) {
        trace!(%op, left = %self.kind(), right = %rhs.kind(), "kind mismatch, result poisoned to nil");
        self.become_nil();
    }

    fn dict_union(&mut self, rhs: &Variant) {
        let Some(src) = rhs.as_dict().filter(|src| !src.is_empty()) else {
            return;
        };
        let dst = self.dict_mut();
        for (key, value) in src {
            match dst.get_mut(key) {
                Some(existing) => existing.assign(value),
                None => {
                    dst.insert(key.clone(), value.clone());
                }
            }
        }
    }

    fn concat(&mut self, rhs: &Variant) {
        let suffix = rhs.to_str();
        if !self.is_str() {
            let prefix = self.to_string();
            *self = Variant::from(prefix);
        }
        self.str_mut().push_str(&suffix);
    }

    fn strip(&mut self, rhs: &Variant) {
        let pattern = rhs.to_str();
        let filtered = match filter_out(&self.to_str(), &pattern) {
            Cow::Borrowed(_) if self.is_str() => return,
            filtered => filtered.into_owned(),
        };
        *self.str_mut() = filtered;
    }
}

/// Repeats `buffer` in place. A result too large to address is an allocation failure.
fn repeat_or_abort(buffer: &mut String, count: usize) {
    if repeat_into(buffer, count).is_none() {
        error!(len = buffer.len(), count, "repeated string exceeds the addressable size, aborting");
        std::process::abort()
    }
}

macro_rules! impl_binary_ops {
    ($($op:ident::$method:ident, $op_assign:ident::$method_assign:ident => $in_place:ident;)*) => {
        $(
            impl $op<&Variant> for &Variant {
                type Output = Variant;

                fn $method(self, rhs: &Variant) -> Variant {
                    let mut result = self.clone();
                    result.$in_place(rhs);
                    result
                }
            }

            impl $op<&Variant> for Variant {
                type Output = Variant;

                fn $method(mut self, rhs: &Variant) -> Variant {
                    self.$in_place(rhs);
                    self
                }
            }

            impl $op<Variant> for Variant {
                type Output = Variant;

                fn $method(mut self, rhs: Variant) -> Variant {
                    self.$in_place(&rhs);
                    self
                }
            }

            impl $op_assign<&Variant> for Variant {
                fn $method_assign(&mut self, rhs: &Variant) {
                    self.$in_place(rhs);
                }
            }

            impl $op_assign<Variant> for Variant {
                fn $method_assign(&mut self, rhs: Variant) {
                    self.$in_place(&rhs);
                }
            }
        )*
    };
}

impl_binary_ops! {
    Add::add, AddAssign::add_assign => add_equal;
    Sub::sub, SubAssign::sub_assign => sub_equal;
    Mul::mul, MulAssign::mul_assign => mul_equal;
    Div::div, DivAssign::div_assign => div_equal;
}
