//! Equality and ordering of [`Variant`] values.
//!
//! Two relations are defined here:
//!
//! - The **value relation**, exposed through `==`, `!=`, `<`, `>`, `<=` and `>=`. It is total
//!   (never fails) but only consistent within a single kind: any comparison across kinds other
//!   than `Nil == Nil` is `false` for both `==` and `<`. A slice of mixed kinds therefore cannot be
//!   sorted with it. `<=` and `>=` are derived from `<` alone (`a <= b` is `!(b < a)`), so they
//!   are `true` across kinds.
//! - The **key order** ([`Ord`]), a total order used by [`crate::variant::Dict`] to keep its keys
//!   unique and sorted. Kinds rank `Nil < Raw < Str < Dict`. Scalars are ordered by their exact
//!   numeric value (signed integers as signed), with every NaN equal to every other NaN and
//!   above `+inf`, and `-0.0` equal to `0.0`.
//!
//! The key order is not the value relation. It disagrees with `==`/`<` on integer pairs with the
//! same bit pattern but different signedness (`-1_i32` and `u64::MAX` are distinct keys, and
//! `-1_i32` sorts first), on integers beyond 2^53 against floats (`2^53 + 1` is a key of its own,
//! distinct from `2^53` as `Double`), and on NaN. Integer `1` and double `1.0` remain the same
//! key.
//!
//! # Scalars
//!
//! Two scalars compare as `f64` as soon as either of them is `Float` or `Double`; otherwise their
//! canonical 64-bit patterns are compared as `u64`. Consequently `-1_i32 == u64::MAX`, and the
//! promotion to `f64` can make equality intransitive near the 2^53 precision boundary
//! (`2^53 + 1` as `I64` equals `2^53` as `Double`, which equals `2^53` as `I64`).

use std::{cmp::Ordering, ptr};

use crate::variant::{
    raw::Raw,
    value::{Dict, Variant, EMPTY_DICT},
};

#[allow(clippy::float_cmp)]
fn raw_eq(left: &Raw, right: &Raw) -> bool {
    if left.is_floating() || right.is_floating() {
        left.as_f64() == right.as_f64()
    } else {
        left.bits() == right.bits()
    }
}

fn raw_lt(left: &Raw, right: &Raw) -> bool {
    if left.is_floating() || right.is_floating() {
        left.as_f64() < right.as_f64()
    } else {
        left.bits() < right.bits()
    }
}

/// Position of a scalar on the number line, as seen by the key order.
#[derive(Clone, Copy)]
enum KeyPoint {
    Int(i128),
    Float(f64),
    NaN,
}

impl KeyPoint {
    fn of(raw: &Raw) -> Self {
        if raw.is_floating() {
            let value = raw.as_f64();
            if value.is_nan() {
                KeyPoint::NaN
            } else {
                KeyPoint::Float(value)
            }
        } else if raw.kind().is_signed() {
            KeyPoint::Int(i128::from(raw.as_i64()))
        } else {
            KeyPoint::Int(i128::from(raw.bits()))
        }
    }
}

/// Exact comparison of an integer with a non-NaN float.
fn int_float_cmp(int: i128, float: f64) -> Ordering {
    // every integer key lies in [-2^63, 2^64)
    const LOW: f64 = -9_223_372_036_854_775_808.0;
    const HIGH: f64 = 18_446_744_073_709_551_616.0;

    if float < LOW {
        return Ordering::Greater;
    }
    if float >= HIGH {
        return Ordering::Less;
    }
    let whole = float.trunc();
    #[allow(clippy::cast_possible_truncation)]
    let truncated = whole as i128;
    int.cmp(&truncated)
        .then_with(|| whole.partial_cmp(&float).unwrap_or(Ordering::Equal))
}

fn raw_key_cmp(left: &Raw, right: &Raw) -> Ordering {
    match (KeyPoint::of(left), KeyPoint::of(right)) {
        (KeyPoint::Int(l), KeyPoint::Int(r)) => l.cmp(&r),
        (KeyPoint::Int(l), KeyPoint::Float(r)) => int_float_cmp(l, r),
        (KeyPoint::Float(l), KeyPoint::Int(r)) => int_float_cmp(r, l).reverse(),
        (KeyPoint::Float(l), KeyPoint::Float(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        (KeyPoint::NaN, KeyPoint::NaN) => Ordering::Equal,
        (KeyPoint::NaN, _) => Ordering::Greater,
        (_, KeyPoint::NaN) => Ordering::Less,
    }
}

fn effective_str(slot: &Option<String>) -> &str {
    slot.as_deref().unwrap_or_default()
}

fn effective_dict(slot: &Option<Dict>) -> &Dict {
    slot.as_ref().unwrap_or(&EMPTY_DICT)
}

/// Lexicographic comparison over the entries of two non-empty maps, in key order.
fn dict_lt(left: &Dict, right: &Dict) -> bool {
    for ((l_key, l_value), (r_key, r_value)) in left.iter().zip(right.iter()) {
        if l_key < r_key {
            return true;
        }
        if r_key < l_key {
            return false;
        }
        if l_value < r_value {
            return true;
        }
        if r_value < l_value {
            return false;
        }
    }
    left.len() < right.len()
}

impl Variant {
    /// Strict "less than" of the value relation.
    ///
    /// - `Dict`/`Dict`: the same buffer is never less than itself; an empty map is less than a
    ///   non-empty one; otherwise entries are compared lexicographically in key order.
    /// - `Str`/`Str`: byte-lexicographic.
    /// - `Raw`/`Raw`: as `f64` if either is floating, else as `u64` patterns.
    /// - any other pairing: `false`.
    fn value_lt(&self, other: &Variant) -> bool {
        match (self, other) {
            (Variant::Dict(l_slot), Variant::Dict(r_slot)) => {
                if let (Some(l), Some(r)) = (l_slot, r_slot) {
                    if ptr::eq(l, r) {
                        return false;
                    }
                }
                let (l, r) = (effective_dict(l_slot), effective_dict(r_slot));
                if l.is_empty() {
                    return !r.is_empty();
                }
                if r.is_empty() {
                    return false;
                }
                dict_lt(l, r)
            }
            (Variant::Str(l), Variant::Str(r)) => effective_str(l) < effective_str(r),
            (Variant::Raw(l), Variant::Raw(r)) => raw_lt(l, r),
            _ => false,
        }
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Variant::Str(l), Variant::Str(r)) => effective_str(l) == effective_str(r),
            (Variant::Dict(l), Variant::Dict(r)) => effective_dict(l) == effective_dict(r),
            (Variant::Raw(l), Variant::Raw(r)) => raw_eq(l, r),
            (Variant::Nil, Variant::Nil) => true,
            _ => false,
        }
    }
}

/// `Eq` is required by the dictionary key order. Like `f64`, a NaN scalar is the one value that
/// is not equal to itself under `==`.
impl Eq for Variant {}

#[allow(clippy::non_canonical_partial_ord_impl)]
impl PartialOrd for Variant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.value_lt(other) {
            Some(Ordering::Less)
        } else if other.value_lt(self) {
            Some(Ordering::Greater)
        } else if self == other {
            Some(Ordering::Equal)
        } else {
            None
        }
    }

    fn lt(&self, other: &Self) -> bool {
        self.value_lt(other)
    }

    fn gt(&self, other: &Self) -> bool {
        other.value_lt(self)
    }

    fn le(&self, other: &Self) -> bool {
        !other.value_lt(self)
    }

    fn ge(&self, other: &Self) -> bool {
        !self.value_lt(other)
    }
}

impl Ord for Variant {
    /// Key order used by [`Dict`].
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Variant::Raw(l), Variant::Raw(r)) => raw_key_cmp(l, r),
            (Variant::Str(l), Variant::Str(r)) => effective_str(l).cmp(effective_str(r)),
            (Variant::Dict(l), Variant::Dict(r)) => {
                effective_dict(l).iter().cmp(effective_dict(r).iter())
            }
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::test::dict_of;

    use super::*;

    #[test]
    fn test_str_equality_ignores_allocation() {
        assert_eq!(Variant::empty_str(), Variant::from(""));
        assert_eq!(Variant::from("a"), Variant::from("a"));
        assert_ne!(Variant::from("a"), Variant::from("b"));
        assert_ne!(Variant::from("1"), Variant::from(1));
    }

    #[test]
    fn test_dict_equality_ignores_allocation() {
        assert_eq!(Variant::empty_dict(), Variant::from(BTreeMap::new()));
        assert_eq!(dict_of(&[(1, "a")]), dict_of(&[(1, "a")]));
        assert_ne!(dict_of(&[(1, "a")]), dict_of(&[(1, "b")]));
        assert_ne!(Variant::empty_dict(), Variant::empty_str());
    }

    #[test]
    fn test_raw_equality() {
        assert_eq!(Variant::from(1_i32), Variant::from(1.0_f64));
        assert_eq!(Variant::from(0.5_f32), Variant::from(0.5_f64));
        assert_eq!(Variant::from(-1_i32), Variant::from(u64::MAX));
        assert_eq!(Variant::from(true), Variant::from(1_u8));
        assert_ne!(Variant::from(f64::NAN), Variant::from(f64::NAN));
        assert_eq!(Variant::Nil, Variant::Nil);
        assert_ne!(Variant::Nil, Variant::from(0));
    }

    #[test]
    fn test_raw_ordering() {
        assert!(Variant::from(1) < Variant::from(2));
        assert!(Variant::from(1.5) < Variant::from(2_u8));
        // integer patterns compare unsigned
        assert!(Variant::from(1_i32) < Variant::from(-1_i32));
        assert!(Variant::from(-1.0) < Variant::from(1_i32));
    }

    #[test]
    fn test_str_ordering() {
        assert!(Variant::from("abc") < Variant::from("abd"));
        assert!(Variant::from("ab") < Variant::from("abc"));
        assert!(Variant::empty_str() < Variant::from("a"));
        assert!(!(Variant::from("b") < Variant::from("a")));
    }

    #[test]
    fn test_dict_ordering() {
        let empty = Variant::empty_dict();
        let allocated_empty = Variant::from(BTreeMap::new());
        let one = dict_of(&[(1, "a")]);

        assert!(empty < one);
        assert!(!(one < empty));
        assert!(!(empty < allocated_empty));
        assert!(!(allocated_empty < empty));
        assert!(!(one < one));

        assert!(dict_of(&[(1, "a")]) < dict_of(&[(2, "a")]));
        assert!(dict_of(&[(1, "a")]) < dict_of(&[(1, "b")]));
        assert!(dict_of(&[(1, "a")]) < dict_of(&[(1, "a"), (2, "b")]));
        assert!(!(dict_of(&[(1, "a"), (2, "b")]) < dict_of(&[(1, "a")])));
    }

    #[test]
    fn test_cross_kind_never_orders() {
        let values = [
            Variant::Nil,
            Variant::from(1),
            Variant::from("s"),
            dict_of(&[(1, "a")]),
        ];
        for (i, a) in values.iter().enumerate() {
            for (j, b) in values.iter().enumerate() {
                if i != j {
                    assert!(!(a < b), "{a} < {b}");
                    assert!(!(a > b), "{a} > {b}");
                    assert!(a <= b, "{a} <= {b}");
                    assert!(a >= b, "{a} >= {b}");
                    assert_eq!(a.partial_cmp(b), None);
                }
            }
        }
    }

    #[test]
    fn test_derived_operators() {
        let (a, b) = (Variant::from(1), Variant::from(2));
        assert!(b > a);
        assert!(a <= b);
        assert!(a <= a.clone());
        assert!(b >= a);
        assert!(!(a >= b));
        assert_eq!(a.partial_cmp(&b), Some(Ordering::Less));
        assert_eq!(a.partial_cmp(&a.clone()), Some(Ordering::Equal));
    }

    #[test]
    fn test_key_order() {
        assert!(Variant::Nil.cmp(&Variant::from(0)) == Ordering::Less);
        assert!(Variant::from(u64::MAX).cmp(&Variant::from("")) == Ordering::Less);
        assert!(Variant::from("z").cmp(&Variant::empty_dict()) == Ordering::Less);
        assert_eq!(Variant::from(1_i8).cmp(&Variant::from(1.0_f32)), Ordering::Equal);
        assert_eq!(Variant::from(0.0).cmp(&Variant::from(-0.0)), Ordering::Equal);
        assert_eq!(
            Variant::from(f64::NAN).cmp(&Variant::from(f64::INFINITY)),
            Ordering::Greater
        );
    }

    #[test]
    fn test_numeric_keys_collapse() {
        let mut dict = Variant::empty_dict();
        dict.insert(1_i32, "int");
        dict.insert(1.0_f64, "double");
        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get(&Variant::from(1_u64)), Some(&Variant::from("double")));
    }

    #[test]
    fn test_key_order_is_numeric() {
        let ordered = [
            Variant::from(f64::NEG_INFINITY),
            Variant::from(i64::MIN),
            Variant::from(-1.5),
            Variant::from(-1_i32),
            Variant::from(-0.5_f32),
            Variant::from(0_u8),
            Variant::from(0.5),
            Variant::from(5_i32),
            Variant::from(u64::MAX),
            Variant::from(1.0e30),
            Variant::from(f64::INFINITY),
            Variant::from(f64::NAN),
        ];
        for (i, a) in ordered.iter().enumerate() {
            for (j, b) in ordered.iter().enumerate() {
                assert_eq!(a.cmp(b), i.cmp(&j), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_key_order_near_precision_boundary() {
        let big = 1_i64 << 53;
        let as_double = Variant::from(big as f64);

        assert_eq!(Variant::from(big).cmp(&as_double), Ordering::Equal);
        assert_eq!(Variant::from(big + 1).cmp(&as_double), Ordering::Greater);
        assert_eq!(Variant::from(big - 1).cmp(&as_double), Ordering::Less);
        assert_eq!(
            Variant::from(u64::MAX).cmp(&Variant::from(18_446_744_073_709_551_616.0)),
            Ordering::Less
        );
        assert_eq!(
            Variant::from(i64::MIN).cmp(&Variant::from(-9_223_372_036_854_775_808.0)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_key_order_separates_signedness() {
        // equal under `==`, distinct as keys
        assert_eq!(Variant::from(-1_i32), Variant::from(u64::MAX));
        assert_eq!(
            Variant::from(-1_i32).cmp(&Variant::from(u64::MAX)),
            Ordering::Less
        );
        assert_eq!(Variant::from(-1_i8).cmp(&Variant::from(-1_i64)), Ordering::Equal);
        assert_eq!(Variant::from(255_u8).cmp(&Variant::from(255_i32)), Ordering::Equal);
    }

    #[test]
    fn test_mixed_numeric_keys() {
        let mut dict = Variant::empty_dict();
        dict.insert(5_i32, "five");
        dict.insert(-1_i32, "minus one");
        dict.insert(0.5_f64, "half");

        assert_eq!(dict.to_string(), "{-1: minus one, 0.5: half, 5: five}");
        assert_eq!(dict.get(&Variant::from(-1_i64)), Some(&Variant::from("minus one")));
        assert_eq!(dict.get(&Variant::from(-1.0_f32)), Some(&Variant::from("minus one")));

        dict.insert(-1_i32, "again");
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.get(&Variant::from(-1_i32)), Some(&Variant::from("again")));

        let removed = &dict - &dict_of(&[(-1, "")]);
        assert_eq!(removed.len(), 2);
        assert_eq!(removed.get(&Variant::from(-1_i32)), None);

        let kept = &dict * &Variant::from_iter([(0.5, 0), (5.0, 0)]);
        assert_eq!(kept, Variant::from_iter([(0.5, "half"), (5.0, "five")]));
    }

    #[test]
    fn test_nan_keys_collapse() {
        let mut dict = Variant::empty_dict();
        dict.insert(f64::NAN, "a");
        dict.insert(f32::NAN, "b");
        dict.insert(f64::INFINITY, "c");
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(&Variant::from(f64::NAN)), Some(&Variant::from("b")));
    }

    #[test]
    fn test_float_promotion_is_intransitive() {
        // Documented limitation: comparing through f64 loses integer precision above 2^53.
        let big = 1_i64 << 53;
        let a = Variant::from(big);
        let b = Variant::from(big + 1);
        let c = Variant::from(big as f64);

        assert_eq!(a, c);
        assert_eq!(b, c);
        assert_ne!(a, b);
    }
}
