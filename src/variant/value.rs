//! Storage of a [`Variant`]: the tagged union, its constructors and its accessors.
//!
//! A `Variant` owns at most one buffer at a time. `Str` and `Dict` carry an ownership slot
//! (`Option<...>`) rather than the buffer itself: `None` is a never-allocated buffer, which is
//! semantically identical to an allocated empty one. Changing the kind of a value replaces the
//! enum variant, so the buffer of the previous kind is dropped before the new shape is used.

use std::{borrow::Cow, collections::BTreeMap, fmt};

use strum::{Display, EnumCount, EnumIter};

use crate::variant::raw::{Raw, RawKind};

/// The associative payload of a `Dict` variant, ordered by the key order of [`Variant`].
pub type Dict = BTreeMap<Variant, Variant>;

/// Shared empty map standing in for an unallocated `Dict` slot.
pub(crate) static EMPTY_DICT: Dict = Dict::new();

/// Discriminant of a [`Variant`].
///
/// The declaration order is the kind rank of the dictionary key order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
    /// No value.
    Nil,
    /// Fixed-width scalar.
    Raw,
    /// Owned string.
    Str,
    /// Owned ordered map.
    Dict,
}

/// Dynamically-typed value exchanged through message payloads, configuration and script
/// bridges.
///
/// # Kinds
///
/// | Kind | Payload |
/// |------|---------|
/// | [`Variant::Nil`] | none |
/// | [`Variant::Raw`] | [`Raw`] scalar: bool, 8–64 bit signed/unsigned integer, float, double |
/// | [`Variant::Str`] | ownership slot for a `String` |
/// | [`Variant::Dict`] | ownership slot for a [`Dict`] |
///
/// # Value Semantics
///
/// Cloning and [`Variant::assign`] produce an independent copy. Buffers are never shared
/// between two values; assignment reuses the destination's existing allocation when it can.
///
/// # Examples
///
/// ```rust
/// use netvariant::Variant;
///
/// let mut config = Variant::from_iter([("port", Variant::from(8080_u16))]);
/// config.insert("host", "localhost");
///
/// assert_eq!(config.get(&Variant::from("port")), Some(&Variant::from(8080_u16)));
/// assert_eq!(config.len(), 2);
/// ```
#[derive(Debug, Default)]
pub enum Variant {
    /// No value. Every `Variant` starts out as `Nil`.
    #[default]
    Nil,

    /// Fixed-width scalar.
    Raw(Raw),

    /// String. `None` is a never-allocated buffer and reads as `""`.
    Str(Option<String>),

    /// Ordered map. `None` is a never-allocated buffer and reads as `{}`.
    Dict(Option<Dict>),
}

impl Variant {
    /// Creates a `Nil` value.
    #[must_use]
    pub const fn new() -> Self {
        Variant::Nil
    }

    /// Creates an empty string without allocating a buffer.
    #[must_use]
    pub const fn empty_str() -> Self {
        Variant::Str(None)
    }

    /// Creates an empty dictionary without allocating a buffer.
    #[must_use]
    pub const fn empty_dict() -> Self {
        Variant::Dict(None)
    }

    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Variant::Nil => Kind::Nil,
            Variant::Raw(_) => Kind::Raw,
            Variant::Str(_) => Kind::Str,
            Variant::Dict(_) => Kind::Dict,
        }
    }

    /// Returns `true` if this value is `Nil`.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Variant::Nil)
    }

    /// Returns `true` if this value is a scalar.
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Variant::Raw(_))
    }

    /// Returns `true` if this value is a string.
    #[must_use]
    pub const fn is_str(&self) -> bool {
        matches!(self, Variant::Str(_))
    }

    /// Returns `true` if this value is a dictionary.
    #[must_use]
    pub const fn is_dict(&self) -> bool {
        matches!(self, Variant::Dict(_))
    }

    /// Returns `true` if this value is a floating-point scalar.
    #[must_use]
    pub const fn is_floating(&self) -> bool {
        matches!(self, Variant::Raw(raw) if raw.is_floating())
    }

    /// Returns the scalar sub-kind, or `None` for non-scalar values.
    #[must_use]
    pub const fn raw_kind(&self) -> Option<RawKind> {
        match self {
            Variant::Raw(raw) => Some(raw.kind()),
            _ => None,
        }
    }

    /// Returns the scalar payload, if any.
    #[must_use]
    pub const fn as_raw(&self) -> Option<&Raw> {
        match self {
            Variant::Raw(raw) => Some(raw),
            _ => None,
        }
    }

    /// Returns the effective string content, or `None` if this value is not a string.
    ///
    /// An unallocated buffer reads as `""`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::Str(slot) => Some(slot.as_deref().unwrap_or_default()),
            _ => None,
        }
    }

    /// Returns the effective map content, or `None` if this value is not a dictionary.
    ///
    /// An unallocated buffer reads as an empty map.
    #[must_use]
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Variant::Dict(slot) => Some(slot.as_ref().unwrap_or(&EMPTY_DICT)),
            _ => None,
        }
    }

    /// Returns `true` if this `Str` or `Dict` has a buffer allocated.
    ///
    /// This observes an allocation detail only; it never affects comparison or arithmetic.
    #[must_use]
    pub const fn is_allocated(&self) -> bool {
        matches!(self, Variant::Str(Some(_)) | Variant::Dict(Some(_)))
    }

    /// Releases any owned buffer and turns this value into `Nil`.
    pub fn become_nil(&mut self) {
        *self = Variant::Nil;
    }

    /// Turns this value into a string (dropping any other payload) and returns its slot.
    pub(crate) fn str_slot_mut(&mut self) -> &mut Option<String> {
        if !self.is_str() {
            *self = Variant::Str(None);
        }
        match self {
            Variant::Str(slot) => slot,
            _ => unreachable!("kind was just set to Str"),
        }
    }

    /// Turns this value into a dictionary (dropping any other payload) and returns its slot.
    pub(crate) fn dict_slot_mut(&mut self) -> &mut Option<Dict> {
        if !self.is_dict() {
            *self = Variant::Dict(None);
        }
        match self {
            Variant::Dict(slot) => slot,
            _ => unreachable!("kind was just set to Dict"),
        }
    }

    /// Turns this value into a string and returns its allocated buffer.
    ///
    /// A value of another kind is replaced by an empty string first.
    pub fn str_mut(&mut self) -> &mut String {
        self.str_slot_mut().get_or_insert_with(String::new)
    }

    /// Turns this value into a dictionary and returns its allocated map.
    ///
    /// A value of another kind is replaced by an empty dictionary first.
    pub fn dict_mut(&mut self) -> &mut Dict {
        self.dict_slot_mut().get_or_insert_with(Dict::new)
    }

    /// Inserts `value` under `key`, turning this value into a dictionary if it is not one.
    ///
    /// Returns the previous value stored under an equal key.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Variant>
    where
        K: Into<Variant>,
        V: Into<Variant>,
    {
        self.dict_mut().insert(key.into(), value.into())
    }

    /// Looks up `key` in a dictionary. Returns `None` for other kinds.
    #[must_use]
    pub fn get(&self, key: &Variant) -> Option<&Variant> {
        self.as_dict()?.get(key)
    }

    /// Removes `key` from a dictionary, returning its value.
    pub fn remove(&mut self, key: &Variant) -> Option<Variant> {
        match self {
            Variant::Dict(Some(map)) => map.remove(key),
            _ => None,
        }
    }

    /// Returns `true` if `key` is present in this dictionary.
    #[must_use]
    pub fn contains_key(&self, key: &Variant) -> bool {
        self.as_dict().is_some_and(|map| map.contains_key(key))
    }

    /// Byte length of a string, entry count of a dictionary, `0` otherwise.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Variant::Str(slot) => slot.as_ref().map_or(0, String::len),
            Variant::Dict(slot) => slot.as_ref().map_or(0, Dict::len),
            Variant::Nil | Variant::Raw(_) => 0,
        }
    }

    /// Returns `true` if [`Variant::len`] is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// String representation used by string concatenation and filtering.
    ///
    /// Strings borrow their content; every other kind is rendered through `Display`.
    #[must_use]
    pub fn to_str(&self) -> Cow<'_, str> {
        match self {
            Variant::Str(slot) => Cow::Borrowed(slot.as_deref().unwrap_or_default()),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Numeric view as `f64`: scalars convert, strings are parsed, everything else is `0.0`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Variant::Raw(raw) => raw.as_f64(),
            Variant::Str(Some(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Numeric view as `i64`: scalars convert, strings are parsed, everything else is `0`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_i64(&self) -> i64 {
        match self {
            Variant::Raw(raw) => raw.as_i64(),
            Variant::Str(Some(s)) => {
                let s = s.trim();
                s.parse()
                    .unwrap_or_else(|_| s.parse::<f64>().map_or(0, |f| f as i64))
            }
            _ => 0,
        }
    }

    /// Numeric view as `u64`, with the same rules as [`Variant::to_i64`].
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn to_u64(&self) -> u64 {
        match self {
            Variant::Raw(raw) => raw.as_u64(),
            Variant::Str(Some(s)) => s.trim().parse().unwrap_or_else(|_| self.to_i64() as u64),
            _ => 0,
        }
    }

    /// Truthiness: non-zero scalars, `"true"` (any case) or non-zero numeric strings, and
    /// non-empty dictionaries are `true`.
    #[must_use]
    pub fn to_bool(&self) -> bool {
        match self {
            Variant::Nil => false,
            Variant::Raw(raw) => raw.as_bool(),
            Variant::Str(_) => {
                let s = self.to_str();
                let s = s.trim();
                s.eq_ignore_ascii_case("true") || self.to_f64() != 0.0
            }
            Variant::Dict(_) => !self.is_empty(),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Nil => write!(f, "nil"),
            Variant::Raw(raw) => write!(f, "{raw}"),
            Variant::Str(slot) => f.write_str(slot.as_deref().unwrap_or_default()),
            Variant::Dict(slot) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in slot.iter().flatten().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

macro_rules! variant_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Variant::Raw(Raw::from(value))
                }
            }
        )*
    };
}

variant_from_scalar!(bool, i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl From<Raw> for Variant {
    fn from(value: Raw) -> Self {
        Variant::Raw(value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::Str(Some(value.to_owned()))
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::Str(Some(value))
    }
}

impl From<Dict> for Variant {
    fn from(value: Dict) -> Self {
        Variant::Dict(Some(value))
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    fn from(value: Option<T>) -> Self {
        value.map_or(Variant::Nil, Into::into)
    }
}

impl<K, V> FromIterator<(K, V)> for Variant
where
    K: Into<Variant>,
    V: Into<Variant>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map: Dict = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Variant::Dict(Some(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_nil() {
        assert!(Variant::default().is_nil());
        assert!(Variant::new().is_nil());
        assert_eq!(Variant::new().kind(), Kind::Nil);
    }

    #[test]
    fn test_kind_predicates() {
        let values = [
            (Variant::Nil, Kind::Nil),
            (Variant::from(1_i32), Kind::Raw),
            (Variant::from("s"), Kind::Str),
            (Variant::empty_dict(), Kind::Dict),
        ];
        for (value, kind) in values {
            assert_eq!(value.kind(), kind);
            assert_eq!(value.is_nil(), kind == Kind::Nil);
            assert_eq!(value.is_raw(), kind == Kind::Raw);
            assert_eq!(value.is_str(), kind == Kind::Str);
            assert_eq!(value.is_dict(), kind == Kind::Dict);
        }
    }

    #[test]
    fn test_unallocated_reads_empty() {
        assert_eq!(Variant::empty_str().as_str(), Some(""));
        assert_eq!(Variant::empty_dict().as_dict().map(Dict::len), Some(0));
        assert!(!Variant::empty_str().is_allocated());
        assert!(Variant::from("").is_allocated());
        assert!(Variant::Nil.as_str().is_none());
    }

    #[test]
    fn test_kind_switch_releases_previous_payload() {
        let mut value = Variant::from("payload");
        value.insert(1, "one");
        assert!(value.is_dict());
        assert_eq!(value.len(), 1);

        value.str_mut().push_str("text");
        assert_eq!(value.as_str(), Some("text"));

        value.become_nil();
        assert!(value.is_nil());
        assert_eq!(value.len(), 0);
    }

    #[test]
    fn test_dict_accessors() {
        let mut dict = Variant::from_iter([(1, "a"), (2, "b")]);
        assert_eq!(dict.get(&Variant::from(1)), Some(&Variant::from("a")));
        assert!(dict.contains_key(&Variant::from(2)));
        assert_eq!(dict.remove(&Variant::from(2)), Some(Variant::from("b")));
        assert!(!dict.contains_key(&Variant::from(2)));
        assert_eq!(Variant::from(3).get(&Variant::from(1)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::Nil.to_string(), "nil");
        assert_eq!(Variant::from(-4_i8).to_string(), "-4");
        assert_eq!(Variant::from("abc").to_string(), "abc");
        assert_eq!(
            Variant::from_iter([(2, "b"), (1, "a")]).to_string(),
            "{1: a, 2: b}"
        );
        assert_eq!(Variant::empty_dict().to_string(), "{}");
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(Variant::from(" 42 ").to_i64(), 42);
        assert_eq!(Variant::from("2.5").to_i64(), 2);
        assert_eq!(Variant::from("2.5").to_f64(), 2.5);
        assert_eq!(Variant::from("x").to_f64(), 0.0);
        assert_eq!(Variant::from(7_u8).to_u64(), 7);
        assert!(Variant::from("TRUE").to_bool());
        assert!(Variant::from("1").to_bool());
        assert!(!Variant::from("0").to_bool());
        assert!(!Variant::Nil.to_bool());
        assert!(Variant::from_iter([(1, 1)]).to_bool());
    }

    #[test]
    fn test_from_option() {
        assert!(Variant::from(None::<i32>).is_nil());
        assert_eq!(Variant::from(Some("x")).as_str(), Some("x"));
    }
}
