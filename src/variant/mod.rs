//! The dynamically-typed [`Variant`] value.
//!
//! A `Variant` is one of four kinds: `Nil`, a fixed-width scalar (`Raw`), an owned string
//! (`Str`) or an owned ordered map (`Dict`). It is the universal payload of message fields,
//! configuration entries and script bridges.
//!
//! # Architecture
//!
//! The module is split by operation family:
//!
//! - Storage, constructors and accessors of the tagged union
//! - Scalar encoding with a canonical 64-bit pattern per sub-kind
//! - Ownership-aware assignment (which also backs `Clone`)
//! - The value relation (`==`, `<`, ...) and the dictionary key order (`Ord`)
//! - Merge-aware arithmetic for strings and dictionaries
//! - A pluggable numeric engine for scalar arithmetic, with its configuration
//!
//! # Key Components
//!
//! ## Values
//! - [`crate::variant::Variant`] - The tagged union
//! - [`crate::variant::Kind`] - Its discriminant
//! - [`crate::variant::Dict`] - Map payload ordered by the key order
//! - [`crate::variant::Raw`] / [`crate::variant::RawKind`] - Scalar payload and sub-kind
//!
//! ## Scalar Arithmetic
//! - [`crate::variant::NumericEngine`] - Trait performing `Raw` op `Raw`
//! - [`crate::variant::StandardEngine`] - C-style promotion with configurable corner cases
//! - [`crate::variant::ArithmeticConfig`] - Overflow and division-by-zero policies
//!
//! # Usage Examples
//!
//! ```rust
//! use netvariant::Variant;
//!
//! let defaults = Variant::from_iter([("retries", Variant::from(3_u8)), ("mode", "tcp".into())]);
//! let overrides = Variant::from_iter([("mode", "udp")]);
//!
//! let merged = &defaults + &overrides;
//! assert_eq!(merged.get(&"mode".into()), Some(&Variant::from("udp")));
//! assert_eq!(merged.len(), 2);
//!
//! // kinds that cannot be combined poison the result to Nil
//! assert!((&merged + &Variant::from(1)).is_nil());
//! ```
//!
//! # Thread Safety
//!
//! `Variant` owns all of its buffers and carries no interior mutability, so it is `Send` and
//! `Sync`. Mutation requires exclusive access.
//!
//! None of the operations here reach the per-thread context, but callers embedding the crate in
//! the framework must still call [`crate::startup`] before the first one runs. This is not
//! checked.

mod arithmetic;
mod assign;
mod compare;
mod config;
mod numeric;
mod raw;
mod value;

pub use config::{ArithmeticConfig, DivisionPolicy, OverflowPolicy};
pub use numeric::{ArithmeticOp, NumericEngine, StandardEngine};
pub use raw::{Raw, RawKind};
pub use value::{Dict, Kind, Variant};
