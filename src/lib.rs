// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # netvariant
//!
//! A dynamically-typed value for message payloads, configuration trees and script bridges, with
//! value semantics, a total comparison relation and merge-aware arithmetic.
//!
//! ## Features
//!
//! - **Four kinds** - `Nil`, fixed-width scalars, owned strings and ordered dictionaries
//! - **Value semantics** - copies never share buffers; assignment reuses existing allocations
//! - **Total comparisons** - `==` and `<` never fail, even across kinds
//! - **Merge-aware arithmetic** - `+ - * /` union, subtract, intersect and toggle dictionaries,
//!   concatenate, filter and repeat strings
//! - **Poison instead of errors** - invalid kind combinations silently yield `Nil`
//! - **Pluggable scalar arithmetic** - C-style promotion with configurable overflow and
//!   division-by-zero policies
//! - **Per-thread context** - last-error slot, thread role, pool stack and service slots
//!
//! ## Quick Start
//!
//! ```rust
//! use netvariant::prelude::*;
//!
//! let a = Variant::from_iter([(1, "a"), (2, "b")]);
//! let b = Variant::from_iter([(2, "c"), (3, "d")]);
//!
//! assert_eq!(&a + &b, Variant::from_iter([(1, "a"), (2, "c"), (3, "d")]));
//! assert_eq!(&a - &b, Variant::from_iter([(1, "a")]));
//! assert_eq!(&a * &b, Variant::from_iter([(2, "b")]));
//! assert_eq!(&a / &b, Variant::from_iter([(1, "a"), (3, "d")]));
//!
//! assert_eq!(&Variant::from("ab") * &Variant::from(3), Variant::from("ababab"));
//! assert!((&Variant::Nil + &Variant::from(5)).is_nil());
//! ```
//!
//! ## Scalars
//!
//! ```rust
//! use netvariant::prelude::*;
//!
//! // 8- and 16-bit operands promote to int32
//! let sum = &Variant::from(200_u8) + &Variant::from(100_u8);
//! assert_eq!(sum.raw_kind(), Some(RawKind::I32));
//!
//! // integer division by zero poisons by default; ask for it explicitly to get an error
//! assert!((&Variant::from(1) / &Variant::from(0)).is_nil());
//! assert_eq!(
//!     Variant::from(1).checked_div(&Variant::from(0)),
//!     Err(Error::DivisionByZero)
//! );
//!
//! // or pick another policy
//! let engine = StandardEngine::new(ArithmeticConfig::lenient());
//! let mut value = Variant::from(1);
//! value.div_equal_with(&Variant::from(0), &engine);
//! assert_eq!(value, Variant::from(0));
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (poisoned operations at `trace`, context changes at
//! `debug`, startup and cleanup at `info`) and installs no subscriber of its own.

pub(crate) mod error;
pub(crate) mod utils;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use netvariant::prelude::*;
///
/// let mut config = Variant::new();
/// config.insert("port", 8080_u16);
/// assert_eq!(config.kind(), Kind::Dict);
/// ```
pub mod prelude;

/// The dynamically-typed value, its comparison relation and its arithmetic
///
/// # Key Types
///
/// - [`variant::Variant`] - The value itself
/// - [`variant::Raw`] - Scalar payload with its [`variant::RawKind`]
/// - [`variant::NumericEngine`] - Scalar arithmetic seam, implemented by [`variant::StandardEngine`]
pub mod variant;

/// Process-wide handle and per-thread context blocks
///
/// # Key Types
///
/// - [`context::TlsHandle`] - Handle through which a thread reaches its block
/// - [`context::ThreadContext`] - The per-thread block
pub mod context;

/// `netvariant` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `netvariant` Error type
///
/// # Examples
///
/// ```rust
/// use netvariant::{Error, ErrorCode};
///
/// assert_eq!(Error::PoolStackEmpty.code(), ErrorCode::PoolStackEmpty);
/// ```
pub use error::Error;

/// Numeric error codes and their fixed descriptions.
pub use error::{str_error, ErrorCode};

/// The dynamically-typed value.
pub use variant::Variant;

/// Library lifecycle and error text helpers.
pub use context::{cleanup, format_last_error, startup};
