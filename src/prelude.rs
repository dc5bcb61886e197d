//! # netvariant Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the netvariant library. Import this module to get quick access to the value type,
//! its scalar arithmetic configuration and the library lifecycle.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all netvariant operations
pub use crate::Error;

/// The result type used throughout netvariant
pub use crate::Result;

/// Numeric error codes and their descriptions
pub use crate::{str_error, ErrorCode};

// ================================================================================================
// Values
// ================================================================================================

/// The dynamically-typed value and its building blocks
pub use crate::variant::{Dict, Kind, Raw, RawKind, Variant};

// ================================================================================================
// Scalar Arithmetic
// ================================================================================================

/// Numeric engine seam and the default engine
pub use crate::variant::{ArithmeticOp, NumericEngine, StandardEngine};

/// Engine configuration
pub use crate::variant::{ArithmeticConfig, DivisionPolicy, OverflowPolicy};

// ================================================================================================
// Library Lifecycle
// ================================================================================================

/// Startup, cleanup and per-thread context
pub use crate::context::{ThreadContext, TlsHandle};

/// Lifecycle entry points
pub use crate::{cleanup, format_last_error, startup};
