//! Small helpers shared by the variant operators.

mod text;

pub(crate) use text::{filter_out, repeat_into};
