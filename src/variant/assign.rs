//! Ownership-aware assignment.
//!
//! [`Variant::assign`] copies one value into another while keeping the destination's buffer
//! whenever the kind stays the same: an empty source clears the destination buffer in place, a
//! non-empty source overwrites it through `clone_from`, which reuses its capacity. `Clone` is
//! implemented on top of it.

use std::ptr;

use crate::variant::value::Variant;

impl Variant {
    /// Copies `src` into `self`.
    ///
    /// After return `self` holds an independent copy of `src`:
    ///
    /// - `Nil` source: any buffer of `self` is released and `self` becomes `Nil`.
    /// - `Raw` source: any `Str`/`Dict` buffer of `self` is released, sub-kind and pattern are
    ///   copied verbatim.
    /// - `Str`/`Dict` source: a payload of another kind is released first. An unallocated or
    ///   empty source clears the destination buffer in place (keeping its allocation); otherwise
    ///   the buffer is allocated on demand or overwritten. A source sharing the destination's
    ///   buffer identity leaves it untouched.
    ///
    /// Assigning a value to itself is a no-op.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use netvariant::Variant;
    ///
    /// let mut dst = Variant::from(42_i32);
    /// dst.assign(&Variant::from("hello"));
    /// assert_eq!(dst.as_str(), Some("hello"));
    ///
    /// dst.assign(&Variant::empty_str());
    /// assert_eq!(dst.as_str(), Some(""));
    /// // the buffer is kept, only its content is cleared
    /// assert!(dst.is_allocated());
    /// ```
    pub fn assign(&mut self, src: &Variant) {
        if ptr::eq(&*self, src) {
            return;
        }

        match src {
            Variant::Nil => self.become_nil(),
            Variant::Raw(raw) => *self = Variant::Raw(*raw),
            Variant::Str(src_slot) => {
                let dst_slot = self.str_slot_mut();
                match src_slot {
                    Some(content) if !content.is_empty() => match dst_slot {
                        Some(buffer) if ptr::eq(&*buffer, content) => {}
                        Some(buffer) => buffer.clone_from(content),
                        None => *dst_slot = Some(content.clone()),
                    },
                    _ => {
                        if let Some(buffer) = dst_slot {
                            buffer.clear();
                        }
                    }
                }
            }
            Variant::Dict(src_slot) => {
                let dst_slot = self.dict_slot_mut();
                match src_slot {
                    Some(content) if !content.is_empty() => match dst_slot {
                        Some(buffer) if ptr::eq(&*buffer, content) => {}
                        Some(buffer) => buffer.clone_from(content),
                        None => *dst_slot = Some(content.clone()),
                    },
                    _ => {
                        if let Some(buffer) = dst_slot {
                            buffer.clear();
                        }
                    }
                }
            }
        }
    }
}

impl Clone for Variant {
    fn clone(&self) -> Self {
        let mut copy = Variant::Nil;
        copy.assign(self);
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}
