//! String helpers for string subtraction and repetition.

use std::borrow::Cow;

/// Removes every non-overlapping occurrence of `pattern` from `source`, scanning left to right.
///
/// An empty pattern matches nothing, so the source is returned unchanged. Borrows when nothing
/// was removed.
///
/// # Examples
///
/// ```rust,ignore
/// assert_eq!(filter_out("foobarfoo", "foo"), "bar");
/// assert_eq!(filter_out("aaa", "aa"), "a");
/// ```
pub(crate) fn filter_out<'a>(source: &'a str, pattern: &str) -> Cow<'a, str> {
    if pattern.is_empty() || !source.contains(pattern) {
        return Cow::Borrowed(source);
    }
    Cow::Owned(source.replace(pattern, ""))
}

/// Replaces the content of `buffer` with `count` copies of its current content.
///
/// The existing allocation is reused and grown once to the final size. An empty buffer stays
/// empty for any count. Returns `None`, leaving `buffer` untouched, when the repeated length
/// exceeds `isize::MAX` bytes.
#[must_use]
pub(crate) fn repeat_into(buffer: &mut String, count: usize) -> Option<()> {
    match count {
        0 => buffer.clear(),
        1 => {}
        _ if buffer.is_empty() => {}
        _ => {
            let total = repeated_len(buffer.len(), count)?;
            let unit = buffer.clone();
            buffer.reserve_exact(total - unit.len());
            for _ in 1..count {
                buffer.push_str(&unit);
            }
        }
    }
    Some(())
}

/// Length of `count` copies of a `unit`-byte string, if a `String` can hold it.
fn repeated_len(unit: usize, count: usize) -> Option<usize> {
    unit.checked_mul(count)
        .filter(|&total| isize::try_from(total).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_out() {
        assert_eq!(filter_out("foobarfoo", "foo"), "bar");
        assert_eq!(filter_out("foo", "foo"), "");
        assert_eq!(filter_out("abc", "x"), "abc");
        assert_eq!(filter_out("abc", ""), "abc");
        assert_eq!(filter_out("", "abc"), "");
    }

    #[test]
    fn test_filter_out_is_non_overlapping() {
        assert_eq!(filter_out("aaa", "aa"), "a");
        assert_eq!(filter_out("ababab", "aba"), "bab");
    }

    #[test]
    fn test_filter_out_borrows_when_unchanged() {
        assert!(matches!(filter_out("abc", "x"), Cow::Borrowed(_)));
        assert!(matches!(filter_out("abc", "b"), Cow::Owned(_)));
    }

    #[test]
    fn test_repeat_into() {
        let mut buffer = String::from("ab");
        assert_eq!(repeat_into(&mut buffer, 3), Some(()));
        assert_eq!(buffer, "ababab");

        assert_eq!(repeat_into(&mut buffer, 1), Some(()));
        assert_eq!(buffer, "ababab");

        assert_eq!(repeat_into(&mut buffer, 0), Some(()));
        assert_eq!(buffer, "");

        let mut empty = String::new();
        assert_eq!(repeat_into(&mut empty, 5), Some(()));
        assert_eq!(empty, "");
    }

    #[test]
    fn test_repeat_into_huge_count() {
        let mut empty = String::new();
        assert_eq!(repeat_into(&mut empty, usize::MAX), Some(()));
        assert_eq!(empty, "");

        let mut buffer = String::from("ab");
        assert_eq!(repeat_into(&mut buffer, usize::MAX), None);
        assert_eq!(buffer, "ab");

        // fits in usize, but not in a String
        assert_eq!(repeat_into(&mut buffer, usize::MAX / 4 + 1), None);
        assert_eq!(buffer, "ab");
    }

    #[test]
    fn test_repeated_len() {
        assert_eq!(repeated_len(2, 3), Some(6));
        assert_eq!(repeated_len(0, usize::MAX), Some(0));
        assert_eq!(repeated_len(2, usize::MAX), None);
        assert_eq!(repeated_len(1, usize::MAX / 2), Some(usize::MAX / 2));
        assert_eq!(repeated_len(1, usize::MAX / 2 + 1), None);
    }
}
