//! ASCII case-insensitive byte search.

/// Returns the index of the first occurrence of `needle` in `haystack`,
/// comparing ASCII letters case-insensitively.
///
/// An empty needle matches at index 0.
#[must_use]
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

/// Like [`find`], but starts looking at `start` and returns an index into the
/// whole `haystack`.
///
/// A `start` past the end of the haystack finds nothing.
#[must_use]
pub fn find_from(haystack: &[u8], needle: &[u8], start: usize) -> Option<usize> {
    let tail = haystack.get(start..)?;
    find(tail, needle).map(|pos| start + pos)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_find_exact() {
        assert_eq!(find(b"MIME-Version: 1.0", b"Version"), Some(5));
        assert_eq!(find(b"abc", b"abc"), Some(0));
        assert_eq!(find(b"abc", b"abcd"), None);
    }

    #[test]
    fn test_find_ignores_case() {
        assert_eq!(find(b"mime-version: 1.0\r\n", b"MIME-Version: 1.0"), Some(0));
        assert_eq!(
            find(b"X\r\nCONTENT-TYPE: TEXT/PLAIN", b"Content-Type: text/plain"),
            Some(3)
        );
    }

    #[test]
    fn test_find_empty_needle() {
        assert_eq!(find(b"anything", b""), Some(0));
        assert_eq!(find(b"", b""), Some(0));
    }

    #[test]
    fn test_find_first_of_many() {
        assert_eq!(find(b"--X\r\n--X\r\n", b"--x"), Some(0));
    }

    #[test]
    fn test_find_from_offsets() {
        let haystack = b"--X one --X two";
        assert_eq!(find_from(haystack, b"--X", 0), Some(0));
        assert_eq!(find_from(haystack, b"--X", 1), Some(8));
        assert_eq!(find_from(haystack, b"--X", 9), None);
        assert_eq!(find_from(haystack, b"--X", 100), None);
    }

    #[test]
    fn test_non_ascii_bytes_compare_exactly() {
        assert_eq!(find("grüße".as_bytes(), "GRÜSSE".as_bytes()), None);
        assert_eq!(find("Grüße".as_bytes(), "gRüße".as_bytes()), Some(0));
    }

    proptest! {
        #[test]
        fn prop_find_matches_lowercased_search(
            haystack in "[a-zA-Z0-9 :;=\r\n-]{0,64}",
            needle in "[a-zA-Z0-9-]{1,6}",
        ) {
            let expected = haystack
                .to_ascii_lowercase()
                .find(&needle.to_ascii_lowercase());
            prop_assert_eq!(find(haystack.as_bytes(), needle.as_bytes()), expected);
        }
    }
}
