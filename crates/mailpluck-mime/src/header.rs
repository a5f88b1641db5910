//! Header value helpers.

/// Unfolds a header value by removing every CRLF pair.
///
/// RFC 2822 only treats a CRLF followed by whitespace as folding; this
/// removes all of them, so two genuinely separate lines would be joined. Lone
/// CR or LF bytes are kept. Pairs that only become adjacent once an inner
/// pair is gone (`\r\r\n\n`) are removed too, so the result never contains a
/// CRLF and unfolding it again is a no-op.
#[must_use]
pub fn unfold(value: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for &b in value {
        if b == b'\n' && out.last() == Some(&b'\r') {
            out.pop();
        } else {
            out.push(b);
        }
    }
    out
}

/// Skips leading spaces and tabs.
#[must_use]
pub fn strip_leading_whitespace(value: &[u8]) -> &[u8] {
    let start = value
        .iter()
        .position(|&b| b != b' ' && b != b'\t')
        .unwrap_or(value.len());
    &value[start..]
}
