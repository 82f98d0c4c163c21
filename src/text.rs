//! Conversions between the fixed-width text fields of the file format and
//! Rust strings.

/// The text before the first NUL. The bytes must already be known to be
/// ASCII.
pub(crate) fn nul_terminated(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|b| **b != 0)
        .map(|b| char::from(*b))
        .collect()
}

/// Every byte becomes one character. Control characters and anything outside
/// of ASCII are shown as a space so the text is the same width as the field.
pub(crate) fn printable(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| {
            if b.is_ascii() && !b.is_ascii_control() {
                char::from(*b)
            } else {
                ' '
            }
        })
        .collect()
}

/// Make a setting name usable as a file name. Path separators, characters
/// reserved on common file systems and control characters are replaced by an
/// underscore, and surrounding whitespace and dots are removed.
pub fn file_stem_for(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    replaced
        .trim_matches(|c: char| c.is_whitespace() || c == '.')
        .to_owned()
}
