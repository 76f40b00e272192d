//! Label canonicalization for comparison.

/// Synonym contractions, applied in order after character stripping.
const CONTRACTIONS: [(&str, &str); 4] = [
    ("number", "num"),
    ("address", "addr"),
    ("telephone", "phone"),
    ("email", "mail"),
];

/// Normalizes a label for comparison.
///
/// Lowercases, drops every character that is not an ASCII letter or digit,
/// then applies the fixed synonym contractions. Labels that differ only by
/// case, punctuation or whitespace normalize identically.
pub fn normalize_label(raw: &str) -> String {
    let mut normalized: String = raw
        .chars()
        .flat_map(char::to_lowercase)
        .filter(char::is_ascii_alphanumeric)
        .collect();
    for (from, to) in CONTRACTIONS {
        if normalized.contains(from) {
            normalized = normalized.replace(from, to);
        }
    }
    normalized
}
