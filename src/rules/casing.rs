/// Capitalizes the first cased character of every word and lowercases the
/// rest. A word starts after any character without case, so apostrophes,
/// hyphens and digits all begin a new word: `"jOHN o'brien"` becomes
/// `"John O'Brien"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;
    for c in text.chars() {
        if prev_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_cased = c.is_lowercase() || c.is_uppercase();
    }
    out
}

/// True when the text has at least one letter and no lowercase letters.
pub fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}
