//! Display helpers: rupee formatting, amounts in words and date presets.

mod currency;
mod dates;
mod words;

pub use currency::{format_inr, group_indian};
pub use dates::{DatePreset, DateRange};
pub use words::{amount_in_words, number_to_words};

/// Case-insensitive substring match used by every table search box
pub fn matches_text(needle: &str, haystacks: &[Option<&str>]) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    haystacks
        .iter()
        .flatten()
        .any(|hay| hay.to_lowercase().contains(&needle))
}

/// Keep only the digits of a phone number so formatting differences don't
/// defeat duplicate checks
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}
