use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s\-\(\)\+]").expect("phone separator pattern is valid")
});

pub const INVALID_PHONE_MESSAGE: &str =
    "Please enter a valid Philippines phone number (e.g., +63 912 345 6789 or 0912 345 6789)";

/// Normalizes a Philippine mobile number to `+63 XXX XXX XXXX`.
///
/// Accepts the international form (`+63 ...`), the trunk form (`0...`) and the
/// bare ten digits, with any spacing, dashes or parentheses.
pub fn normalize_ph_phone(raw: &str) -> Option<String> {
    let digits = PHONE_SEPARATORS.replace_all(raw, "");
    let digits = digits.strip_prefix("63").unwrap_or(&digits);
    let digits = digits.strip_prefix('0').unwrap_or(digits);

    if digits.len() != 10 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(format!("+63 {} {} {}", &digits[..3], &digits[3..6], &digits[6..]))
}
