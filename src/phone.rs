use regex::Regex;
use std::sync::OnceLock;

const COUNTRY_CODE: &str = "91";

fn qualified_number() -> &'static Regex {
    static QUALIFIED_NUMBER: OnceLock<Regex> = OnceLock::new();
    QUALIFIED_NUMBER.get_or_init(|| Regex::new(r"^91\d{10}$").expect("Invalid phone pattern"))
}

/// Normalizes a local or international number to `+91XXXXXXXXXX`.
///
/// Returns `None` for a blank slot so no message is sent to it.
pub fn normalize(input: &str) -> Option<String> {
    let compact: String = input.split_whitespace().collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    if digits.is_empty() {
        return None;
    }

    if qualified_number().is_match(digits) {
        Some(format!("+{}", digits))
    } else {
        Some(format!("+{}{}", COUNTRY_CODE, digits))
    }
}
