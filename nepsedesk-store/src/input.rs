//! Lenient parsing for NPR amounts typed into text fields.

/// Parse a user-typed rupee amount. Accepts comma separators and
/// surrounding whitespace; rejects anything that is not a finite number.
pub fn parse_npr(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}
