use regex::Regex;

lazy_static! {
    /* ASCII digits only, so every match is something `f64::from_str` accepts */
    static ref NUMBER: Regex = Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap();
}

/// Extract the first unsigned decimal number from free text such as `"1,234.5 Litres"`.
///
/// Commas are treated as thousands separators and dropped before scanning. Returns `None` for
/// absent or empty input, when no digits are found, or when the digits overflow `f64`.
pub fn extract_number(text: Option<&str>) -> Option<f64> {
    let text = text?.replace(',', "");

    NUMBER
        .find(&text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
