use super::vocab::result_qualifier;

/// Temperatures above this are assumed to be Fahrenheit.
const CELSIUS_CEILING: f64 = 45.0;

/// Decimal places for vital signs.
pub const VITALS_PRECISION: usize = 1;

/// Parse a number, tolerating stray characters (`"120 mmHg"`, `"~98.6F"`)
/// by keeping only digits and the first decimal point.
pub fn parse_lenient(raw: &str) -> Option<f64> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(f) = value.parse::<f64>() {
        if f.is_finite() {
            return Some(f);
        }
    }

    let mut digits = String::with_capacity(value.len());
    let mut seen_decimal = false;
    for c in value.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c == '.' && !seen_decimal {
            digits.push(c);
            seen_decimal = true;
        }
    }
    digits.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Format a leniently-parsed number with `precision` decimals. Empty stays
/// empty and unparseable values come back unchanged.
pub fn normalize_numeric(raw: &str, precision: usize) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    match parse_lenient(raw) {
        Some(f) => format!("{:.*}", precision, f),
        None => raw.to_string(),
    }
}

/// Numeric temperature in Celsius. Values above a plausible Celsius
/// ceiling are treated as Fahrenheit and converted.
pub fn normalize_temperature(raw: &str) -> String {
    let temp = normalize_numeric(raw, VITALS_PRECISION);
    match temp.parse::<f64>() {
        Ok(f) if f > CELSIUS_CEILING => {
            format!("{:.*}", VITALS_PRECISION, (f - 32.0) * 5.0 / 9.0)
        }
        _ => temp,
    }
}

/// Percentages on a 0-100 scale. Fractions in `0..=1` are scaled up; a
/// trailing `%` is dropped; anything out of range passes through.
pub fn normalize_percentage(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }
    let value = value.strip_suffix('%').unwrap_or(value).trim();

    match value.parse::<f64>() {
        Ok(f) if f > 1.0 && f <= 100.0 => format!("{:.*}", VITALS_PRECISION, f),
        Ok(f) if (0.0..=1.0).contains(&f) => format!("{:.*}", VITALS_PRECISION, f * 100.0),
        _ => value.to_string(),
    }
}

/// Decimal places for a lab value, chosen by its raw unit.
pub fn result_precision(unit: &str) -> usize {
    match unit.trim().to_lowercase().as_str() {
        "g/dl" | "g/l" | "mg/dl" | "mg/l" | "%" => 1,
        _ => 2,
    }
}

/// Lab result value. Qualitative results get canonical labels; numbers are
/// formatted with a unit-dependent precision; anything else (`<0.5`,
/// `see note`) passes through trimmed.
pub fn normalize_result_value(raw: &str, unit: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }
    if let Some(label) = result_qualifier(value) {
        return label.to_string();
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => format!("{:.*}", result_precision(unit), f),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parsing_strips_noise() {
        assert_eq!(parse_lenient("120 mmHg"), Some(120.0));
        assert_eq!(parse_lenient("~98.6F"), Some(98.6));
        assert_eq!(parse_lenient("1.2.3"), Some(1.23));
        assert_eq!(parse_lenient("n/a"), None);
        assert_eq!(parse_lenient(""), None);
    }

    #[test]
    fn numeric_formats_one_decimal() {
        assert_eq!(normalize_numeric("72", VITALS_PRECISION), "72.0");
        assert_eq!(normalize_numeric(" 120/ ", VITALS_PRECISION), "120.0");
        assert_eq!(normalize_numeric("unknown", VITALS_PRECISION), "unknown");
        assert_eq!(normalize_numeric("  ", VITALS_PRECISION), "");
    }

    #[test]
    fn fahrenheit_converted() {
        assert_eq!(normalize_temperature("98.6"), "37.0");
        assert_eq!(normalize_temperature("101.2 F"), "38.4");
    }

    #[test]
    fn celsius_kept() {
        assert_eq!(normalize_temperature("37.2"), "37.2");
        assert_eq!(normalize_temperature("36"), "36.0");
    }

    #[test]
    fn percentages() {
        assert_eq!(normalize_percentage("98%"), "98.0");
        assert_eq!(normalize_percentage("0.97"), "97.0");
        assert_eq!(normalize_percentage("140"), "140");
        assert_eq!(normalize_percentage("low"), "low");
    }

    #[test]
    fn result_values_by_unit() {
        assert_eq!(normalize_result_value("12.345", "g/dl"), "12.3");
        assert_eq!(normalize_result_value("4.1", "mmol/L"), "4.10");
        assert_eq!(normalize_result_value("pos", "mg/dL"), "Positive");
        assert_eq!(normalize_result_value("<0.5", "ng/mL"), "<0.5");
    }
}
