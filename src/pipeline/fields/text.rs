use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static DOSAGE_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(mcg|mg|meq|ml|g|units?)\b")
        .expect("dosage pattern is valid")
});

/// Capitalize the first letter of each whitespace-separated word and
/// lowercase the rest. Runs of whitespace collapse to one space.
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn normalize_medication_name(raw: &str) -> String {
    title_case(raw)
}

/// Canonical unit spelling with one space between amount and unit,
/// e.g. `500MG` -> `500 mg`, `25mcg` -> `25 μg`.
pub fn normalize_dosage(raw: &str) -> String {
    let dosage = raw.trim();
    DOSAGE_UNIT
        .replace_all(dosage, |caps: &Captures| {
            let unit = match caps[2].to_lowercase().as_str() {
                "mcg" => "μg",
                "mg" => "mg",
                "meq" => "mEq",
                "ml" => "mL",
                "g" => "g",
                "units" => "units",
                _ => "unit",
            };
            format!("{} {}", &caps[1], unit)
        })
        .into_owned()
}

/// Reference ranges use `-` as the separator: `3.5 to 5.0` -> `3.5-5.0`.
pub fn normalize_reference_range(raw: &str) -> String {
    let range = raw.trim();
    if range.is_empty() {
        return String::new();
    }
    range
        .replace(" to ", "-")
        .replace("to", "-")
        .replace('~', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("  lisinopril   HCTZ "), "Lisinopril Hctz");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn dosage_units() {
        assert_eq!(normalize_dosage("500MG"), "500 mg");
        assert_eq!(normalize_dosage("25mcg"), "25 μg");
        assert_eq!(normalize_dosage("2.5 ML"), "2.5 mL");
        assert_eq!(normalize_dosage("20 meq twice"), "20 mEq twice");
        assert_eq!(normalize_dosage("10 Units"), "10 units");
        assert_eq!(normalize_dosage("one tablet"), "one tablet");
    }

    #[test]
    fn dosage_idempotent() {
        for raw in ["500MG", "25mcg", "2.5ml", "1g", "as directed"] {
            let once = normalize_dosage(raw);
            assert_eq!(normalize_dosage(&once), once);
        }
    }

    #[test]
    fn reference_ranges() {
        assert_eq!(normalize_reference_range("3.5 to 5.0"), "3.5-5.0");
        assert_eq!(normalize_reference_range("70~99"), "70-99");
        assert_eq!(normalize_reference_range("12.0-15.5"), "12.0-15.5");
        assert_eq!(normalize_reference_range("  "), "");
    }
}
