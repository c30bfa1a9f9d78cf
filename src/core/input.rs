/// Keeps ASCII digits only. Anything else is dropped without complaint.
pub fn sanitize_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Lenient numeric coercion: thousands separators are ignored and anything
/// that does not parse to a finite number becomes zero.
pub fn to_number(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert_eq, proptest};

    #[test]
    fn sanitize_strips_separators_and_letters() {
        assert_eq!(sanitize_digits("1,2a3b4"), "1234");
        assert_eq!(sanitize_digits("12a3"), "123");
        assert_eq!(sanitize_digits("₹ 50,000"), "50000");
        assert_eq!(sanitize_digits("-7.5"), "75");
        assert_eq!(sanitize_digits("abc"), "");
    }

    #[test]
    fn sanitize_ignores_non_ascii_digits() {
        assert_eq!(sanitize_digits("١٢٣4"), "4");
    }

    #[test]
    fn to_number_degrades_to_zero() {
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("   "), 0.0);
        assert_eq!(to_number("abc"), 0.0);
        assert_eq!(to_number("NaN"), 0.0);
        assert_eq!(to_number("inf"), 0.0);
    }

    #[test]
    fn to_number_reads_plain_and_grouped_values() {
        assert_eq!(to_number("80000"), 80_000.0);
        assert_eq!(to_number("1,50,000"), 150_000.0);
        assert_eq!(to_number(" 5.9 "), 5.9);
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(raw in any::<String>()) {
            let once = sanitize_digits(&raw);
            let twice = sanitize_digits(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(once.chars().all(|c| c.is_ascii_digit()), true);
        }
    }
}
