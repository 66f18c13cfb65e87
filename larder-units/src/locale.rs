//! Locale-aware number rendering

/// Separator conventions for one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub tag: &'static str,
    pub decimal: char,
    pub group: char,
    /// Integer digits required before grouping kicks in
    pub min_grouping_digits: usize,
}

const fn locale(tag: &'static str, decimal: char, group: char, min_grouping_digits: usize) -> NumberLocale {
    NumberLocale { tag, decimal, group, min_grouping_digits }
}

static LOCALES: [NumberLocale; 9] = [
    locale("en-US", '.', ',', 4),
    locale("en-GB", '.', ',', 4),
    locale("de-DE", ',', '.', 4),
    locale("fr-FR", ',', '\u{202f}', 4),
    locale("it-IT", ',', '.', 4),
    locale("es-ES", ',', '.', 5),
    locale("pt-BR", ',', '.', 4),
    locale("nl-NL", ',', '.', 4),
    locale("de-CH", '.', '\u{2019}', 4),
];

/// Resolve a locale tag: exact tag, then language prefix, then en-US
pub fn number_locale(tag: &str) -> &'static NumberLocale {
    find_number_locale(tag).unwrap_or(&LOCALES[0])
}

/// Exact tag or language-prefix match, `None` when the language is unknown
pub fn find_number_locale(tag: &str) -> Option<&'static NumberLocale> {
    let tag = tag.trim().replace('_', "-");
    if let Some(found) = LOCALES.iter().find(|l| l.tag.eq_ignore_ascii_case(&tag)) {
        return Some(found);
    }
    let language = tag.split('-').next().unwrap_or_default();
    LOCALES.iter()
        .find(|l| l.tag.split('-').next().is_some_and(|lang| lang.eq_ignore_ascii_case(language)))
}

/// Group the digits of a non-negative integer string
pub fn group_digits(digits: &str, locale: &NumberLocale) -> String {
    if digits.len() < locale.min_grouping_digits {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(locale.group);
        }
        out.push(c);
    }
    out
}

/// Render a number rounded to `significant_digits`, trailing zeros trimmed
pub fn format_decimal(value: f64, locale: &NumberLocale, significant_digits: u32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let digits = significant_digits.clamp(1, 15) as i32;
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = digits - 1 - magnitude;

    let plain = if decimals > 15 {
        // Too small for fixed notation
        return format!("{:.*e}", (digits - 1) as usize, value);
    } else if decimals > 0 {
        let scale = 10f64.powi(decimals);
        format!("{:.*}", decimals as usize, (value.abs() * scale).round() / scale)
    } else {
        let scale = 10f64.powi(-decimals);
        format!("{:.0}", (value.abs() / scale).round() * scale)
    };

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (plain.as_str(), ""),
    };

    let mut out = String::new();
    if value < 0.0 && (int_part.chars().any(|c| c != '0') || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, locale));
    if !frac_part.is_empty() {
        out.push(locale.decimal);
        out.push_str(frac_part);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> &'static NumberLocale {
        number_locale("en-US")
    }

    #[test]
    fn test_locale_resolution() {
        assert_eq!(number_locale("de-DE").decimal, ',');
        assert_eq!(number_locale("de_de").tag, "de-DE");
        assert_eq!(number_locale("de-AT").tag, "de-DE");
        assert_eq!(number_locale("fr").tag, "fr-FR");
        assert_eq!(number_locale("xx-YY").tag, "en-US");
        assert_eq!(number_locale("").tag, "en-US");
        assert!(find_number_locale("xx-YY").is_none());
        assert_eq!(find_number_locale("pt").map(|l| l.tag), Some("pt-BR"));
    }

    #[test]
    fn test_significant_digits() {
        assert_eq!(format_decimal(0.41421356, en(), 4), "0.4142");
        assert_eq!(format_decimal(2.5, en(), 4), "2.5");
        assert_eq!(format_decimal(236.5882365, en(), 4), "236.6");
        assert_eq!(format_decimal(12345.0, en(), 4), "12,350");
        assert_eq!(format_decimal(3.0, en(), 4), "3");
        assert_eq!(format_decimal(236.5882365, en(), 6), "236.588");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(format_decimal(1234.5, en(), 4), "1,235");
        assert_eq!(format_decimal(-1234.5, en(), 4), "-1,235");
    }

    #[test]
    fn test_separators() {
        assert_eq!(format_decimal(1234.5, number_locale("de-DE"), 4), "1.235");
        assert_eq!(format_decimal(1.25, number_locale("de-DE"), 4), "1,25");
        assert_eq!(format_decimal(1234567.0, number_locale("fr-FR"), 7), "1\u{202f}234\u{202f}567");
        assert_eq!(format_decimal(1234.0, number_locale("es-ES"), 4), "1234");
        assert_eq!(format_decimal(12345.0, number_locale("es-ES"), 5), "12.345");
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_decimal(0.0, en(), 4), "0");
        assert_eq!(format_decimal(f64::NAN, en(), 4), "NaN");
        assert_eq!(format_decimal(f64::NEG_INFINITY, en(), 4), "-∞");
        assert_eq!(format_decimal(-0.00001, en(), 1), "-0.00001");
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("123", en()), "123");
        assert_eq!(group_digits("1234", en()), "1,234");
        assert_eq!(group_digits("1234567", en()), "1,234,567");
    }
}
