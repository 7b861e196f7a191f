/// Locale-dependent separators used when printing metric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub grouping: Option<char>,
    pub decimal: char,
}

impl NumberFormat {
    pub const GERMAN: Self = Self {
        grouping: Some('.'),
        decimal: ',',
    };
    pub const SWISS: Self = Self {
        grouping: Some('\''),
        decimal: '.',
    };
    pub const ENGLISH: Self = Self {
        grouping: Some(','),
        decimal: '.',
    };
    pub const FRENCH: Self = Self {
        grouping: Some('\u{202f}'),
        decimal: ',',
    };
    pub const PLAIN: Self = Self {
        grouping: None,
        decimal: '.',
    };

    /// Look up a format by language tag (`de-DE`, `en_US`, `fr`, ...).
    pub fn from_locale(tag: &str) -> Option<Self> {
        let tag = tag.trim().replace('_', "-").to_ascii_lowercase();
        match tag.as_str() {
            "de-ch" | "de-li" => Some(Self::SWISS),
            "plain" | "c" | "posix" => Some(Self::PLAIN),
            _ => match tag.split('-').next().unwrap_or("") {
                "de" => Some(Self::GERMAN),
                "en" => Some(Self::ENGLISH),
                "fr" => Some(Self::FRENCH),
                _ => None,
            },
        }
    }

    pub fn integer(&self, value: u64) -> String {
        self.group(&value.to_string())
    }

    pub fn decimal(&self, value: f64, places: usize) -> String {
        let raw = format!("{:.*}", places, value.abs());
        let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw.as_str(), ""));

        let mut out = String::with_capacity(raw.len() + 4);
        if value < 0.0 && raw.chars().any(|c| c.is_ascii_digit() && c != '0') {
            out.push('-');
        }
        out.push_str(&self.group(int_part));
        if !frac_part.is_empty() {
            out.push(self.decimal);
            out.push_str(frac_part);
        }
        out
    }

    fn group(&self, digits: &str) -> String {
        let Some(sep) = self.grouping else {
            return digits.to_string();
        };

        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(sep);
            }
            out.push(c);
        }
        out
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::GERMAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_german_grouping() {
        let fmt = NumberFormat::GERMAN;
        assert_eq!(fmt.integer(0), "0");
        assert_eq!(fmt.integer(999), "999");
        assert_eq!(fmt.integer(1_000), "1.000");
        assert_eq!(fmt.integer(1_234_567), "1.234.567");
        assert_eq!(fmt.decimal(1234.5, 2), "1.234,50");
    }

    #[test]
    fn test_english_and_plain() {
        assert_eq!(NumberFormat::ENGLISH.decimal(1234567.891, 2), "1,234,567.89");
        assert_eq!(NumberFormat::PLAIN.decimal(1234567.891, 2), "1234567.89");
        assert_eq!(NumberFormat::SWISS.integer(12_345), "12'345");
    }

    #[test]
    fn test_negative_and_zero() {
        assert_eq!(NumberFormat::GERMAN.decimal(-1500.26, 1), "-1.500,3");
        assert_eq!(NumberFormat::GERMAN.decimal(-0.001, 2), "0,00");
    }

    #[test]
    fn test_from_locale() {
        assert_eq!(NumberFormat::from_locale("de-DE"), Some(NumberFormat::GERMAN));
        assert_eq!(NumberFormat::from_locale("de_AT"), Some(NumberFormat::GERMAN));
        assert_eq!(NumberFormat::from_locale("de-CH"), Some(NumberFormat::SWISS));
        assert_eq!(NumberFormat::from_locale("EN-us"), Some(NumberFormat::ENGLISH));
        assert_eq!(NumberFormat::from_locale("fr"), Some(NumberFormat::FRENCH));
        assert_eq!(NumberFormat::from_locale("plain"), Some(NumberFormat::PLAIN));
        assert_eq!(NumberFormat::from_locale("xx-YY"), None);
    }
}
