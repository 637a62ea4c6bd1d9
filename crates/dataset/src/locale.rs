use configuration::SourceSettings;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Locale-specific numeric notation of a dataset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal: char,
    pub thousands: Option<char>,
}

impl NumberFormat {
    pub fn from_settings(source: &SourceSettings) -> Self {
        Self {
            decimal: source.decimal_separator,
            thousands: source.thousands_separator,
        }
    }

    /// Parses a locale-formatted number.
    ///
    /// Returns `None` for anything that is not a complete number: empty cells,
    /// stray characters, a second decimal separator, or digit groups of the
    /// wrong width.
    pub fn parse(&self, raw: &str) -> Option<Decimal> {
        let text = raw.trim();
        let (negative, body) = match text.as_bytes().first()? {
            b'-' => (true, &text[1..]),
            b'+' => (false, &text[1..]),
            _ => (false, text),
        };

        let (integer, fraction) = match body.split_once(self.decimal) {
            Some((i, f)) => (i, Some(f)),
            None => (body, None),
        };

        let integer = self.ungroup(integer)?;
        let fraction = match fraction {
            Some(f) if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) => return None,
            other => other,
        };
        if integer.is_empty() && fraction.is_none() {
            return None;
        }

        let mut normalized = String::with_capacity(text.len() + 1);
        if negative {
            normalized.push('-');
        }
        normalized.push_str(if integer.is_empty() { "0" } else { &integer });
        if let Some(f) = fraction {
            normalized.push('.');
            normalized.push_str(f);
        }
        Decimal::from_str(&normalized).ok()
    }

    /// Renders a number with this locale's decimal separator and no grouping.
    pub fn format(&self, value: Decimal) -> String {
        let text = value.to_string();
        if self.decimal == '.' {
            text
        } else {
            text.replace('.', &self.decimal.to_string())
        }
    }

    /// Strips valid thousands grouping from the integer part.
    fn ungroup(&self, integer: &str) -> Option<String> {
        let Some(sep) = self.thousands.filter(|s| integer.contains(*s)) else {
            return integer
                .bytes()
                .all(|b| b.is_ascii_digit())
                .then(|| integer.to_string());
        };

        let mut digits = String::with_capacity(integer.len());
        for (i, group) in integer.split(sep).enumerate() {
            let width_ok = if i == 0 {
                (1..=3).contains(&group.len())
            } else {
                group.len() == 3
            };
            if !width_ok || !group.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            digits.push_str(group);
        }
        Some(digits)
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal: ',',
            thousands: None,
        }
    }
}
