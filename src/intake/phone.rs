/// A country offered in the phone picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub dial_code: &'static str,
}

/// Picker order; Estonia first.
pub const PREFERRED_COUNTRIES: [Country; 7] = [
    Country { code: "ee", name: "Estonia", dial_code: "372" },
    Country { code: "us", name: "United States", dial_code: "1" },
    Country { code: "uk", name: "United Kingdom", dial_code: "44" },
    Country { code: "fi", name: "Finland", dial_code: "358" },
    Country { code: "se", name: "Sweden", dial_code: "46" },
    Country { code: "lv", name: "Latvia", dial_code: "371" },
    Country { code: "lt", name: "Lithuania", dial_code: "370" },
];

pub const DEFAULT_COUNTRY: &str = "ee";

pub fn find_country(code: &str) -> Option<&'static Country> {
    PREFERRED_COUNTRIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
}

/// Phone-number checking as the intake form needs it. The form treats the
/// implementation as a black box.
pub trait PhoneValidator: Send + Sync {
    /// The number in international `+<digits>` form, or `None` if it is not a
    /// plausible number. `country` is the picker's selection and applies only
    /// to numbers written without an international prefix.
    fn normalize(&self, number: &str, country: &str) -> Option<String>;

    fn is_valid(&self, number: &str, country: &str) -> bool {
        self.normalize(number, country).is_some()
    }
}

const MIN_DIGITS: usize = 7;
const MAX_DIGITS: usize = 15;
const MIN_NATIONAL_DIGITS: usize = 4;

/// Length check on E.164 shape, with the picker's dial code prepended to
/// national numbers. No per-country numbering plans.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialCodePhoneValidator;

impl PhoneValidator for DialCodePhoneValidator {
    fn normalize(&self, number: &str, country: &str) -> Option<String> {
        let compact: String = number
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();

        let (international, rest) = if let Some(rest) = compact.strip_prefix('+') {
            (true, rest)
        } else if let Some(rest) = compact.strip_prefix("00") {
            (true, rest)
        } else {
            (false, compact.as_str())
        };

        if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let digits = if international {
            rest.to_string()
        } else {
            let national = rest.trim_start_matches('0');
            if national.len() < MIN_NATIONAL_DIGITS {
                return None;
            }
            format!("{}{}", find_country(country)?.dial_code, national)
        };

        (MIN_DIGITS..=MAX_DIGITS)
            .contains(&digits.len())
            .then(|| format!("+{digits}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn international_numbers_pass_through() {
        let v = DialCodePhoneValidator;
        assert_eq!(v.normalize("+372 5555 1234", "ee").as_deref(), Some("+37255551234"));
        assert_eq!(v.normalize("00358 40 123 4567", "ee").as_deref(), Some("+358401234567"));
    }

    #[test]
    fn national_numbers_get_dial_code() {
        let v = DialCodePhoneValidator;
        assert_eq!(v.normalize("5555 1234", "ee").as_deref(), Some("+37255551234"));
        assert_eq!(v.normalize("(212) 555-0100", "us").as_deref(), Some("+12125550100"));
        assert_eq!(v.normalize("07700 900123", "uk").as_deref(), Some("+447700900123"));
    }

    #[test]
    fn rejects_garbage() {
        let v = DialCodePhoneValidator;
        assert!(!v.is_valid("call me", "ee"));
        assert!(!v.is_valid("+12", "ee"));
        assert!(!v.is_valid("+1234567890123456", "ee"));
        assert!(!v.is_valid("555", "ee"));
        assert!(!v.is_valid("55551234", "zz"));
    }
}
