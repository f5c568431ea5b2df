use serde::{Deserialize, Serialize};
use std::fmt;

/// Trailing digits left visible when a phone number is formatted, enough
/// for a dispatcher to confirm "the one ending in 234" with the customer.
const VISIBLE_SUFFIX: usize = 3;

/// Customer phone number that hides everything but the last few digits in
/// Debug and Display output. API responses still carry the real value; the
/// mask only guards log macros like tracing::info!("{:?}", order).
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct MaskedPhone(pub String);

impl MaskedPhone {
    pub fn into_inner(self) -> String {
        self.0
    }

    fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= VISIBLE_SUFFIX {
            return "*".repeat(chars.len());
        }
        let hidden = chars.len() - VISIBLE_SUFFIX;
        let mut out = "*".repeat(hidden);
        out.extend(&chars[hidden..]);
        out
    }
}

impl fmt::Debug for MaskedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl fmt::Display for MaskedPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_keeps_only_trailing_digits() {
        let phone = MaskedPhone("+971500001234".to_string());
        assert_eq!(format!("{:?}", phone), "**********234");
        assert_eq!(format!("{}", phone), "**********234");
    }

    #[test]
    fn test_short_values_are_fully_masked() {
        let phone = MaskedPhone("123".to_string());
        assert_eq!(format!("{:?}", phone), "***");
    }

    #[test]
    fn test_inner_value_is_untouched() {
        let phone = MaskedPhone("+971500001234".to_string());
        assert_eq!(phone.clone().into_inner(), "+971500001234");
        assert_eq!(phone, MaskedPhone("+971500001234".to_string()));
    }
}
