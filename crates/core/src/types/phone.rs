//! Phone number type for messaging deep links.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// The input contains no digits at all.
    #[error("phone number must contain digits")]
    NoDigits,
    /// Fewer digits than any dialable international number.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum allowed digit count.
        min: usize,
    },
    /// More digits than E.164 allows.
    #[error("phone number must have at most {max} digits")]
    TooLong {
        /// Maximum allowed digit count.
        max: usize,
    },
}

/// An international phone number, normalized to its digits.
///
/// Formatting characters (`+`, spaces, dashes, parentheses) are stripped on
/// parse, so `"+967 780-065-525"` and `"967780065525"` are the same number.
///
/// ## Examples
///
/// ```
/// use souq_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+967 780-065-525").unwrap();
/// assert_eq!(phone.digits(), "967780065525");
///
/// assert!(PhoneNumber::parse("call me").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum digit count accepted.
    pub const MIN_DIGITS: usize = 7;

    /// Maximum digit count (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber`, keeping only its digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, or the digit count is
    /// outside `MIN_DIGITS..=MAX_DIGITS`.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        let digits = normalize_digits(s);

        if digits.is_empty() {
            return Err(PhoneNumberError::NoDigits);
        }

        if digits.len() < Self::MIN_DIGITS {
            return Err(PhoneNumberError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }

        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneNumberError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// The normalized digits, without a leading `+`.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }
}

/// Strip everything that is not an ASCII digit.
#[must_use]
pub fn normalize_digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}
