//! Supported storefront locales.
//!
//! Every public page lives under a locale prefix (`/en/...`, `/ar/...`). The
//! locale picks the catalog translation, the text direction, and the currency
//! prices are shown and summed in.

use serde::{Deserialize, Serialize};

use super::price::CurrencyCode;

/// Error returned when a string is not a supported locale code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale: {0}")]
pub struct LocaleError(pub String);

/// A supported storefront locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English, left-to-right, priced in USD.
    #[default]
    En,
    /// Arabic, right-to-left, priced in SAR.
    Ar,
}

/// Text direction for the `dir` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Value for the HTML `dir` attribute.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

impl Locale {
    /// All supported locales.
    pub const ALL: [Self; 2] = [Self::En, Self::Ar];

    /// Two-letter language code, also used as the URL prefix.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }

    #[must_use]
    pub const fn direction(&self) -> TextDirection {
        match self {
            Self::En => TextDirection::Ltr,
            Self::Ar => TextDirection::Rtl,
        }
    }

    /// Currency that catalog prices are shown in for this locale.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        match self {
            Self::En => CurrencyCode::USD,
            Self::Ar => CurrencyCode::SAR,
        }
    }

    /// Read the locale from the first segment of a request path.
    ///
    /// Returns `None` when the path has no supported locale prefix, e.g.
    /// `/cart` or `/fr/cart`.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        path.trim_start_matches('/')
            .split('/')
            .next()
            .and_then(|segment| segment.parse().ok())
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            _ => Err(LocaleError(s.to_owned())),
        }
    }
}
