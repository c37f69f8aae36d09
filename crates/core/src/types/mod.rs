//! Core types for Souq.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod locale;
pub mod payment;
pub mod phone;
pub mod price;

pub use id::*;
pub use locale::{Locale, LocaleError, TextDirection};
pub use payment::PaymentMethod;
pub use phone::{PhoneNumber, PhoneNumberError};
pub use price::{CurrencyCode, Price, format_amount};
