//! Screen view-models.
//!
//! Each screen owns its display state and turns user actions into state
//! changes or outbound events. Rendering is left to the host; nothing here
//! knows about widgets or styling beyond the CSS class names of icons.

pub mod bills;
pub mod confirmation;
pub mod convert;
pub mod dashboard;
pub mod executor;
pub mod onboarding;
pub mod payment_method;
pub mod pin;
pub mod profile;
pub mod receive;
pub mod scope;
pub mod success;
pub mod wizard;

#[cfg(test)]
pub(crate) mod fakes;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Generic text shown when a fetch fails.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load. Please try again later.";

/// Progress of a screen's data fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Loading
    }
}

/// One label/value line of a summary or receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub label: String,
    pub value: String,
}

impl DisplayRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Currency sign for the fiat currencies the app shows with a symbol.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.to_ascii_uppercase().as_str() {
        "NGN" => Some("₦"),
        "USD" => Some("$"),
        "GBP" => Some("£"),
        "EUR" => Some("€"),
        _ => None,
    }
}

/// `₦1500.00` for symbol currencies, `0.25 BTC` otherwise.
pub fn format_amount(currency: &str, amount: Decimal) -> String {
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{:.2}", symbol, amount),
        None => format!("{} {}", amount.normalize(), currency.to_ascii_uppercase()),
    }
}
