//! Payment method selection: the user's wallets as pickable options.

use crate::api::types::{CurrencyKind, Wallet};
use crate::api::WalletService;
use crate::screens::scope::ScreenScope;
use crate::screens::{currency_symbol, LoadState};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const PAYMENT_METHODS_ERROR: &str = "Failed to load payment methods";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IconBackground {
    Orange,
    Indigo,
    Green,
    Blue,
    Purple,
    Emerald,
    Neutral,
}

impl IconBackground {
    pub fn css_class(&self) -> &'static str {
        match self {
            IconBackground::Orange => "bg-orange-500",
            IconBackground::Indigo => "bg-indigo-500",
            IconBackground::Green => "bg-green-500",
            IconBackground::Blue => "bg-blue-500",
            IconBackground::Purple => "bg-purple-500",
            IconBackground::Emerald => "bg-emerald-600",
            IconBackground::Neutral => "bg-gray-400",
        }
    }
}

struct CurrencyStyle {
    code: &'static str,
    glyph: &'static str,
    background: IconBackground,
    kind: CurrencyKind,
}

const CURRENCY_STYLES: &[CurrencyStyle] = &[
    CurrencyStyle {
        code: "BTC",
        glyph: "B",
        background: IconBackground::Orange,
        kind: CurrencyKind::Crypto,
    },
    CurrencyStyle {
        code: "ETH",
        glyph: "E",
        background: IconBackground::Indigo,
        kind: CurrencyKind::Crypto,
    },
    CurrencyStyle {
        code: "USDT",
        glyph: "T",
        background: IconBackground::Green,
        kind: CurrencyKind::Crypto,
    },
    CurrencyStyle {
        code: "USDC",
        glyph: "U",
        background: IconBackground::Blue,
        kind: CurrencyKind::Crypto,
    },
    CurrencyStyle {
        code: "SOL",
        glyph: "S",
        background: IconBackground::Purple,
        kind: CurrencyKind::Crypto,
    },
    CurrencyStyle {
        code: "NGN",
        glyph: "₦",
        background: IconBackground::Emerald,
        kind: CurrencyKind::Fiat,
    },
    CurrencyStyle {
        code: "USD",
        glyph: "$",
        background: IconBackground::Emerald,
        kind: CurrencyKind::Fiat,
    },
];

fn lookup_style(code: &str) -> Option<&'static CurrencyStyle> {
    CURRENCY_STYLES
        .iter()
        .find(|style| style.code.eq_ignore_ascii_case(code.trim()))
}

/// Glyph and background for a currency code. Unknown codes get their first
/// character, uppercased, on the neutral background.
pub fn currency_icon(code: &str) -> (String, IconBackground) {
    match lookup_style(code) {
        Some(style) => (style.glyph.to_string(), style.background),
        None => {
            let glyph = code
                .trim()
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect::<String>())
                .unwrap_or_else(|| "?".to_string());
            (glyph, IconBackground::Neutral)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOption {
    pub id: String,
    pub name: String,
    pub glyph: String,
    pub background: IconBackground,
    pub balance: Option<String>,
    pub crypto_amount: Option<String>,
    pub value: String,
    pub kind: CurrencyKind,
    pub currency_code: Option<String>,
}

impl PaymentOption {
    pub fn from_wallet(wallet: &Wallet) -> Self {
        let code = wallet.currency.code.trim().to_ascii_uppercase();
        let (glyph, background) = currency_icon(&code);
        let kind = wallet
            .currency
            .kind
            .or_else(|| lookup_style(&code).map(|style| style.kind))
            .unwrap_or(CurrencyKind::Crypto);
        let balance = wallet.balance.clone().unwrap_or_else(|| "0".to_string());

        let (fiat_balance, crypto_amount) = match kind {
            CurrencyKind::Fiat => {
                let shown = match currency_symbol(&code) {
                    Some(symbol) => format!("{}{}", symbol, balance),
                    None => format!("{} {}", code, balance),
                };
                (Some(shown), None)
            }
            CurrencyKind::Crypto => (None, Some(format!("{} {}", balance, code))),
        };

        Self {
            id: wallet.wallet_id.clone(),
            name: wallet
                .currency
                .name
                .clone()
                .unwrap_or_else(|| code.clone()),
            glyph,
            background,
            balance: fiat_balance,
            crypto_amount,
            value: wallet.wallet_id.clone(),
            kind,
            currency_code: (!code.is_empty()).then_some(code),
        }
    }

    /// Whether this wallet holds `currency`, so amounts in it can be debited as-is.
    pub fn pays_in(&self, currency: &str) -> bool {
        self.currency_code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case(currency.trim()))
    }

    /// Text shown under the option name.
    pub fn amount_label(&self) -> &str {
        self.crypto_amount
            .as_deref()
            .or(self.balance.as_deref())
            .unwrap_or("")
    }
}

/// Lists wallets as payment options; selecting one emits it.
#[derive(Debug, Clone, Default)]
pub struct PaymentMethodSelector {
    state: LoadState<Vec<PaymentOption>>,
}

impl PaymentMethodSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: Vec<PaymentOption>) -> Self {
        Self {
            state: LoadState::Ready(options),
        }
    }

    /// The single fetch issued on mount. Failure leaves a static message;
    /// there is no retry. A result arriving after unmount is dropped.
    pub async fn load(&mut self, wallets: &dyn WalletService, scope: &ScreenScope) {
        self.state = LoadState::Loading;
        match scope.run(wallets.list_wallets()).await {
            None => {}
            Some(Ok(list)) => {
                let options: Vec<PaymentOption> =
                    list.iter().map(PaymentOption::from_wallet).collect();
                info!(count = options.len(), "payment methods ready");
                self.state = LoadState::Ready(options);
            }
            Some(Err(e)) => {
                warn!(error = %e, "failed to load payment methods");
                self.state = LoadState::Failed(PAYMENT_METHODS_ERROR.to_string());
            }
        }
    }

    pub fn state(&self) -> &LoadState<Vec<PaymentOption>> {
        &self.state
    }

    pub fn options(&self) -> &[PaymentOption] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Emit the option with this id.
    pub fn select(&self, id: &str) -> Option<PaymentOption> {
        self.options().iter().find(|option| option.id == id).cloned()
    }
}
