//! Deposit details for one currency, creating the wallet when the user has
//! none yet.

use crate::api::types::{CreateWalletRequest, Wallet};
use crate::api::WalletService;
use crate::error::{ClientError, ClientResult};
use crate::logging::mask_address;
use crate::screens::scope::ScreenScope;
use crate::screens::{LoadState, LOAD_ERROR_MESSAGE};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ReceiveView {
    /// Show this address and network to the payer.
    Deposit {
        wallet_id: String,
        address: String,
        network: Option<String>,
    },
    /// The wallet exists but the backend has no address for it (fiat).
    NoAddress { wallet_id: String },
    /// No wallet in this currency; offer to create one.
    NoWallet,
}

impl ReceiveView {
    fn from_wallet(wallet: &Wallet) -> Self {
        match wallet.address.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            Some(address) => ReceiveView::Deposit {
                wallet_id: wallet.wallet_id.clone(),
                address: address.to_string(),
                network: wallet.network.clone(),
            },
            None => ReceiveView::NoAddress {
                wallet_id: wallet.wallet_id.clone(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReceiveScreen {
    currency_code: String,
    state: LoadState<ReceiveView>,
    creating: bool,
    create_error: Option<String>,
}

impl ReceiveScreen {
    pub fn new(currency_code: impl Into<String>) -> Self {
        Self {
            currency_code: currency_code.into().trim().to_ascii_uppercase(),
            state: LoadState::Loading,
            creating: false,
            create_error: None,
        }
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    pub fn state(&self) -> &LoadState<ReceiveView> {
        &self.state
    }

    pub fn is_creating(&self) -> bool {
        self.creating
    }

    pub fn create_error(&self) -> Option<&str> {
        self.create_error.as_deref()
    }

    pub async fn load(&mut self, wallets: &dyn WalletService, scope: &ScreenScope) {
        self.state = LoadState::Loading;
        match scope.run(wallets.list_wallets()).await {
            None => {}
            Some(Ok(list)) => {
                let view = list
                    .iter()
                    .find(|w| w.currency.code.eq_ignore_ascii_case(&self.currency_code))
                    .map(ReceiveView::from_wallet)
                    .unwrap_or(ReceiveView::NoWallet);
                self.state = LoadState::Ready(view);
            }
            Some(Err(e)) => {
                warn!(error = %e, currency = %self.currency_code, "failed to load receive details");
                self.state = LoadState::Failed(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Create the missing wallet. Only offered from [`ReceiveView::NoWallet`].
    pub async fn create_wallet(
        &mut self,
        wallets: &dyn WalletService,
        currency_id: &str,
        network: &str,
        scope: &ScreenScope,
    ) -> ClientResult<()> {
        if !matches!(self.state, LoadState::Ready(ReceiveView::NoWallet)) {
            return Err(ClientError::validation(
                "A wallet already exists for this currency",
                None,
            ));
        }
        if currency_id.trim().is_empty() || network.trim().is_empty() {
            return Err(ClientError::validation(
                "Choose a currency and network",
                Some("network"),
            ));
        }

        self.creating = true;
        self.create_error = None;
        let request = CreateWalletRequest {
            currency_id: currency_id.trim().to_string(),
            network: network.trim().to_string(),
        };
        let result = scope.run(wallets.create_wallet(request)).await;
        self.creating = false;

        match result {
            None => Ok(()),
            Some(Ok(wallet)) => {
                info!(
                    wallet_id = %wallet.wallet_id,
                    address = %wallet.address.as_deref().map(mask_address).unwrap_or_default(),
                    "wallet created"
                );
                self.state = LoadState::Ready(ReceiveView::from_wallet(&wallet));
                Ok(())
            }
            Some(Err(e)) => {
                self.create_error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
