//! Home screen: every wallet with its recent activity.

use crate::api::types::{ActivityItem, Wallet};
use crate::api::WalletService;
use crate::screens::payment_method::PaymentOption;
use crate::screens::scope::ScreenScope;
use crate::screens::{LoadState, LOAD_ERROR_MESSAGE};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

/// Activity fetches in flight at once.
const ACTIVITY_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct WalletCard {
    pub wallet: Wallet,
    pub option: PaymentOption,
    pub activity: Vec<ActivityItem>,
    /// False when the activity call failed and `activity` is the empty stand-in.
    pub activity_loaded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    state: LoadState<Vec<WalletCard>>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists wallets, then fetches each wallet's activity concurrently.
    /// A failed activity call only empties that wallet's list.
    pub async fn load(&mut self, wallets: &dyn WalletService, scope: &ScreenScope) {
        self.state = LoadState::Loading;

        let fetch = async {
            let list = wallets.list_wallets().await?;
            let cards: Vec<WalletCard> = stream::iter(list)
                .map(|wallet| async move {
                    let response = wallets.wallet_activity(&wallet.wallet_id).await;
                    WalletCard {
                        option: PaymentOption::from_wallet(&wallet),
                        activity_loaded: response.success,
                        activity: response.data.items,
                        wallet,
                    }
                })
                .buffered(ACTIVITY_CONCURRENCY)
                .collect()
                .await;
            Ok::<_, crate::error::ClientError>(cards)
        };

        match scope.run(fetch).await {
            None => {}
            Some(Ok(cards)) => {
                info!(
                    wallets = cards.len(),
                    without_activity = cards.iter().filter(|c| !c.activity_loaded).count(),
                    "dashboard ready"
                );
                self.state = LoadState::Ready(cards);
            }
            Some(Err(e)) => {
                warn!(error = %e, "failed to load dashboard");
                self.state = LoadState::Failed(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    pub fn state(&self) -> &LoadState<Vec<WalletCard>> {
        &self.state
    }

    pub fn cards(&self) -> &[WalletCard] {
        self.state.ready().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn card(&self, wallet_id: &str) -> Option<&WalletCard> {
        self.cards().iter().find(|card| card.wallet.wallet_id == wallet_id)
    }
}
