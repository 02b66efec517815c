use crate::api::types::{ActivityResponse, CreateWalletRequest, Envelope, Wallet};
use crate::api::{ThunderClient, WalletService};
use crate::error::ClientResult;
use async_trait::async_trait;
use tracing::{info, warn};

#[async_trait]
impl WalletService for ThunderClient {
    async fn list_wallets(&self) -> ClientResult<Vec<Wallet>> {
        let wallets = self
            .http()
            .get::<Envelope<Vec<Wallet>>>("/wallets")
            .await?
            .into_inner();
        info!(count = wallets.len(), "wallets fetched");
        Ok(wallets)
    }

    async fn wallet_activity(&self, wallet_id: &str) -> ActivityResponse {
        let path = format!("/wallets/{}/activity", wallet_id);
        match self.http().get::<ActivityResponse>(&path).await {
            Ok(activity) => activity,
            Err(e) => {
                warn!(wallet_id, error = %e, "wallet activity unavailable, showing empty list");
                ActivityResponse::empty_failure()
            }
        }
    }

    async fn create_wallet(&self, request: CreateWalletRequest) -> ClientResult<Wallet> {
        let wallet = self
            .http()
            .post::<Envelope<Wallet>, _>("/wallets", &request)
            .await?
            .into_inner();
        info!(
            wallet_id = %wallet.wallet_id,
            currency = %wallet.currency.code,
            network = %request.network,
            "wallet created"
        );
        Ok(wallet)
    }
}
