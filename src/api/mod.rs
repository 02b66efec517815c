//! REST service wrappers for the Thunder backend.
//!
//! [`ThunderClient`] implements the three service traits. Screens depend on
//! the traits, so tests can swap in fakes without a network.

pub mod http;
pub mod transfer;
pub mod types;
pub mod user;
pub mod wallet;

use crate::config::ApiConfig;
use crate::error::ClientResult;
use crate::session::BearerToken;
use async_trait::async_trait;
use self::http::ApiHttpClient;
use self::types::{
    Acknowledgement, ActivityResponse, CreateWalletRequest, ExecuteTransferRequest,
    ProfileResponse, QuoteRequest, TransferExecution, TransferQuote, Wallet,
};

#[async_trait]
pub trait WalletService: Send + Sync {
    async fn list_wallets(&self) -> ClientResult<Vec<Wallet>>;

    /// Never fails: any error becomes [`ActivityResponse::empty_failure`].
    async fn wallet_activity(&self, wallet_id: &str) -> ActivityResponse;

    async fn create_wallet(&self, request: CreateWalletRequest) -> ClientResult<Wallet>;
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_profile(&self) -> ClientResult<ProfileResponse>;

    async fn set_pin(&self, pin: &str) -> ClientResult<Acknowledgement>;

    async fn reset_pin(&self, pin: &str) -> ClientResult<Acknowledgement>;

    async fn verify_reset_pin(&self, code: &str) -> ClientResult<Acknowledgement>;
}

#[async_trait]
pub trait TransferService: Send + Sync {
    async fn quote(&self, request: QuoteRequest) -> ClientResult<TransferQuote>;

    async fn execute(&self, request: ExecuteTransferRequest) -> ClientResult<TransferExecution>;
}

/// Client for the Thunder REST API, configured once with its credential.
#[derive(Clone)]
pub struct ThunderClient {
    http: ApiHttpClient,
}

impl ThunderClient {
    pub fn new(config: &ApiConfig, token: Option<BearerToken>) -> ClientResult<Self> {
        Ok(Self {
            http: ApiHttpClient::new(&config.base_url, token)?,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.http.has_token()
    }

    pub fn http(&self) -> &ApiHttpClient {
        &self.http
    }
}
