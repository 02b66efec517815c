//! In-memory service fakes for screen tests.

use crate::api::types::{
    Acknowledgement, ActivityItem, ActivityResponse, CreateWalletRequest, ExecuteTransferRequest,
    ProfileResponse, QuoteRequest, TransferExecution, TransferQuote, Wallet,
};
use crate::api::{TransferService, UserService, WalletService};
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct FakeWallets {
    wallets: ClientResult<Vec<Wallet>>,
    activity: HashMap<String, Vec<ActivityItem>>,
    created: Mutex<Vec<CreateWalletRequest>>,
    list_calls: AtomicUsize,
}

impl FakeWallets {
    pub fn with_wallets(wallets: Vec<Wallet>) -> Self {
        Self {
            wallets: Ok(wallets),
            activity: HashMap::new(),
            created: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: ClientError) -> Self {
        Self {
            wallets: Err(error),
            ..Self::with_wallets(Vec::new())
        }
    }

    /// Activity for wallets not registered here fails (and is swallowed).
    pub fn with_activity(mut self, wallet_id: &str, items: Vec<ActivityItem>) -> Self {
        self.activity.insert(wallet_id.to_string(), items);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn created(&self) -> Vec<CreateWalletRequest> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletService for FakeWallets {
    async fn list_wallets(&self) -> ClientResult<Vec<Wallet>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.wallets.clone()
    }

    async fn wallet_activity(&self, wallet_id: &str) -> ActivityResponse {
        match self.activity.get(wallet_id) {
            Some(items) => serde_json::from_value(json!({
                "success": true,
                "data": { "items": items }
            }))
            .unwrap(),
            None => ActivityResponse::empty_failure(),
        }
    }

    async fn create_wallet(&self, request: CreateWalletRequest) -> ClientResult<Wallet> {
        self.created.lock().unwrap().push(request.clone());
        Ok(serde_json::from_value(json!({
            "walletId": "new-wallet",
            "currency": { "id": request.currency_id, "code": request.currency_id },
            "balance": "0",
            "address": "bc1qnewaddressxxxxxxxxxxxxxxxxxxxxxx",
            "network": request.network
        }))
        .unwrap())
    }
}

pub fn quote(total_debit: &str) -> TransferQuote {
    serde_json::from_value(json!({
        "quoteId": "q-1",
        "quoteReference": "QREF-1",
        "rate": "1500",
        "expiresAt": "2026-10-19T12:00:00Z",
        "sourceDebitAmount": "10",
        "networkFee": "0.5",
        "internalFee": "0.1",
        "totalDebit": total_debit
    }))
    .unwrap()
}

pub struct FakeTransfers {
    quote: ClientResult<TransferQuote>,
    execution: ClientResult<TransferExecution>,
    pub quotes: Mutex<Vec<QuoteRequest>>,
    pub executions: Mutex<Vec<ExecuteTransferRequest>>,
}

impl FakeTransfers {
    pub fn succeeding() -> Self {
        Self {
            quote: Ok(quote("10.6")),
            execution: Ok(TransferExecution {
                transaction_id: Some("tx-1".to_string()),
                reference: Some("REF-1".to_string()),
                status: Some("completed".to_string()),
                message: None,
            }),
            quotes: Mutex::new(Vec::new()),
            executions: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting_pin(message: &str) -> Self {
        Self {
            execution: Err(ClientError::Api {
                status: 400,
                body: json!({ "message": message }),
            }),
            ..Self::succeeding()
        }
    }

    pub fn failing_quote(error: ClientError) -> Self {
        Self {
            quote: Err(error),
            ..Self::succeeding()
        }
    }
}

#[async_trait]
impl TransferService for FakeTransfers {
    async fn quote(&self, request: QuoteRequest) -> ClientResult<TransferQuote> {
        self.quotes.lock().unwrap().push(request);
        self.quote.clone()
    }

    async fn execute(&self, request: ExecuteTransferRequest) -> ClientResult<TransferExecution> {
        self.executions.lock().unwrap().push(request);
        self.execution.clone()
    }
}

#[derive(Default)]
pub struct FakeUsers {
    pub fail_with: Option<ClientError>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeUsers {
    fn record(&self, endpoint: &str, value: &str) -> ClientResult<Acknowledgement> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), value.to_string()));
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(json!({ "success": true })),
        }
    }
}

#[async_trait]
impl UserService for FakeUsers {
    async fn get_profile(&self) -> ClientResult<ProfileResponse> {
        if let Some(e) = &self.fail_with {
            return Err(e.clone());
        }
        Ok(serde_json::from_value(json!({
            "success": true,
            "data": {
                "id": 7,
                "email": "ada@thunder.app",
                "firstName": "Ada",
                "lastName": "Obi",
                "phoneNumber": "+2348000000000",
                "hasPin": true
            }
        }))
        .unwrap())
    }

    async fn set_pin(&self, pin: &str) -> ClientResult<Acknowledgement> {
        self.record("set-pin", pin)
    }

    async fn reset_pin(&self, pin: &str) -> ClientResult<Acknowledgement> {
        self.record("reset-pin", pin)
    }

    async fn verify_reset_pin(&self, code: &str) -> ClientResult<Acknowledgement> {
        self.record("reset-pin/verify", code)
    }
}
