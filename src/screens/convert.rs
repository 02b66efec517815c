//! Currency conversion between two of the user's own wallets.

use crate::api::types::{FixedSide, QuoteRequest, Recipient, TransferExecution, TransferQuote};
use crate::api::TransferService;
use crate::error::{ClientError, ClientResult};
use crate::screens::executor::execute_quote;
use crate::screens::pin::{PinEntry, PinOutcome};
use crate::screens::scope::ScreenScope;
use crate::screens::DisplayRow;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ConvertStatus {
    Editing,
    Quoted,
    Done(TransferExecution),
}

#[derive(Debug)]
pub struct ConvertScreen {
    wallet_id: String,
    recipient: Recipient,
    fixed_side: FixedSide,
    quote: Option<TransferQuote>,
    quote_error: Option<String>,
    pin: PinEntry,
    status: ConvertStatus,
}

impl ConvertScreen {
    pub fn new(wallet_id: impl Into<String>, to_currency_id: impl Into<String>) -> Self {
        Self {
            wallet_id: wallet_id.into(),
            recipient: Recipient::Conversion {
                to_currency_id: to_currency_id.into(),
            },
            fixed_side: FixedSide::Source,
            quote: None,
            quote_error: None,
            pin: PinEntry::new(),
            status: ConvertStatus::Editing,
        }
    }

    /// Whether the entered amount is what leaves the source wallet or what
    /// arrives in the destination one. Changing it drops the current quote.
    pub fn set_fixed_side(&mut self, side: FixedSide) {
        if self.fixed_side != side {
            self.fixed_side = side;
            self.quote = None;
            self.status = ConvertStatus::Editing;
        }
    }

    pub fn fixed_side(&self) -> FixedSide {
        self.fixed_side
    }

    pub fn quote(&self) -> Option<&TransferQuote> {
        self.quote.as_ref()
    }

    pub fn quote_error(&self) -> Option<&str> {
        self.quote_error.as_deref()
    }

    pub fn status(&self) -> &ConvertStatus {
        &self.status
    }

    pub fn pin(&self) -> &PinEntry {
        &self.pin
    }

    pub async fn request_quote(
        &mut self,
        transfers: &dyn TransferService,
        amount: &str,
        scope: &ScreenScope,
    ) -> ClientResult<()> {
        let parsed = Decimal::from_str(amount.trim())
            .ok()
            .filter(|a| *a > Decimal::ZERO)
            .ok_or_else(|| ClientError::validation("Enter a valid amount", Some("amount")))?;

        let request = QuoteRequest::new(
            self.wallet_id.clone(),
            parsed.to_string(),
            self.fixed_side,
            &self.recipient,
        );
        self.quote_error = None;

        match scope.run(transfers.quote(request)).await {
            None => Ok(()),
            Some(Ok(quote)) => {
                info!(quote_id = %quote.quote_id, rate = %quote.rate, "conversion quoted");
                self.quote = Some(quote);
                self.pin.clear();
                self.pin.set_error(None);
                self.status = ConvertStatus::Quoted;
                Ok(())
            }
            Some(Err(e)) => {
                warn!(error = %e, "conversion quote failed");
                self.quote = None;
                self.quote_error = Some(e.user_message());
                self.status = ConvertStatus::Editing;
                Err(e)
            }
        }
    }

    /// Fee breakdown of the current quote.
    pub fn breakdown(&self, now: DateTime<Utc>) -> Vec<DisplayRow> {
        let Some(quote) = &self.quote else {
            return Vec::new();
        };
        let mut rows = vec![
            DisplayRow::new("Rate", quote.rate.clone()),
            DisplayRow::new("You convert", quote.source_debit_amount.clone()),
            DisplayRow::new("Network fee", quote.network_fee.clone()),
            DisplayRow::new("Service fee", quote.internal_fee.clone()),
            DisplayRow::new("Total debit", quote.total_debit.clone()),
        ];
        if let Some(seconds) = quote.seconds_remaining(now) {
            rows.push(DisplayRow::new("Expires in", format!("{}s", seconds)));
        }
        rows
    }

    /// Feed a PIN slot; a complete PIN executes the quote.
    pub async fn pin_input(
        &mut self,
        index: usize,
        value: &str,
        transfers: &dyn TransferService,
        scope: &ScreenScope,
    ) -> PinOutcome {
        if self.status != ConvertStatus::Quoted {
            return PinOutcome::Ignored;
        }
        let outcome = self.pin.input(index, value);
        if let PinOutcome::Complete(pin) = &outcome {
            self.execute(transfers, pin, scope).await;
        }
        outcome
    }

    async fn execute(&mut self, transfers: &dyn TransferService, pin: &str, scope: &ScreenScope) {
        let Some(quote) = self.quote.clone() else {
            return;
        };
        self.pin.set_loading(true);
        let result = scope
            .run(execute_quote(transfers, &quote, &self.recipient, pin))
            .await;
        self.pin.set_loading(false);

        match result {
            None => {}
            Some(Ok(execution)) => {
                info!(transaction_id = ?execution.transaction_id, "conversion executed");
                self.status = ConvertStatus::Done(execution);
            }
            Some(Err(e)) => {
                warn!(error = %e, "conversion rejected");
                self.pin.clear();
                self.pin.set_error(Some(e.user_message()));
            }
        }
    }
}
