//! What happens when the wizard's PIN is complete.

use crate::api::types::{
    ExecuteTransferRequest, FixedSide, QuoteRequest, Recipient, TransferExecution, TransferQuote,
};
use crate::api::TransferService;
use crate::error::{ClientError, ClientResult};
use crate::screens::success::Receipt;
use crate::screens::wizard::PaymentDraft;
use crate::screens::payment_method::PaymentOption;
use crate::screens::{format_amount, DisplayRow};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

#[async_trait]
pub trait PaymentExecutor: Send + Sync {
    /// Price the drafted payment before the user confirms it.
    async fn quote(&self, draft: &PaymentDraft) -> ClientResult<TransferQuote>;

    /// Authorize and perform the quoted payment with `pin`.
    async fn execute(
        &self,
        draft: &PaymentDraft,
        quote: &TransferQuote,
        pin: &str,
    ) -> ClientResult<Receipt>;
}

/// Executes a quoted transfer with the user's PIN.
pub async fn execute_quote(
    transfers: &dyn TransferService,
    quote: &TransferQuote,
    recipient: &Recipient,
    pin: &str,
) -> ClientResult<TransferExecution> {
    transfers
        .execute(ExecuteTransferRequest {
            quote_reference: quote.reference().to_string(),
            recipient_identifier: recipient.identifier().to_string(),
            pin: pin.to_string(),
        })
        .await
}

/// Pays a draft as a transfer from a wallet in the draft's currency.
pub struct TransferExecutor {
    transfers: Arc<dyn TransferService>,
    recipient: Recipient,
    fixed_side: FixedSide,
}

impl TransferExecutor {
    pub fn new(transfers: Arc<dyn TransferService>, recipient: Recipient) -> Self {
        Self {
            transfers,
            recipient,
            fixed_side: FixedSide::Source,
        }
    }

    pub fn with_fixed_side(mut self, fixed_side: FixedSide) -> Self {
        self.fixed_side = fixed_side;
        self
    }

    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }
}

fn chosen_method(draft: &PaymentDraft) -> ClientResult<&PaymentOption> {
    let method = draft
        .method
        .as_ref()
        .ok_or_else(|| ClientError::validation("Select a payment method", Some("method")))?;
    if !method.pays_in(&draft.currency) {
        return Err(ClientError::validation(
            format!("Pay from a {} wallet", draft.currency),
            Some("method"),
        ));
    }
    Ok(method)
}

#[async_trait]
impl PaymentExecutor for TransferExecutor {
    async fn quote(&self, draft: &PaymentDraft) -> ClientResult<TransferQuote> {
        let method = chosen_method(draft)?;
        self.transfers
            .quote(QuoteRequest::new(
                method.value.clone(),
                draft.amount.to_string(),
                self.fixed_side,
                &self.recipient,
            ))
            .await
    }

    async fn execute(
        &self,
        draft: &PaymentDraft,
        quote: &TransferQuote,
        pin: &str,
    ) -> ClientResult<Receipt> {
        let method = chosen_method(draft)?;
        let execution =
            execute_quote(self.transfers.as_ref(), quote, &self.recipient, pin).await?;

        info!(
            wallet_id = %method.value,
            scope = ?self.recipient.scope(),
            transaction_id = ?execution.transaction_id,
            "payment completed"
        );
        Ok(transfer_receipt(draft, quote, &execution))
    }
}

/// Fee lines of a quote, shown before and after paying.
pub fn quote_rows(quote: &TransferQuote) -> Vec<DisplayRow> {
    vec![
        DisplayRow::new("Network fee", quote.network_fee.clone()),
        DisplayRow::new("Service fee", quote.internal_fee.clone()),
        DisplayRow::new("Total debit", quote.total_debit.clone()),
    ]
}

pub fn transfer_receipt(
    draft: &PaymentDraft,
    quote: &TransferQuote,
    execution: &TransferExecution,
) -> Receipt {
    let mut rows = vec![DisplayRow::new("Description", draft.title.clone())];
    rows.extend(draft.fields.iter().cloned());
    if let Some(method) = &draft.method {
        rows.push(DisplayRow::new("Paid from", method.name.clone()));
    }
    rows.extend(quote_rows(quote));
    if let Some(status) = &execution.status {
        rows.push(DisplayRow::new("Status", status.clone()));
    }
    if let Some(id) = &execution.transaction_id {
        rows.push(DisplayRow::new("Transaction ID", id.clone()));
    }

    Receipt {
        title: "Payment successful".to_string(),
        amount: format_amount(&draft.currency, draft.amount),
        rows,
        reference: execution
            .reference
            .clone()
            .or_else(|| execution.transaction_id.clone()),
    }
}
