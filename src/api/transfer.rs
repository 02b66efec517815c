use crate::api::types::{
    Envelope, ExecuteTransferRequest, QuoteRequest, TransferExecution, TransferQuote,
};
use crate::api::{ThunderClient, TransferService};
use crate::error::ClientResult;
use async_trait::async_trait;
use tracing::info;

#[async_trait]
impl TransferService for ThunderClient {
    async fn quote(&self, request: QuoteRequest) -> ClientResult<TransferQuote> {
        let quote = self
            .http()
            .post::<Envelope<TransferQuote>, _>("/transfers/quote", &request)
            .await?
            .into_inner();
        info!(
            quote_id = %quote.quote_id,
            scope = ?request.scope,
            total_debit = %quote.total_debit,
            expires_at = %quote.expires_at,
            "transfer quote received"
        );
        Ok(quote)
    }

    async fn execute(&self, request: ExecuteTransferRequest) -> ClientResult<TransferExecution> {
        let execution = self
            .http()
            .post::<Envelope<TransferExecution>, _>("/transfers/execute", &request)
            .await?
            .into_inner();
        info!(
            quote_reference = %request.quote_reference,
            transaction_id = ?execution.transaction_id,
            status = ?execution.status,
            "transfer executed"
        );
        Ok(execution)
    }
}
