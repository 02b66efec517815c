//! The payment wizard: method → confirm → PIN → success.
//!
//! The wizard owns one [`PaymentDraft`]; each step reads and writes its
//! slice of it, so going back never loses what was already chosen. Only
//! wallets in the draft's currency can pay, and the payment is quoted on the
//! confirmation step so the fees are seen before the PIN is asked for.

use crate::api::types::TransferQuote;
use crate::api::WalletService;
use crate::screens::confirmation::{ConfirmationPayload, ConfirmationScreen};
use crate::screens::executor::{quote_rows, PaymentExecutor};
use crate::screens::payment_method::{PaymentMethodSelector, PaymentOption};
use crate::screens::pin::{PinEntry, PinOutcome};
use crate::screens::scope::ScreenScope;
use crate::screens::success::{PaymentSuccessScreen, Receipt};
use crate::screens::DisplayRow;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    SelectMethod,
    Confirm,
    EnterPin,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("action not allowed at step {actual:?}, expected {expected:?}")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },

    #[error("unknown payment method: {0}")]
    UnknownMethod(String),

    #[error("{method} cannot pay an amount in {currency}")]
    CurrencyMismatch { method: String, currency: String },

    #[error("the payment has not been quoted yet")]
    NotQuoted,
}

/// What is being paid, accumulated across the steps.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub title: String,
    pub amount: Decimal,
    pub currency: String,
    pub biller: Option<String>,
    pub fields: Vec<DisplayRow>,
    pub cashback_available: Option<Decimal>,
    pub method: Option<PaymentOption>,
    pub use_cashback: bool,
}

impl PaymentDraft {
    pub fn new(title: impl Into<String>, amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            amount,
            currency: currency.into(),
            biller: None,
            fields: Vec::new(),
            cashback_available: None,
            method: None,
            use_cashback: false,
        }
    }

    pub fn with_biller(mut self, biller: impl Into<String>) -> Self {
        self.biller = Some(biller.into());
        self
    }

    pub fn with_field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(DisplayRow::new(label, value));
        self
    }

    pub fn with_cashback_available(mut self, cashback: Decimal) -> Self {
        self.cashback_available = Some(cashback);
        self
    }

    /// Payload for the confirmation step; needs a chosen method.
    pub fn confirmation_payload(&self) -> Option<ConfirmationPayload> {
        let method = self.method.as_ref()?;
        Some(ConfirmationPayload {
            amount: self.amount,
            currency: self.currency.clone(),
            payment_method: method.name.clone(),
            biller: self.biller.clone(),
            fields: self.fields.clone(),
            cashback_available: self.cashback_available,
            charges: Vec::new(),
        })
    }
}

pub struct PaymentWizard {
    step: WizardStep,
    draft: PaymentDraft,
    selector: PaymentMethodSelector,
    pin: PinEntry,
    quote: Option<TransferQuote>,
    quote_error: Option<String>,
    receipt: Option<Receipt>,
    executor: Arc<dyn PaymentExecutor>,
}

impl PaymentWizard {
    pub fn new(draft: PaymentDraft, executor: Arc<dyn PaymentExecutor>) -> Self {
        Self {
            step: WizardStep::SelectMethod,
            draft,
            selector: PaymentMethodSelector::new(),
            pin: PinEntry::new(),
            quote: None,
            quote_error: None,
            receipt: None,
            executor,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &PaymentDraft {
        &self.draft
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step != expected {
            return Err(WizardError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    // -- method selection ---------------------------------------------------

    pub async fn load_methods(&mut self, wallets: &dyn WalletService, scope: &ScreenScope) {
        self.selector.load(wallets, scope).await;
    }

    pub fn selector(&self) -> &PaymentMethodSelector {
        &self.selector
    }

    /// Options that can pay the draft: wallets in its currency.
    pub fn methods(&self) -> Vec<&PaymentOption> {
        self.selector
            .options()
            .iter()
            .filter(|option| option.pays_in(&self.draft.currency))
            .collect()
    }

    pub fn select_method(&mut self, id: &str) -> Result<(), WizardError> {
        self.expect_step(WizardStep::SelectMethod)?;
        let option = self
            .selector
            .select(id)
            .ok_or_else(|| WizardError::UnknownMethod(id.to_string()))?;
        if !option.pays_in(&self.draft.currency) {
            warn!(wallet_id = %option.id, currency = %self.draft.currency, "wallet currency does not match payment");
            return Err(WizardError::CurrencyMismatch {
                method: option.name,
                currency: self.draft.currency.clone(),
            });
        }
        info!(wallet_id = %option.id, method = %option.name, "payment method selected");
        self.draft.method = Some(option);
        self.quote = None;
        self.quote_error = None;
        self.step = WizardStep::Confirm;
        Ok(())
    }

    // -- confirmation -------------------------------------------------------

    /// Price the payment from the chosen wallet. A failure stays on the
    /// confirmation step with the message in [`quote_error`](Self::quote_error).
    pub async fn load_quote(&mut self, scope: &ScreenScope) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Confirm)?;
        self.quote_error = None;
        match scope.run(self.executor.quote(&self.draft)).await {
            None => {}
            Some(Ok(quote)) => {
                info!(reference = %quote.reference(), total_debit = %quote.total_debit, "payment quoted");
                self.quote = Some(quote);
            }
            Some(Err(e)) => {
                warn!(error = %e, "failed to quote payment");
                self.quote = None;
                self.quote_error = Some(e.user_message());
            }
        }
        Ok(())
    }

    pub fn quote(&self) -> Option<&TransferQuote> {
        self.quote.as_ref()
    }

    pub fn quote_error(&self) -> Option<&str> {
        self.quote_error.as_deref()
    }

    pub fn confirmation(&self) -> Option<ConfirmationScreen> {
        if self.step != WizardStep::Confirm {
            return None;
        }
        let mut payload = self.draft.confirmation_payload()?;
        if let Some(quote) = &self.quote {
            payload.charges = quote_rows(quote);
        }
        Some(ConfirmationScreen::new(payload).with_cashback(self.draft.use_cashback))
    }

    pub fn toggle_cashback(&mut self) -> Result<bool, WizardError> {
        self.expect_step(WizardStep::Confirm)?;
        self.draft.use_cashback = !self.draft.use_cashback;
        Ok(self.draft.use_cashback)
    }

    pub fn pay(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Confirm)?;
        if self.quote.is_none() {
            return Err(WizardError::NotQuoted);
        }
        self.pin.clear();
        self.pin.set_error(None);
        self.step = WizardStep::EnterPin;
        Ok(())
    }

    // -- PIN ----------------------------------------------------------------

    pub fn pin(&self) -> &PinEntry {
        &self.pin
    }

    /// Feed one PIN slot; a completed PIN is submitted right away.
    pub async fn pin_input(
        &mut self,
        index: usize,
        value: &str,
        scope: &ScreenScope,
    ) -> Result<PinOutcome, WizardError> {
        self.expect_step(WizardStep::EnterPin)?;
        let outcome = self.pin.input(index, value);
        if outcome != PinOutcome::Ignored && !value.is_empty() {
            self.pin.set_error(None);
        }
        if let PinOutcome::Complete(pin) = &outcome {
            self.submit_pin(pin, scope).await;
        }
        Ok(outcome)
    }

    pub fn pin_backspace(&mut self, index: usize) -> Result<PinOutcome, WizardError> {
        self.expect_step(WizardStep::EnterPin)?;
        Ok(self.pin.backspace(index))
    }

    async fn submit_pin(&mut self, pin: &str, scope: &ScreenScope) {
        let Some(quote) = self.quote.clone() else {
            self.pin.clear();
            self.pin.set_error(Some(WizardError::NotQuoted.to_string()));
            return;
        };
        self.pin.set_loading(true);
        let result = scope
            .run(self.executor.execute(&self.draft, &quote, pin))
            .await;
        self.pin.set_loading(false);

        match result {
            None => {}
            Some(Ok(receipt)) => {
                info!(reference = ?receipt.reference, "payment wizard finished");
                self.receipt = Some(receipt);
                self.step = WizardStep::Success;
            }
            Some(Err(e)) => {
                warn!(error = %e, "payment rejected");
                self.pin.clear();
                self.pin.set_error(Some(e.user_message()));
            }
        }
    }

    // -- success ------------------------------------------------------------

    pub fn success(&self) -> Option<PaymentSuccessScreen> {
        self.receipt.clone().map(PaymentSuccessScreen::new)
    }

    // -- navigation ---------------------------------------------------------

    /// Step back, keeping the draft. Returns false when there is nowhere to
    /// go: before the first step, or after the payment went through.
    pub fn back(&mut self) -> bool {
        let previous = match self.step {
            WizardStep::SelectMethod | WizardStep::Success => return false,
            WizardStep::Confirm => {
                self.quote = None;
                self.quote_error = None;
                WizardStep::SelectMethod
            }
            WizardStep::EnterPin => {
                if self.pin.is_loading() {
                    return false;
                }
                self.pin.clear();
                self.pin.set_error(None);
                WizardStep::Confirm
            }
        };
        self.step = previous;
        true
    }
}
