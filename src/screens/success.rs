//! Receipt shown once a payment has gone through.

use crate::screens::DisplayRow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub title: String,
    pub amount: String,
    pub rows: Vec<DisplayRow>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessEvent {
    AddToBeneficiary(Receipt),
    Continue,
}

#[derive(Debug, Clone)]
pub struct PaymentSuccessScreen {
    receipt: Receipt,
}

impl PaymentSuccessScreen {
    pub fn new(receipt: Receipt) -> Self {
        Self { receipt }
    }

    pub fn receipt(&self) -> &Receipt {
        &self.receipt
    }

    pub fn add_to_beneficiary(&self) -> SuccessEvent {
        SuccessEvent::AddToBeneficiary(self.receipt.clone())
    }

    pub fn proceed(&self) -> SuccessEvent {
        SuccessEvent::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_carry_receipt() {
        let receipt = Receipt {
            title: "Payment successful".to_string(),
            amount: "₦5000.00".to_string(),
            rows: vec![DisplayRow::new("Token", "1234-5678-9012")],
            reference: Some("REF-1".to_string()),
        };
        let screen = PaymentSuccessScreen::new(receipt.clone());

        assert_eq!(screen.add_to_beneficiary(), SuccessEvent::AddToBeneficiary(receipt));
        assert_eq!(screen.proceed(), SuccessEvent::Continue);
        assert_eq!(screen.receipt().rows.len(), 1);
    }
}
