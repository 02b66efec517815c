//! Payment summary shown before the PIN step.

use crate::screens::{format_amount, DisplayRow};
use rust_decimal::Decimal;

/// Everything the confirmation step displays, built by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationPayload {
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub biller: Option<String>,
    /// Biller-specific lines such as meter number or customer name.
    pub fields: Vec<DisplayRow>,
    pub cashback_available: Option<Decimal>,
    /// Quoted fees and total debit, in the paying wallet's currency.
    pub charges: Vec<DisplayRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationEvent {
    Pay,
}

#[derive(Debug, Clone)]
pub struct ConfirmationScreen {
    payload: ConfirmationPayload,
    use_cashback: bool,
}

impl ConfirmationScreen {
    pub fn new(payload: ConfirmationPayload) -> Self {
        Self {
            payload,
            use_cashback: false,
        }
    }

    pub fn with_cashback(mut self, use_cashback: bool) -> Self {
        self.use_cashback = use_cashback;
        self
    }

    pub fn payload(&self) -> &ConfirmationPayload {
        &self.payload
    }

    pub fn use_cashback(&self) -> bool {
        self.use_cashback
    }

    pub fn toggle_cashback(&mut self) -> bool {
        self.use_cashback = !self.use_cashback;
        self.use_cashback
    }

    /// Cashback shown as deducted; never more than the amount. Display only.
    pub fn cashback_applied(&self) -> Decimal {
        if !self.use_cashback {
            return Decimal::ZERO;
        }
        self.payload
            .cashback_available
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO)
            .min(self.payload.amount)
    }

    pub fn total(&self) -> Decimal {
        self.payload.amount - self.cashback_applied()
    }

    pub fn rows(&self) -> Vec<DisplayRow> {
        let currency = &self.payload.currency;
        let mut rows = Vec::with_capacity(self.payload.fields.len() + self.payload.charges.len() + 4);

        if let Some(biller) = &self.payload.biller {
            rows.push(DisplayRow::new("Biller", biller.clone()));
        }
        rows.extend(self.payload.fields.iter().cloned());
        rows.push(DisplayRow::new(
            "Amount",
            format_amount(currency, self.payload.amount),
        ));
        rows.push(DisplayRow::new(
            "Payment method",
            self.payload.payment_method.clone(),
        ));
        rows.extend(self.payload.charges.iter().cloned());

        let cashback = self.cashback_applied();
        if self.use_cashback && cashback > Decimal::ZERO {
            rows.push(DisplayRow::new(
                "Cashback",
                format!("-{}", format_amount(currency, cashback)),
            ));
        }
        rows.push(DisplayRow::new("Total", format_amount(currency, self.total())));
        rows
    }

    /// The cashback toggle is not part of what gets paid.
    pub fn pay(&self) -> ConfirmationEvent {
        ConfirmationEvent::Pay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payload() -> ConfirmationPayload {
        ConfirmationPayload {
            amount: Decimal::from_str("5000").unwrap(),
            currency: "NGN".to_string(),
            payment_method: "Naira wallet".to_string(),
            biller: Some("Ikeja Electric Prepaid".to_string()),
            fields: vec![
                DisplayRow::new("Meter number", "45012345678"),
                DisplayRow::new("Customer name", "Ada Obi"),
            ],
            cashback_available: Some(Decimal::from_str("250").unwrap()),
            charges: Vec::new(),
        }
    }

    fn value<'a>(rows: &'a [DisplayRow], label: &str) -> Option<&'a str> {
        rows.iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }

    #[test]
    fn rows_without_cashback() {
        let screen = ConfirmationScreen::new(payload());
        let rows = screen.rows();

        assert_eq!(rows[0], DisplayRow::new("Biller", "Ikeja Electric Prepaid"));
        assert_eq!(value(&rows, "Meter number"), Some("45012345678"));
        assert_eq!(value(&rows, "Amount"), Some("₦5000.00"));
        assert_eq!(value(&rows, "Cashback"), None);
        assert_eq!(value(&rows, "Total"), Some("₦5000.00"));
    }

    #[test]
    fn cashback_toggle_only_changes_display() {
        let mut screen = ConfirmationScreen::new(payload());
        assert!(screen.toggle_cashback());

        let rows = screen.rows();
        assert_eq!(value(&rows, "Cashback"), Some("-₦250.00"));
        assert_eq!(value(&rows, "Total"), Some("₦4750.00"));
        assert_eq!(screen.payload().amount, Decimal::from_str("5000").unwrap());
        assert_eq!(screen.pay(), ConfirmationEvent::Pay);

        assert!(!screen.toggle_cashback());
        assert_eq!(value(&screen.rows(), "Total"), Some("₦5000.00"));
    }

    #[test]
    fn quoted_charges_follow_payment_method() {
        let mut data = payload();
        data.charges = vec![
            DisplayRow::new("Service fee", "50"),
            DisplayRow::new("Total debit", "5050"),
        ];
        let rows = ConfirmationScreen::new(data).rows();

        let method = rows.iter().position(|row| row.label == "Payment method").unwrap();
        assert_eq!(rows[method + 1], DisplayRow::new("Service fee", "50"));
        assert_eq!(rows[method + 2], DisplayRow::new("Total debit", "5050"));
        assert_eq!(rows.last(), Some(&DisplayRow::new("Total", "₦5000.00")));
    }

    #[test]
    fn cashback_never_exceeds_amount() {
        let mut data = payload();
        data.amount = Decimal::from_str("100").unwrap();
        let screen = ConfirmationScreen::new(data).with_cashback(true);
        assert_eq!(screen.cashback_applied(), Decimal::from_str("100").unwrap());
        assert_eq!(screen.total(), Decimal::ZERO);
    }
}
