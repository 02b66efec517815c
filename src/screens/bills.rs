//! Bill payments: a static biller catalogue and the form that turns a
//! biller plus user input into a payment draft.
//!
//! The catalogue is compiled in; there is no biller endpoint to load it from.

use crate::screens::wizard::PaymentDraft;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillError {
    #[error("unknown biller: {0}")]
    UnknownBiller(String),

    #[error("{label} is required")]
    MissingField { field: String, label: String },

    #[error("{label} is not valid")]
    InvalidField { field: String, label: String },

    #[error("{0} is not one of the listed options")]
    UnknownOption(String),

    #[error("Enter a valid amount")]
    InvalidAmount,

    #[error("Amount must be between {min} and {max}")]
    AmountOutOfRange { min: Decimal, max: Decimal },

    #[error("bad validation pattern for {field}: {message}")]
    Pattern { field: String, message: String },
}

impl BillError {
    /// Form field the error belongs to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            BillError::MissingField { field, .. }
            | BillError::InvalidField { field, .. }
            | BillError::Pattern { field, .. } => Some(field),
            BillError::InvalidAmount | BillError::AmountOutOfRange { .. } => Some("amount"),
            BillError::UnknownBiller(_) | BillError::UnknownOption(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillCategory {
    Electricity,
    Airtime,
    Data,
    CableTv,
    Internet,
}

impl BillCategory {
    pub const ALL: [BillCategory; 5] = [
        BillCategory::Electricity,
        BillCategory::Airtime,
        BillCategory::Data,
        BillCategory::CableTv,
        BillCategory::Internet,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "electricity" => Some(Self::Electricity),
            "airtime" => Some(Self::Airtime),
            "data" => Some(Self::Data),
            "cable_tv" | "cable" => Some(Self::CableTv),
            "internet" => Some(Self::Internet),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Electricity => "Electricity",
            Self::Airtime => "Airtime",
            Self::Data => "Data Bundles",
            Self::CableTv => "Cable TV",
            Self::Internet => "Internet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Tel,
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChoice {
    pub value: &'static str,
    pub label: &'static str,
    /// Fixed price in naira for bundle-style choices.
    pub amount: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub pattern: Option<&'static str>,
    pub placeholder: Option<&'static str>,
    pub choices: Vec<FieldChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Biller {
    pub id: &'static str,
    pub name: &'static str,
    pub short_name: &'static str,
    pub category: BillCategory,
    pub fields: Vec<BillField>,
    pub min_amount: &'static str,
    pub max_amount: &'static str,
    /// Cashback the user can apply against this biller, in naira.
    pub cashback: Option<&'static str>,
}

impl Biller {
    pub fn field(&self, name: &str) -> Option<&BillField> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Select choice whose price fixes the amount, if one was picked.
    fn fixed_amount(&self, inputs: &HashMap<String, String>) -> Option<Decimal> {
        self.fields
            .iter()
            .filter(|field| field.kind == FieldKind::Select)
            .filter_map(|field| {
                let picked = inputs.get(field.name)?;
                field.choices.iter().find(|c| c.value == picked.trim())
            })
            .find_map(|choice| choice.amount.and_then(|a| Decimal::from_str(a).ok()))
    }
}

fn text(name: &'static str, label: &'static str, pattern: &'static str, hint: &'static str) -> BillField {
    BillField {
        name,
        label,
        kind: FieldKind::Text,
        pattern: Some(pattern),
        placeholder: Some(hint),
        choices: Vec::new(),
    }
}

fn phone() -> BillField {
    BillField {
        name: "phone_number",
        label: "Phone Number",
        kind: FieldKind::Tel,
        pattern: Some(r"^(\+234|0)[789][01][0-9]{8}$"),
        placeholder: Some("08012345678"),
        choices: Vec::new(),
    }
}

fn select(name: &'static str, label: &'static str, choices: Vec<FieldChoice>) -> BillField {
    BillField {
        name,
        label,
        kind: FieldKind::Select,
        pattern: None,
        placeholder: None,
        choices,
    }
}

fn choice(value: &'static str, label: &'static str, amount: Option<&'static str>) -> FieldChoice {
    FieldChoice { value, label, amount }
}

fn meter_type() -> BillField {
    select(
        "meter_type",
        "Meter Type",
        vec![
            choice("prepaid", "Prepaid", None),
            choice("postpaid", "Postpaid", None),
        ],
    )
}

fn meter_number() -> BillField {
    text("meter_number", "Meter Number", r"^[0-9]{10,13}$", "Enter 10-13 digit meter number")
}

fn smartcard() -> BillField {
    text("smartcard_number", "Smartcard Number", r"^[0-9]{10,12}$", "Enter smartcard number")
}

/// Every biller the app offers.
pub fn catalogue() -> Vec<Biller> {
    vec![
        Biller {
            id: "ekedc",
            name: "Eko Electricity (EKEDC)",
            short_name: "EKEDC",
            category: BillCategory::Electricity,
            fields: vec![meter_number(), meter_type()],
            min_amount: "500",
            max_amount: "500000",
            cashback: Some("50"),
        },
        Biller {
            id: "ikedc",
            name: "Ikeja Electric (IKEDC)",
            short_name: "IKEDC",
            category: BillCategory::Electricity,
            fields: vec![meter_number(), meter_type()],
            min_amount: "500",
            max_amount: "500000",
            cashback: Some("50"),
        },
        Biller {
            id: "mtn-airtime",
            name: "MTN Airtime",
            short_name: "MTN",
            category: BillCategory::Airtime,
            fields: vec![phone()],
            min_amount: "50",
            max_amount: "50000",
            cashback: None,
        },
        Biller {
            id: "airtel-airtime",
            name: "Airtel Airtime",
            short_name: "Airtel",
            category: BillCategory::Airtime,
            fields: vec![phone()],
            min_amount: "50",
            max_amount: "50000",
            cashback: None,
        },
        Biller {
            id: "mtn-data",
            name: "MTN Data",
            short_name: "MTN Data",
            category: BillCategory::Data,
            fields: vec![
                phone(),
                select(
                    "bundle",
                    "Data Plan",
                    vec![
                        choice("1gb-30d", "1GB - 30 days", Some("1000")),
                        choice("5gb-30d", "5GB - 30 days", Some("3500")),
                        choice("20gb-30d", "20GB - 30 days", Some("10000")),
                    ],
                ),
            ],
            min_amount: "100",
            max_amount: "100000",
            cashback: Some("25"),
        },
        Biller {
            id: "dstv",
            name: "DStv",
            short_name: "DStv",
            category: BillCategory::CableTv,
            fields: vec![
                smartcard(),
                select(
                    "package",
                    "Package",
                    vec![
                        choice("padi", "DStv Padi", Some("3950")),
                        choice("compact", "DStv Compact", Some("15700")),
                        choice("premium", "DStv Premium", Some("37000")),
                    ],
                ),
            ],
            min_amount: "1000",
            max_amount: "100000",
            cashback: Some("200"),
        },
        Biller {
            id: "gotv",
            name: "GOtv",
            short_name: "GOtv",
            category: BillCategory::CableTv,
            fields: vec![
                smartcard(),
                select(
                    "package",
                    "Package",
                    vec![
                        choice("smallie", "GOtv Smallie", Some("1575")),
                        choice("max", "GOtv Max", Some("7200")),
                    ],
                ),
            ],
            min_amount: "500",
            max_amount: "50000",
            cashback: None,
        },
        Biller {
            id: "spectranet",
            name: "Spectranet",
            short_name: "Spectranet",
            category: BillCategory::Internet,
            fields: vec![text(
                "customer_id",
                "Customer ID",
                r"^[A-Za-z0-9]{6,20}$",
                "Enter your Spectranet customer ID",
            )],
            min_amount: "1000",
            max_amount: "200000",
            cashback: None,
        },
    ]
}

pub fn find_biller(id: &str) -> Option<Biller> {
    catalogue().into_iter().find(|biller| biller.id == id)
}

/// Billers grouped by category, in category order.
pub fn by_category() -> BTreeMap<BillCategory, Vec<Biller>> {
    let mut grouped: BTreeMap<BillCategory, Vec<Biller>> = BTreeMap::new();
    for biller in catalogue() {
        grouped.entry(biller.category).or_default().push(biller);
    }
    grouped
}

/// The form for paying one biller.
#[derive(Debug, Clone)]
pub struct BillForm {
    biller: Biller,
    inputs: HashMap<String, String>,
    amount: String,
}

impl BillForm {
    pub fn new(biller_id: &str) -> Result<Self, BillError> {
        let biller =
            find_biller(biller_id).ok_or_else(|| BillError::UnknownBiller(biller_id.to_string()))?;
        Ok(Self {
            biller,
            inputs: HashMap::new(),
            amount: String::new(),
        })
    }

    pub fn biller(&self) -> &Biller {
        &self.biller
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.inputs.insert(name.to_string(), value.into());
    }

    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    /// Check one field against its rules.
    pub fn validate_field(&self, field: &BillField) -> Result<(), BillError> {
        let value = self
            .inputs
            .get(field.name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| BillError::MissingField {
                field: field.name.to_string(),
                label: field.label.to_string(),
            })?;

        if field.kind == FieldKind::Select {
            if !field.choices.iter().any(|c| c.value == value) {
                return Err(BillError::UnknownOption(value.to_string()));
            }
            return Ok(());
        }

        if let Some(pattern) = field.pattern {
            let re = Regex::new(pattern).map_err(|e| BillError::Pattern {
                field: field.name.to_string(),
                message: e.to_string(),
            })?;
            if !re.is_match(value) {
                return Err(BillError::InvalidField {
                    field: field.name.to_string(),
                    label: field.label.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Amount to pay: the picked bundle's price, else what was typed.
    pub fn amount(&self) -> Result<Decimal, BillError> {
        let amount = match self.biller.fixed_amount(&self.inputs) {
            Some(fixed) => fixed,
            None => Decimal::from_str(self.amount.trim()).map_err(|_| BillError::InvalidAmount)?,
        };

        let min = Decimal::from_str(self.biller.min_amount).map_err(|_| BillError::InvalidAmount)?;
        let max = Decimal::from_str(self.biller.max_amount).map_err(|_| BillError::InvalidAmount)?;
        if amount < min || amount > max {
            return Err(BillError::AmountOutOfRange { min, max });
        }
        Ok(amount)
    }

    pub fn validate(&self) -> Result<Decimal, BillError> {
        for field in &self.biller.fields {
            self.validate_field(field)?;
        }
        self.amount()
    }

    /// Draft for the payment wizard, with the entered fields as display rows.
    pub fn to_draft(&self) -> Result<PaymentDraft, BillError> {
        let amount = self.validate()?;

        let mut draft = PaymentDraft::new(self.biller.name, amount, "NGN").with_biller(self.biller.name);
        for field in &self.biller.fields {
            let raw = self.inputs.get(field.name).map(|v| v.trim()).unwrap_or_default();
            let shown = field
                .choices
                .iter()
                .find(|c| c.value == raw)
                .map(|c| c.label)
                .unwrap_or(raw);
            draft = draft.with_field(field.label, shown);
        }
        if let Some(cashback) = self.biller.cashback.and_then(|c| Decimal::from_str(c).ok()) {
            draft = draft.with_cashback_available(cashback);
        }

        debug!(biller = self.biller.id, %amount, "bill draft ready");
        Ok(draft)
    }
}
