use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// Wire helpers
// ---------------------------------------------------------------------------

/// Backend responses come either wrapped in `{ data: ... }` or bare.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Number(number) => number.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

// ---------------------------------------------------------------------------
// Wallets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyKind {
    Fiat,
    Crypto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    #[serde(default, alias = "currencyId", deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<CurrencyKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    #[serde(alias = "id", deserialize_with = "string_or_number")]
    pub wallet_id: String,
    pub currency: Currency,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub balance: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub network: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    pub currency_id: String,
    pub network: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub amount: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivityData {
    #[serde(default)]
    pub items: Vec<ActivityItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: ActivityData,
}

impl ActivityResponse {
    /// Shape substituted for any activity failure.
    pub fn empty_failure() -> Self {
        Self {
            success: false,
            data: ActivityData::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, alias = "phone")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub has_pin: Option<bool>,
}

impl UserProfile {
    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }

    /// Name shown in the header: full name, else the email, else "Thunder user".
    pub fn display_name(&self) -> String {
        self.full_name()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| "Thunder user".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    #[serde(default)]
    pub success: bool,
    pub data: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinRequest {
    pub pin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResetPinRequest {
    pub code: String,
}

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransferScope {
    Internal,
    External,
    Convert,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FixedSide {
    #[default]
    Source,
    Destination,
}

/// Who receives the funds of a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// Another Thunder user, addressed by email.
    Email(String),
    /// An on-chain address outside Thunder.
    Address { address: String, network: String },
    /// The user's own wallet in another currency.
    Conversion { to_currency_id: String },
}

impl Recipient {
    pub fn scope(&self) -> TransferScope {
        match self {
            Recipient::Email(_) => TransferScope::Internal,
            Recipient::Address { .. } => TransferScope::External,
            Recipient::Conversion { .. } => TransferScope::Convert,
        }
    }

    /// Value sent as `recipientIdentifier` when executing.
    pub fn identifier(&self) -> &str {
        match self {
            Recipient::Email(email) => email,
            Recipient::Address { address, .. } => address,
            Recipient::Conversion { to_currency_id } => to_currency_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub scope: TransferScope,
    pub wallet_id: String,
    pub amount: String,
    pub fixed_side: FixedSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_currency_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_address: Option<String>,
}

impl QuoteRequest {
    pub fn new(
        wallet_id: impl Into<String>,
        amount: impl Into<String>,
        fixed_side: FixedSide,
        recipient: &Recipient,
    ) -> Self {
        let mut request = Self {
            scope: recipient.scope(),
            wallet_id: wallet_id.into(),
            amount: amount.into(),
            fixed_side,
            network: None,
            to_currency_id: None,
            recipient_email: None,
            recipient_address: None,
        };
        match recipient {
            Recipient::Email(email) => request.recipient_email = Some(email.clone()),
            Recipient::Address { address, network } => {
                request.recipient_address = Some(address.clone());
                request.network = Some(network.clone());
            }
            Recipient::Conversion { to_currency_id } => {
                request.to_currency_id = Some(to_currency_id.clone())
            }
        }
        request
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferQuote {
    #[serde(deserialize_with = "string_or_number")]
    pub quote_id: String,
    #[serde(default)]
    pub quote_reference: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub rate: String,
    pub expires_at: String,
    #[serde(deserialize_with = "string_or_number")]
    pub source_debit_amount: String,
    #[serde(deserialize_with = "string_or_number")]
    pub network_fee: String,
    #[serde(deserialize_with = "string_or_number")]
    pub internal_fee: String,
    #[serde(deserialize_with = "string_or_number")]
    pub total_debit: String,
}

impl TransferQuote {
    /// Reference used to execute this quote; falls back to the quote id.
    pub fn reference(&self) -> &str {
        self.quote_reference.as_deref().unwrap_or(&self.quote_id)
    }

    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.expires_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Seconds left before expiry, for display only; expiry itself is the
    /// backend's to enforce.
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at_utc()
            .map(|expires| (expires - now).num_seconds().max(0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteTransferRequest {
    pub quote_reference: String,
    pub recipient_identifier: String,
    pub pin: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferExecution {
    #[serde(default, alias = "id", deserialize_with = "opt_string_or_number")]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Confirmation returned by the PIN endpoints; kept as received.
pub type Acknowledgement = JsonValue;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wallet_accepts_numeric_ids_and_balances() {
        let wallet: Wallet = serde_json::from_value(json!({
            "walletId": 1,
            "currency": { "code": "BTC" },
            "balance": 0.5
        }))
        .unwrap();
        assert_eq!(wallet.wallet_id, "1");
        assert_eq!(wallet.balance.as_deref(), Some("0.5"));
        assert_eq!(wallet.currency.kind, None);
    }

    #[test]
    fn wallet_list_accepts_both_shapes() {
        let wrapped: Envelope<Vec<Wallet>> = serde_json::from_value(json!({
            "data": [{ "id": "w-1", "currency": { "code": "NGN", "type": "fiat" } }]
        }))
        .unwrap();
        let bare: Envelope<Vec<Wallet>> = serde_json::from_value(json!([
            { "walletId": "w-1", "currency": { "code": "NGN", "type": "fiat" } }
        ]))
        .unwrap();

        let wrapped = wrapped.into_inner();
        assert_eq!(wrapped, bare.into_inner());
        assert_eq!(wrapped[0].currency.kind, Some(CurrencyKind::Fiat));
    }

    #[test]
    fn activity_defaults_to_empty_items() {
        let response: ActivityResponse =
            serde_json::from_value(json!({ "success": true, "data": {} })).unwrap();
        assert!(response.success);
        assert!(response.data.items.is_empty());

        let failure = serde_json::to_value(ActivityResponse::empty_failure()).unwrap();
        assert_eq!(failure, json!({ "success": false, "data": { "items": [] } }));
    }

    #[test]
    fn quote_request_serializes_only_relevant_recipient_fields() {
        let request = QuoteRequest::new(
            "w-9",
            "25.00",
            FixedSide::Source,
            &Recipient::Address {
                address: "0xabc".to_string(),
                network: "ethereum".to_string(),
            },
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "scope": "external",
                "walletId": "w-9",
                "amount": "25.00",
                "fixedSide": "source",
                "network": "ethereum",
                "recipientAddress": "0xabc"
            })
        );
    }

    #[test]
    fn quote_reference_falls_back_to_id() {
        let quote: TransferQuote = serde_json::from_value(json!({
            "quoteId": 42,
            "rate": "1",
            "expiresAt": "2026-10-19T12:00:00Z",
            "sourceDebitAmount": "10",
            "networkFee": "0",
            "internalFee": "0.1",
            "totalDebit": "10.1"
        }))
        .unwrap();
        assert_eq!(quote.reference(), "42");

        let now = DateTime::parse_from_rfc3339("2026-10-19T11:59:30Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(quote.seconds_remaining(now), Some(30));
        let later = now + chrono::Duration::minutes(5);
        assert_eq!(quote.seconds_remaining(later), Some(0));
    }

    #[test]
    fn profile_names() {
        let profile: UserProfile = serde_json::from_value(json!({
            "email": "ada@thunder.app",
            "firstName": "Ada",
            "lastName": " "
        }))
        .unwrap();
        assert_eq!(profile.full_name().as_deref(), Some("Ada"));

        let anonymous: UserProfile = serde_json::from_value(json!({})).unwrap();
        assert_eq!(anonymous.display_name(), "Thunder user");
    }
}
