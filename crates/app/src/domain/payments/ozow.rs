//! Ozow payment gateway signing.
//!
//! Payments are started by posting a signed form to Ozow; Ozow later posts a
//! signed notification back. Both signatures are a SHA-512 over the field
//! values in a fixed order followed by the merchant's private key, with the
//! whole string lowercased first.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

use crate::domain::payments::records::PaymentUuid;

/// Default Ozow hosted payment page.
pub const OZOW_POST_URL: &str = "https://pay.ozow.com";

/// Merchant settings for the Ozow gateway.
#[derive(Clone)]
pub struct OzowConfig {
    pub site_code: String,
    pub country_code: String,
    pub currency_code: String,
    pub private_key: Zeroizing<String>,
    pub is_test: bool,
    pub post_url: String,
    pub cancel_url: String,
    pub error_url: String,
    pub success_url: String,
    pub notify_url: String,
}

impl fmt::Debug for OzowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OzowConfig")
            .field("site_code", &self.site_code)
            .field("country_code", &self.country_code)
            .field("currency_code", &self.currency_code)
            .field("private_key", &"**redacted**")
            .field("is_test", &self.is_test)
            .field("post_url", &self.post_url)
            .finish_non_exhaustive()
    }
}

/// The form a customer's browser posts to Ozow to start a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OzowPaymentRequest {
    pub post_url: String,
    pub site_code: String,
    pub country_code: String,
    pub currency_code: String,
    pub amount: String,
    pub transaction_reference: String,
    pub bank_reference: String,
    pub optional1: String,
    pub cancel_url: String,
    pub error_url: String,
    pub success_url: String,
    pub notify_url: String,
    pub is_test: String,
    pub hash_check: String,
}

impl OzowPaymentRequest {
    /// Build and sign the request for `payment`.
    #[must_use]
    pub fn new(
        config: &OzowConfig,
        payment: PaymentUuid,
        amount: Decimal,
        transaction_reference: &str,
        bank_reference: &str,
    ) -> Self {
        let mut request = Self {
            post_url: config.post_url.clone(),
            site_code: config.site_code.clone(),
            country_code: config.country_code.clone(),
            currency_code: config.currency_code.clone(),
            amount: format_amount(amount),
            transaction_reference: transaction_reference.to_string(),
            bank_reference: bank_reference.to_string(),
            optional1: payment.to_string(),
            cancel_url: config.cancel_url.clone(),
            error_url: config.error_url.clone(),
            success_url: config.success_url.clone(),
            notify_url: config.notify_url.clone(),
            is_test: config.is_test.to_string(),
            hash_check: String::new(),
        };

        request.hash_check = sign(&request.signed_values(), &config.private_key);

        request
    }

    fn signed_values(&self) -> [&str; 12] {
        [
            self.site_code.as_str(),
            self.country_code.as_str(),
            self.currency_code.as_str(),
            self.amount.as_str(),
            self.transaction_reference.as_str(),
            self.bank_reference.as_str(),
            self.optional1.as_str(),
            self.cancel_url.as_str(),
            self.error_url.as_str(),
            self.success_url.as_str(),
            self.notify_url.as_str(),
            self.is_test.as_str(),
        ]
    }

    /// Form fields in the order Ozow documents them, ending with `HashCheck`.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        const NAMES: [&str; 12] = [
            "SiteCode",
            "CountryCode",
            "CurrencyCode",
            "Amount",
            "TransactionReference",
            "BankReference",
            "Optional1",
            "CancelUrl",
            "ErrorUrl",
            "SuccessUrl",
            "NotifyUrl",
            "IsTest",
        ];

        NAMES
            .into_iter()
            .zip(self.signed_values())
            .chain([("HashCheck", self.hash_check.as_str())])
            .collect()
    }
}

/// A payment status notification posted by Ozow.
///
/// Values are kept exactly as received so the signature can be recomputed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OzowNotification {
    pub site_code: String,
    pub transaction_id: String,
    pub transaction_reference: String,
    pub amount: String,
    pub status: String,
    pub optional1: Option<String>,
    pub optional2: Option<String>,
    pub optional3: Option<String>,
    pub optional4: Option<String>,
    pub optional5: Option<String>,
    pub currency_code: String,
    pub is_test: String,
    pub status_message: Option<String>,
    pub hash: String,
}

impl OzowNotification {
    /// Signature Ozow should have sent for this notification.
    #[must_use]
    pub fn expected_hash(&self, private_key: &str) -> String {
        sign(
            &[
                self.site_code.as_str(),
                self.transaction_id.as_str(),
                self.transaction_reference.as_str(),
                self.amount.as_str(),
                self.status.as_str(),
                self.optional1.as_deref().unwrap_or_default(),
                self.optional2.as_deref().unwrap_or_default(),
                self.optional3.as_deref().unwrap_or_default(),
                self.optional4.as_deref().unwrap_or_default(),
                self.optional5.as_deref().unwrap_or_default(),
                self.currency_code.as_str(),
                self.is_test.as_str(),
                self.status_message.as_deref().unwrap_or_default(),
            ],
            private_key,
        )
    }

    /// Whether the received hash matches, ignoring hex case.
    #[must_use]
    pub fn verify(&self, private_key: &str) -> bool {
        let expected = self.expected_hash(private_key);
        let received = self.hash.to_ascii_lowercase();

        constant_time_eq(expected.as_bytes(), received.as_bytes())
    }
}

/// Two-decimal amount as Ozow expects it, e.g. `199.00`.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn sign(values: &[&str], private_key: &str) -> String {
    let mut input = Zeroizing::new(values.concat());

    input.push_str(private_key);

    let lowered = Zeroizing::new(input.to_lowercase());

    hex::encode(Sha512::digest(lowered.as_bytes()))
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }

    left.iter()
        .zip(right)
        .fold(0_u8, |acc, (l, r)| acc | (l ^ r))
        == 0
}
