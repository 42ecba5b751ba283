//! Payment gateway adapter
//!
//! Translates a [`CreatePayment`] into a provider charge request and the
//! provider's answer back into a [`PaymentResponse`]. Providers form a closed
//! set: add a variant to [`PaymentGateway`] to support another one.

pub mod midtrans;

pub use midtrans::{MidtransClient, MidtransConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Payment gateway rejected the charge: {0}")]
    Gateway(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment channel chosen by the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    Gopay,
    Mandiri,
    Bca,
    Bri,
    Bni,
    Permata,
}

impl Bank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bank::Gopay => "gopay",
            Bank::Mandiri => "mandiri",
            Bank::Bca => "bca",
            Bank::Bri => "bri",
            Bank::Bni => "bni",
            Bank::Permata => "permata",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub order_id: Uuid,
    pub amount: i64,
    pub bank: Bank,
}

impl CreatePayment {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(PaymentError::Validation("amount must be positive".to_string()));
        }
        Ok(())
    }
}

/// Provider independent view of a created charge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub transaction_id: String,
    pub order_id: String,
    pub payment_vendor: String,
    pub transaction_time: String,
    pub status: String,
    pub payment_type: String,
    /// VA number, bill code or redirect URL, depending on the channel
    pub payment_action: String,
}

/// Configured payment provider
#[derive(Debug, Clone)]
pub enum PaymentGateway {
    Midtrans(MidtransClient),
}

impl PaymentGateway {
    pub async fn pay(&self, payment: &CreatePayment) -> Result<PaymentResponse> {
        payment.validate()?;

        match self {
            PaymentGateway::Midtrans(client) => client.charge(payment).await,
        }
    }

    pub fn vendor(&self) -> &'static str {
        match self {
            PaymentGateway::Midtrans(_) => midtrans::VENDOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_from_json() {
        let payment: CreatePayment = serde_json::from_str(
            r#"{"orderId":"7f2c1a8e-1b7a-4a53-9d6e-0a4a4b0c9f11","amount":15000,"bank":"bca"}"#,
        )
        .unwrap();
        assert_eq!(payment.bank, Bank::Bca);
        assert_eq!(payment.bank.as_str(), "bca");

        let unknown = serde_json::from_str::<CreatePayment>(
            r#"{"orderId":"7f2c1a8e-1b7a-4a53-9d6e-0a4a4b0c9f11","amount":15000,"bank":"ovo"}"#,
        );
        assert!(unknown.is_err());
    }

    #[tokio::test]
    async fn test_pay_rejects_non_positive_amount() {
        let gateway = PaymentGateway::Midtrans(MidtransClient::new(MidtransConfig::default()));
        let payment = CreatePayment {
            order_id: Uuid::new_v4(),
            amount: 0,
            bank: Bank::Bni,
        };

        assert!(matches!(
            gateway.pay(&payment).await,
            Err(PaymentError::Validation(_))
        ));
        assert_eq!(gateway.vendor(), "midtrans");
    }
}
