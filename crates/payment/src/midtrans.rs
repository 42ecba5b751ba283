//! Midtrans Core API charge adapter

use std::fmt;

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Bank, CreatePayment, PaymentError, PaymentResponse, Result};

pub const VENDOR: &str = "midtrans";

const SANDBOX_URL: &str = "https://api.sandbox.midtrans.com";
const PRODUCTION_URL: &str = "https://api.midtrans.com";

/// Minutes before an unpaid gopay charge expires
const GOPAY_EXPIRY_MINUTES: u32 = 15;

#[derive(Debug, Clone, Default)]
pub struct MidtransConfig {
    pub server_key: String,
    pub is_production: bool,
    pub gopay_callback_url: Option<String>,
}

/// Charge client for one Midtrans merchant account
#[derive(Clone)]
pub struct MidtransClient {
    http: reqwest::Client,
    server_key: String,
    base_url: String,
    gopay_callback_url: Option<String>,
}

impl fmt::Debug for MidtransClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MidtransClient")
            .field("base_url", &self.base_url)
            .field("gopay_callback_url", &self.gopay_callback_url)
            .finish_non_exhaustive()
    }
}

impl MidtransClient {
    pub fn new(config: MidtransConfig) -> Self {
        let base_url = if config.is_production {
            PRODUCTION_URL
        } else {
            SANDBOX_URL
        };

        Self {
            http: reqwest::Client::new(),
            server_key: config.server_key,
            base_url: base_url.to_string(),
            gopay_callback_url: config.gopay_callback_url,
        }
    }

    /// Point the client at another API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn charge(&self, payment: &CreatePayment) -> Result<PaymentResponse> {
        let request = charge_request(
            payment,
            self.gopay_callback_url.as_deref(),
            &random_bill_key(),
        );

        let response: ChargeResponse = self
            .http
            .post(format!("{}/v2/charge", self.base_url))
            .basic_auth(&self.server_key, Some(""))
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        let formatted = format_response(response).inspect_err(|e| {
            warn!(order_id = %payment.order_id, error = %e, "midtrans charge failed");
        })?;
        info!(
            order_id = %payment.order_id,
            transaction_id = %formatted.transaction_id,
            "midtrans charge created"
        );

        Ok(formatted)
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct ChargeRequest {
    payment_type: &'static str,
    transaction_details: TransactionDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    gopay: Option<GopayDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_expiry: Option<CustomExpiry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    echannel: Option<EChannelDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bank_transfer: Option<BankTransferDetails>,
}

#[derive(Debug, Serialize, PartialEq)]
struct TransactionDetails {
    order_id: String,
    gross_amount: i64,
}

#[derive(Debug, Serialize, PartialEq)]
struct GopayDetails {
    enable_callback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
struct CustomExpiry {
    expiry_duration: u32,
    unit: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
struct EChannelDetails {
    bill_info1: &'static str,
    bill_info2: &'static str,
    bill_key: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct BankTransferDetails {
    bank: &'static str,
}

pub(crate) fn charge_request(
    payment: &CreatePayment,
    callback_url: Option<&str>,
    bill_key: &str,
) -> ChargeRequest {
    let mut request = ChargeRequest {
        payment_type: "",
        transaction_details: TransactionDetails {
            order_id: payment.order_id.to_string(),
            gross_amount: payment.amount,
        },
        gopay: None,
        custom_expiry: None,
        echannel: None,
        bank_transfer: None,
    };

    match payment.bank {
        Bank::Gopay => {
            request.payment_type = "gopay";
            request.gopay = Some(GopayDetails {
                enable_callback: callback_url.is_some(),
                callback_url: callback_url.map(str::to_string),
            });
            request.custom_expiry = Some(CustomExpiry {
                expiry_duration: GOPAY_EXPIRY_MINUTES,
                unit: "minute",
            });
        }
        Bank::Mandiri => {
            request.payment_type = "echannel";
            request.echannel = Some(EChannelDetails {
                bill_info1: "payment with mandiri",
                bill_info2: "mandiri midtrans",
                bill_key: bill_key.to_string(),
            });
        }
        Bank::Bca | Bank::Bri | Bank::Bni | Bank::Permata => {
            request.payment_type = "bank_transfer";
            request.bank_transfer = Some(BankTransferDetails {
                bank: payment.bank.as_str(),
            });
        }
    }

    request
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ChargeResponse {
    status_code: String,
    status_message: String,
    transaction_id: String,
    order_id: String,
    transaction_time: String,
    transaction_status: String,
    payment_type: String,
    va_numbers: Vec<VaNumber>,
    permata_va_number: String,
    biller_code: String,
    bill_key: String,
    actions: Vec<Action>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VaNumber {
    bank: String,
    va_number: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Action {
    url: String,
}

pub(crate) fn format_response(response: ChargeResponse) -> Result<PaymentResponse> {
    if response.status_code != "201" {
        return Err(PaymentError::Gateway(response.status_message));
    }

    let mut result = PaymentResponse {
        transaction_id: response.transaction_id,
        order_id: response.order_id,
        payment_vendor: VENDOR.to_string(),
        transaction_time: response.transaction_time,
        status: response.transaction_status,
        ..PaymentResponse::default()
    };

    match response.payment_type.as_str() {
        "bank_transfer" => {
            result.payment_type = response.payment_type.clone();
            if let Some(va) = response.va_numbers.into_iter().next() {
                result.payment_type = va.bank;
                result.payment_action = va.va_number;
            } else if !response.permata_va_number.is_empty() {
                result.payment_type = Bank::Permata.as_str().to_string();
                result.payment_action = response.permata_va_number;
            }
        }
        "echannel" => {
            result.payment_type = Bank::Mandiri.as_str().to_string();
            result.payment_action = format!("{}{}", response.biller_code, response.bill_key);
        }
        "gopay" | "shopeepay" => {
            // The second action carries the deeplink redirect
            let action = response.actions.into_iter().nth(1).ok_or_else(|| {
                PaymentError::Gateway("charge response has no deeplink action".to_string())
            })?;
            result.payment_type = Bank::Gopay.as_str().to_string();
            result.payment_action = action.url;
        }
        other => {
            result.payment_type = other.to_string();
        }
    }

    Ok(result)
}

/// Random ten digit mandiri bill key
fn random_bill_key() -> String {
    format!("{:010}", OsRng.next_u64() % 10_000_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use uuid::Uuid;

    fn payment(bank: Bank) -> CreatePayment {
        CreatePayment {
            order_id: Uuid::parse_str("7f2c1a8e-1b7a-4a53-9d6e-0a4a4b0c9f11").unwrap(),
            amount: 25_000,
            bank,
        }
    }

    fn response(value: serde_json::Value) -> ChargeResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_gopay_request() {
        let request = charge_request(&payment(Bank::Gopay), Some("https://shop.example/cb"), "1");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "payment_type": "gopay",
                "transaction_details": {
                    "order_id": "7f2c1a8e-1b7a-4a53-9d6e-0a4a4b0c9f11",
                    "gross_amount": 25000
                },
                "gopay": {
                    "enable_callback": true,
                    "callback_url": "https://shop.example/cb"
                },
                "custom_expiry": { "expiry_duration": 15, "unit": "minute" }
            })
        );
    }

    #[test]
    fn test_mandiri_request_uses_bill_key() {
        let request = charge_request(&payment(Bank::Mandiri), None, "0123456789");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["payment_type"], "echannel");
        assert_eq!(value["echannel"]["bill_key"], "0123456789");
        assert_eq!(value["echannel"]["bill_info1"], "payment with mandiri");
        assert!(value.get("bank_transfer").is_none());
    }

    #[test]
    fn test_bank_transfer_request() {
        for bank in [Bank::Bca, Bank::Bri, Bank::Bni, Bank::Permata] {
            let value = serde_json::to_value(charge_request(&payment(bank), None, "1")).unwrap();
            assert_eq!(value["payment_type"], "bank_transfer");
            assert_eq!(value["bank_transfer"]["bank"], bank.as_str());
        }
    }

    #[test]
    fn test_random_bill_key_is_ten_digits() {
        let key = random_bill_key();
        assert_eq!(key.len(), 10);
        assert!(key.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_non_201_is_gateway_error() {
        let result = format_response(response(json!({
            "status_code": "406",
            "status_message": "The request could not be completed due to a conflict"
        })));

        match result {
            Err(PaymentError::Gateway(message)) => {
                assert_eq!(message, "The request could not be completed due to a conflict")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_va_response() {
        let result = format_response(response(json!({
            "status_code": "201",
            "transaction_id": "tx-1",
            "order_id": "order-1",
            "transaction_time": "2024-01-01 10:00:00",
            "transaction_status": "pending",
            "payment_type": "bank_transfer",
            "va_numbers": [{ "bank": "bca", "va_number": "12345678901" }]
        })))
        .unwrap();

        assert_eq!(result.payment_vendor, "midtrans");
        assert_eq!(result.payment_type, "bca");
        assert_eq!(result.payment_action, "12345678901");
        assert_eq!(result.status, "pending");
    }

    #[test]
    fn test_permata_response() {
        let result = format_response(response(json!({
            "status_code": "201",
            "payment_type": "bank_transfer",
            "permata_va_number": "8562000000"
        })))
        .unwrap();

        assert_eq!(result.payment_type, "permata");
        assert_eq!(result.payment_action, "8562000000");
    }

    #[test]
    fn test_echannel_response() {
        let result = format_response(response(json!({
            "status_code": "201",
            "payment_type": "echannel",
            "biller_code": "70012",
            "bill_key": "0123456789"
        })))
        .unwrap();

        assert_eq!(result.payment_type, "mandiri");
        assert_eq!(result.payment_action, "700120123456789");
    }

    #[test]
    fn test_gopay_response_uses_deeplink() {
        let result = format_response(response(json!({
            "status_code": "201",
            "payment_type": "gopay",
            "actions": [
                { "name": "generate-qr-code", "url": "https://qr" },
                { "name": "deeplink-redirect", "url": "gojek://pay" }
            ]
        })))
        .unwrap();

        assert_eq!(result.payment_type, "gopay");
        assert_eq!(result.payment_action, "gojek://pay");

        let missing = format_response(response(json!({
            "status_code": "201",
            "payment_type": "gopay",
            "actions": [{ "name": "generate-qr-code", "url": "https://qr" }]
        })));
        assert!(matches!(missing, Err(PaymentError::Gateway(_))));
    }

    #[tokio::test]
    async fn test_charge_round_trip_against_mock_server() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v2/charge")
                    .header_exists("authorization")
                    .json_body_partial(r#"{"payment_type":"bank_transfer","bank_transfer":{"bank":"bni"}}"#);
                then.status(200).json_body(json!({
                    "status_code": "201",
                    "transaction_id": "tx-9",
                    "order_id": "7f2c1a8e-1b7a-4a53-9d6e-0a4a4b0c9f11",
                    "transaction_status": "pending",
                    "payment_type": "bank_transfer",
                    "va_numbers": [{ "bank": "bni", "va_number": "9880000001" }]
                }));
            })
            .await;

        let client = MidtransClient::new(MidtransConfig {
            server_key: "SB-Mid-server-test".to_string(),
            ..MidtransConfig::default()
        })
        .with_base_url(server.base_url());

        let result = client.charge(&payment(Bank::Bni)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.transaction_id, "tx-9");
        assert_eq!(result.payment_type, "bni");
        assert_eq!(result.payment_action, "9880000001");
    }
}
