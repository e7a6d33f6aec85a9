use crate::config::StripeConfig;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use stripe::{
    Client, CreatePaymentIntent, Currency, PaymentIntent, PaymentIntentId, UpdatePaymentIntent,
};
use utoipa::ToSchema;

/// 调用支付网关的超时上限，避免长尾请求占住 worker。
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

/// Payment methods offered at checkout. `card` charges in USD, the two
/// Chinese wallet methods charge in CNY.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Alipay,
    WechatPay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Alipay => "alipay",
            PaymentMethod::WechatPay => "wechat_pay",
        }
    }

    pub fn currency(&self) -> Currency {
        match self {
            PaymentMethod::Card => Currency::USD,
            _ => Currency::CNY,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the payment intent id from a client secret of the form
/// `pi_xxx_secret_yyy`. Anything that does not look like an intent
/// reference is rejected before we ever talk to the provider.
pub fn intent_id_from_client_secret(client_secret: &str) -> AppResult<PaymentIntentId> {
    let intent_part = client_secret
        .split("_secret_")
        .next()
        .unwrap_or_default();
    if !intent_part.starts_with("pi_") {
        return Err(AppError::InvalidPaymentReference(format!(
            "client secret does not carry an intent id: {client_secret:.16}"
        )));
    }
    intent_part.parse::<PaymentIntentId>().map_err(|e| {
        AppError::InvalidPaymentReference(format!("unparseable intent id {intent_part}: {e}"))
    })
}

#[derive(Clone)]
pub struct StripeService {
    client: Client,
}

impl StripeService {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(config.secret_key),
        }
    }

    async fn with_timeout<F, T>(fut: F) -> AppResult<T>
    where
        F: std::future::Future<Output = Result<T, stripe::StripeError>>,
    {
        match tokio::time::timeout(PROVIDER_TIMEOUT, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(AppError::StripeError(e)),
            Err(_) => Err(AppError::PaymentError(
                "payment provider call timed out".to_string(),
            )),
        }
    }

    pub async fn create_payment_intent(
        &self,
        amount: i64,
        method: PaymentMethod,
        metadata: HashMap<String, String>,
        description: Option<&str>,
    ) -> AppResult<PaymentIntent> {
        let mut params = CreatePaymentIntent::new(amount, method.currency());
        params.payment_method_types = Some(vec![method.as_str().to_string()]);
        params.metadata = Some(metadata);
        params.description = description;

        Self::with_timeout(PaymentIntent::create(&self.client, params)).await
    }

    /// Re-point an existing intent at a new amount/currency/method, so a
    /// buyer who switches payment method before paying keeps one intent.
    pub async fn update_payment_intent(
        &self,
        intent_id: &PaymentIntentId,
        amount: i64,
        method: PaymentMethod,
        metadata: HashMap<String, String>,
    ) -> AppResult<PaymentIntent> {
        let mut params = UpdatePaymentIntent::new();
        params.amount = Some(amount);
        params.currency = Some(method.currency());
        params.payment_method_types = Some(vec![method.as_str().to_string()]);
        params.metadata = Some(metadata);

        Self::with_timeout(PaymentIntent::update(&self.client, intent_id, params)).await
    }

    pub async fn retrieve_payment_intent(
        &self,
        intent_id: &PaymentIntentId,
    ) -> AppResult<PaymentIntent> {
        Self::with_timeout(PaymentIntent::retrieve(&self.client, intent_id, &[])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_id_from_client_secret() {
        let id = intent_id_from_client_secret("pi_3ABC123_secret_xyz").unwrap();
        assert_eq!(id.as_str(), "pi_3ABC123");
    }

    #[test]
    fn test_client_secret_without_intent_prefix() {
        assert!(intent_id_from_client_secret("seti_123_secret_xyz").is_err());
        assert!(intent_id_from_client_secret("").is_err());
        assert!(intent_id_from_client_secret("_secret_only").is_err());
    }

    #[test]
    fn test_payment_method_currency() {
        assert_eq!(PaymentMethod::Card.currency(), Currency::USD);
        assert_eq!(PaymentMethod::Alipay.currency(), Currency::CNY);
        assert_eq!(PaymentMethod::WechatPay.currency(), Currency::CNY);
    }
}
