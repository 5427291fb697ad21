use crate::utils::error::AppError;
use serde::{Deserialize, Serialize};
use std::env;
use uuid::Uuid;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";
const MAX_ATTEMPTS: u32 = 3;

lazy_static::lazy_static! {
    static ref HTTP_CLIENT: reqwest::Client = reqwest::Client::new();
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateIntentRequest {
    pub salary: Option<f64>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreateIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// Major-unit amount to integer minor units (cents), by multiplication and
/// truncation. Anything below one cent is a client error.
pub fn to_minor_units(amount: f64) -> Result<i64, AppError> {
    if !amount.is_finite() || amount < 0.01 {
        return Err(AppError::InvalidRequest(
            "salary must be at least 0.01".to_string(),
        ));
    }
    Ok((amount * 100.0).trunc() as i64)
}

fn is_retryable(status: reqwest::StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

/// Creates a payment intent at the gateway and returns its client secret.
/// Intent creation is not naturally idempotent, so one Idempotency-Key covers
/// all attempts: a retry after a network failure can never create a second
/// intent. Client errors from the gateway are not retried.
pub async fn create_payment_intent(
    request: &CreateIntentRequest,
) -> Result<CreateIntentResponse, AppError> {
    let salary = request
        .salary
        .ok_or_else(|| AppError::InvalidRequest("salary is required".to_string()))?;
    let amount = to_minor_units(salary)?;

    let secret_key = env::var("STRIPE_SECRET_KEY")
        .map_err(|_| AppError::Gateway("STRIPE_SECRET_KEY not configured".to_string()))?;
    let currency = env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "usd".to_string());

    let idempotency_key = Uuid::new_v4().to_string();
    let amount_str = amount.to_string();

    let mut last_error = String::new();
    for attempt in 1..=MAX_ATTEMPTS {
        if attempt > 1 {
            tokio::time::sleep(std::time::Duration::from_millis(300 * attempt as u64)).await;
        }

        let response = HTTP_CLIENT
            .post(format!("{}/payment_intents", STRIPE_API_BASE))
            .basic_auth(&secret_key, None::<&str>)
            .header("Idempotency-Key", &idempotency_key)
            .form(&[
                ("amount", amount_str.as_str()),
                ("currency", currency.as_str()),
                ("payment_method_types[]", "card"),
            ])
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    let body: serde_json::Value = resp.json().await.map_err(|e| {
                        AppError::Gateway(format!("invalid gateway response: {}", e))
                    })?;
                    let client_secret = body["client_secret"]
                        .as_str()
                        .map(String::from)
                        .ok_or_else(|| {
                            AppError::Gateway(format!(
                                "gateway response missing client_secret: {}",
                                body
                            ))
                        })?;
                    return Ok(CreateIntentResponse { client_secret });
                }

                let body = resp.text().await.unwrap_or_default();
                if !is_retryable(status) {
                    return Err(AppError::Gateway(format!(
                        "payment intent rejected ({}): {}",
                        status, body
                    )));
                }
                last_error = format!("{}: {}", status, body);
                log::warn!(
                    "⚠️  Payment intent attempt {}/{} failed: {}",
                    attempt,
                    MAX_ATTEMPTS,
                    last_error
                );
            }
            Err(e) => {
                last_error = e.to_string();
                log::warn!(
                    "⚠️  Payment intent attempt {}/{} failed: {}",
                    attempt,
                    MAX_ATTEMPTS,
                    last_error
                );
            }
        }
    }

    Err(AppError::Gateway(format!(
        "payment intent creation failed after {} attempts: {}",
        MAX_ATTEMPTS, last_error
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_major_units_to_cents_by_truncation() {
        assert_eq!(to_minor_units(523.99).unwrap(), 52399);
        assert_eq!(to_minor_units(100.0).unwrap(), 10000);
        assert_eq!(to_minor_units(0.01).unwrap(), 1);
    }

    #[test]
    fn rejects_amounts_below_one_cent() {
        assert!(to_minor_units(0.0).is_err());
        assert!(to_minor_units(0.001).is_err());
        assert!(to_minor_units(-5.0).is_err());
        assert!(to_minor_units(f64::NAN).is_err());
        assert!(to_minor_units(f64::INFINITY).is_err());
    }

    #[test]
    fn missing_salary_is_a_client_error() {
        let request = CreateIntentRequest { salary: None };
        let err = futures::executor::block_on(create_payment_intent(&request)).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_retryable(reqwest::StatusCode::BAD_REQUEST));
        assert!(!is_retryable(reqwest::StatusCode::UNAUTHORIZED));
    }
}
