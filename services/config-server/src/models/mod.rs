use bigdecimal::BigDecimal;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

mod bot;
mod engine;

pub use bot::BotConfig;
pub use engine::EngineConfig;

/// A configuration record kept in a [`crate::store::ConfigStore`].
///
/// Records are plain values: the store hands out clones and replaces whole
/// records on update, so nothing outside the store aliases its state.
pub trait ConfigRecord:
    Clone + PartialEq + Send + Sync + Serialize + DeserializeOwned + Validate + 'static
{
    /// Human readable kind used in error messages and logs.
    const KIND: &'static str;

    fn id(&self) -> &str;
}

/// Success envelope: every response body carries its payload under `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Failure envelope, same top-level shape as [`Envelope`] with `data: null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub data: Option<()>,
    pub error: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
}

// Helper conversions between BigDecimal and Decimal
pub fn decimal_from_bigdecimal(bd: &BigDecimal) -> Option<Decimal> {
    bd.to_string().parse().ok()
}

pub fn bigdecimal_from_decimal(d: Decimal) -> BigDecimal {
    d.to_string().parse().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_envelope_wraps_under_data() {
        let json = serde_json::to_value(Envelope::new(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [1, 2] }));
    }

    #[test]
    fn test_error_body_has_null_data() {
        let body = ErrorBody {
            data: None,
            error: "not found".to_string(),
        };
        let json = serde_json::to_value(body).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["error"], "not found");
    }

    #[test]
    fn test_decimal_bigdecimal_conversion() {
        let d = Decimal::from_str("0.50").unwrap();
        let bd = bigdecimal_from_decimal(d);
        assert_eq!(decimal_from_bigdecimal(&bd), Some(d));
    }
}
