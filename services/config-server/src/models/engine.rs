use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::ConfigRecord;

/// Runtime parameters of a bot's trading engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[validate(length(min = 1, max = 100))]
    pub id: String,
    pub bot_name: String,
    /// Seconds between trade cycles.
    #[validate(range(min = 1))]
    pub trade_cycle_interval: i32,
    #[validate(length(min = 1, max = 10))]
    pub emergency_stop_currency: String,
    /// Balance of `emergency_stop_currency` below which the engine halts.
    #[validate(custom = "validate_non_negative")]
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub emergency_stop_balance: Decimal,
}

impl EngineConfig {
    pub fn new(
        id: impl Into<String>,
        bot_name: impl Into<String>,
        trade_cycle_interval: i32,
        emergency_stop_currency: impl Into<String>,
        emergency_stop_balance: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            bot_name: bot_name.into(),
            trade_cycle_interval,
            emergency_stop_currency: emergency_stop_currency.into(),
            emergency_stop_balance,
        }
    }
}

impl ConfigRecord for EngineConfig {
    const KIND: &'static str = "engine config";

    fn id(&self) -> &str {
        &self.id
    }
}

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("negative_balance"));
    }
    Ok(())
}
