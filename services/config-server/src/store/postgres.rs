use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::time::Duration;

use super::{conflict, not_found, validate_record, ConfigStore};
use crate::error::StoreError;
use crate::models::{bigdecimal_from_decimal, decimal_from_bigdecimal, BotConfig, EngineConfig};

/// PostgreSQL-backed store. Every operation is a single statement, so per-id
/// mutations are atomic without explicit transactions.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Open a pool and apply the embedded migrations.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgStore, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(PgStore { pool })
}

#[derive(Debug, FromRow)]
struct BotConfigRow {
    id: String,
    name: String,
    status: String,
    base_url: String,
    username: String,
    password: String,
}

impl From<BotConfigRow> for BotConfig {
    fn from(row: BotConfigRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            status: row.status,
            base_url: row.base_url,
            username: row.username,
            password: row.password,
        }
    }
}

/// Engine row (uses BigDecimal for SQLx compatibility)
#[derive(Debug, FromRow)]
struct EngineConfigRow {
    id: String,
    bot_name: String,
    trade_cycle_interval: i32,
    emergency_stop_currency: String,
    emergency_stop_balance: BigDecimal,
}

impl TryFrom<EngineConfigRow> for EngineConfig {
    type Error = StoreError;

    fn try_from(row: EngineConfigRow) -> Result<Self, Self::Error> {
        let balance = decimal_from_bigdecimal(&row.emergency_stop_balance).ok_or_else(|| {
            StoreError::Internal(format!(
                "engine config '{}' has an out of range balance",
                row.id
            ))
        })?;

        Ok(Self {
            id: row.id,
            bot_name: row.bot_name,
            trade_cycle_interval: row.trade_cycle_interval,
            emergency_stop_currency: row.emergency_stop_currency,
            emergency_stop_balance: balance,
        })
    }
}

const BOT_COLUMNS: &str = "id, name, status, base_url, username, password";
const ENGINE_COLUMNS: &str =
    "id, bot_name, trade_cycle_interval, emergency_stop_currency, emergency_stop_balance";

#[async_trait]
impl ConfigStore<BotConfig> for PgStore {
    async fn get_all(&self) -> Result<Vec<BotConfig>, StoreError> {
        let rows = sqlx::query_as::<_, BotConfigRow>(&format!(
            "SELECT {} FROM bot_configs ORDER BY seq",
            BOT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BotConfig::from).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<BotConfig, StoreError> {
        let row = sqlx::query_as::<_, BotConfigRow>(&format!(
            "SELECT {} FROM bot_configs WHERE id = $1",
            BOT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BotConfig::from)
            .ok_or_else(|| not_found::<BotConfig>(id))
    }

    async fn create(&self, record: BotConfig) -> Result<BotConfig, StoreError> {
        validate_record(&record)?;

        let row = sqlx::query_as::<_, BotConfigRow>(&format!(
            r#"
            INSERT INTO bot_configs (id, name, status, base_url, username, password)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            RETURNING {}
            "#,
            BOT_COLUMNS
        ))
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.status)
        .bind(&record.base_url)
        .bind(&record.username)
        .bind(&record.password)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BotConfig::from)
            .ok_or_else(|| conflict::<BotConfig>(&record.id))
    }

    async fn update(&self, record: BotConfig) -> Result<BotConfig, StoreError> {
        validate_record(&record)?;

        let row = sqlx::query_as::<_, BotConfigRow>(&format!(
            r#"
            UPDATE bot_configs
            SET name = $2, status = $3, base_url = $4, username = $5, password = $6
            WHERE id = $1
            RETURNING {}
            "#,
            BOT_COLUMNS
        ))
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.status)
        .bind(&record.base_url)
        .bind(&record.username)
        .bind(&record.password)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BotConfig::from)
            .ok_or_else(|| not_found::<BotConfig>(&record.id))
    }

    async fn delete(&self, id: &str) -> Result<BotConfig, StoreError> {
        let row = sqlx::query_as::<_, BotConfigRow>(&format!(
            "DELETE FROM bot_configs WHERE id = $1 RETURNING {}",
            BOT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BotConfig::from)
            .ok_or_else(|| not_found::<BotConfig>(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore<EngineConfig> for PgStore {
    async fn get_all(&self) -> Result<Vec<EngineConfig>, StoreError> {
        let rows = sqlx::query_as::<_, EngineConfigRow>(&format!(
            "SELECT {} FROM engine_configs ORDER BY seq",
            ENGINE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EngineConfig::try_from).collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<EngineConfig, StoreError> {
        let row = sqlx::query_as::<_, EngineConfigRow>(&format!(
            "SELECT {} FROM engine_configs WHERE id = $1",
            ENGINE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => EngineConfig::try_from(row),
            None => Err(not_found::<EngineConfig>(id)),
        }
    }

    async fn create(&self, record: EngineConfig) -> Result<EngineConfig, StoreError> {
        validate_record(&record)?;

        let row = sqlx::query_as::<_, EngineConfigRow>(&format!(
            r#"
            INSERT INTO engine_configs (
                id, bot_name, trade_cycle_interval, emergency_stop_currency, emergency_stop_balance
            ) VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            RETURNING {}
            "#,
            ENGINE_COLUMNS
        ))
        .bind(&record.id)
        .bind(&record.bot_name)
        .bind(record.trade_cycle_interval)
        .bind(&record.emergency_stop_currency)
        .bind(bigdecimal_from_decimal(record.emergency_stop_balance))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => EngineConfig::try_from(row),
            None => Err(conflict::<EngineConfig>(&record.id)),
        }
    }

    async fn update(&self, record: EngineConfig) -> Result<EngineConfig, StoreError> {
        validate_record(&record)?;

        let row = sqlx::query_as::<_, EngineConfigRow>(&format!(
            r#"
            UPDATE engine_configs
            SET bot_name = $2, trade_cycle_interval = $3,
                emergency_stop_currency = $4, emergency_stop_balance = $5
            WHERE id = $1
            RETURNING {}
            "#,
            ENGINE_COLUMNS
        ))
        .bind(&record.id)
        .bind(&record.bot_name)
        .bind(record.trade_cycle_interval)
        .bind(&record.emergency_stop_currency)
        .bind(bigdecimal_from_decimal(record.emergency_stop_balance))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => EngineConfig::try_from(row),
            None => Err(not_found::<EngineConfig>(&record.id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<EngineConfig, StoreError> {
        let row = sqlx::query_as::<_, EngineConfigRow>(&format!(
            "DELETE FROM engine_configs WHERE id = $1 RETURNING {}",
            ENGINE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => EngineConfig::try_from(row),
            None => Err(not_found::<EngineConfig>(id)),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
