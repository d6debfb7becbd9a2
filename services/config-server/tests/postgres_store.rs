//! PgStore against a live database. Skipped unless DATABASE_URL is set.

use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;

use config_server::{
    error::StoreError,
    store::{connect, ConfigStore, PgStore},
    BotConfig, EngineConfig,
};

async fn store() -> Option<PgStore> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping postgres store test");
        return None;
    };
    Some(connect(&url, 2).await.unwrap())
}

/// Ids unique per run so repeated runs against one database don't collide.
fn run_prefix(name: &str) -> String {
    format!("{}-{}", name, Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

fn bot(id: &str, name: &str) -> BotConfig {
    BotConfig::new(id, name, "Running", "https://hostname.one/api", "admin", "password")
}

#[tokio::test]
async fn test_bot_crud_against_postgres() {
    let Some(pg) = store().await else { return };
    let bots: &dyn ConfigStore<BotConfig> = &pg;
    let prefix = run_prefix("pg-bot");
    let first = format!("{}-b", prefix);
    let second = format!("{}-a", prefix);

    bots.ping().await.unwrap();

    let created = bots.create(bot(&first, "First")).await.unwrap();
    assert_eq!(created, bot(&first, "First"));
    bots.create(bot(&second, "Second")).await.unwrap();

    // insertion order, not id order
    let ours: Vec<String> = bots
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .filter(|b| b.id.starts_with(&prefix))
        .map(|b| b.id)
        .collect();
    assert_eq!(ours, vec![first.clone(), second.clone()]);

    let dup = bots.create(bot(&first, "Impostor")).await;
    assert!(matches!(dup, Err(StoreError::Conflict { .. })));
    assert_eq!(bots.get_by_id(&first).await.unwrap().name, "First");

    let mut replacement = bot(&first, "Renamed");
    replacement.password = "rotated".to_string();
    assert_eq!(bots.update(replacement.clone()).await.unwrap(), replacement);
    assert_eq!(bots.get_by_id(&first).await.unwrap(), replacement);

    assert_eq!(bots.delete(&first).await.unwrap(), replacement);
    assert!(matches!(bots.get_by_id(&first).await, Err(StoreError::NotFound { .. })));
    assert!(matches!(bots.delete(&first).await, Err(StoreError::NotFound { .. })));
    assert!(matches!(
        bots.update(bot(&first, "Ghost")).await,
        Err(StoreError::NotFound { .. })
    ));

    bots.delete(&second).await.unwrap();
}

#[tokio::test]
async fn test_engine_crud_against_postgres() {
    let Some(pg) = store().await else { return };
    let engines: &dyn ConfigStore<EngineConfig> = &pg;
    let id = run_prefix("pg-engine");
    let balance = Decimal::from_str("12345.678901").unwrap();
    let engine = EngineConfig::new(id.clone(), "Bot", 30, "BTC", balance);

    assert_eq!(engines.create(engine.clone()).await.unwrap(), engine);
    assert_eq!(engines.get_by_id(&id).await.unwrap().emergency_stop_balance, balance);

    let dup = engines.create(engine.clone()).await;
    assert!(matches!(dup, Err(StoreError::Conflict { .. })));

    let invalid = EngineConfig::new(id.clone(), "Bot", 0, "BTC", balance);
    assert!(matches!(engines.update(invalid).await, Err(StoreError::Validation { .. })));

    let replacement = EngineConfig::new(id.clone(), "Other", 5, "EUR", Decimal::ZERO);
    assert_eq!(engines.update(replacement.clone()).await.unwrap(), replacement);

    assert_eq!(engines.delete(&id).await.unwrap(), replacement);
    assert!(matches!(engines.get_by_id(&id).await, Err(StoreError::NotFound { .. })));
}
