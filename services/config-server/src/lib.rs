pub mod auth;
pub mod error;
pub mod health;
pub mod models;
pub mod handlers {
    pub mod configs;
    pub mod login;
}
pub mod middleware;
pub mod observability;
pub mod settings;
pub mod store;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use rand::RngCore;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use models::*;
pub use observability::{Logger, MetricsCollector};
pub use settings::Settings;

use auth::{Accounts, JwtService, TokenVerifier};
use middleware::RateLimiter;
use store::{seed::Seed, ConfigStore, MemoryStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub bots: Arc<dyn ConfigStore<BotConfig>>,
    pub engines: Arc<dyn ConfigStore<EngineConfig>>,
    pub accounts: Arc<Accounts>,
    pub jwt: Arc<JwtService>,
    pub metrics: MetricsCollector,
    pub login_limiter: RateLimiter,
}

/// Picks the store backing a record type, so one set of handlers serves both
/// config collections.
pub trait StoreFor<R: ConfigRecord> {
    fn store(&self) -> &Arc<dyn ConfigStore<R>>;
}

impl StoreFor<BotConfig> for AppState {
    fn store(&self) -> &Arc<dyn ConfigStore<BotConfig>> {
        &self.bots
    }
}

impl StoreFor<EngineConfig> for AppState {
    fn store(&self) -> &Arc<dyn ConfigStore<EngineConfig>> {
        &self.engines
    }
}

impl AppState {
    pub fn new(
        bots: Arc<dyn ConfigStore<BotConfig>>,
        engines: Arc<dyn ConfigStore<EngineConfig>>,
        accounts: Accounts,
        jwt: JwtService,
    ) -> Self {
        Self {
            bots,
            engines,
            accounts: Arc::new(accounts),
            jwt: Arc::new(jwt),
            metrics: MetricsCollector::new(),
            login_limiter: RateLimiter::default(),
        }
    }

    pub fn with_login_limiter(mut self, limiter: RateLimiter) -> Self {
        self.login_limiter = limiter;
        self
    }

    /// Build state from settings: choose the store backend, apply the seed
    /// file, and set up accounts and the token signer.
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let bots: Arc<dyn ConfigStore<BotConfig>>;
        let engines: Arc<dyn ConfigStore<EngineConfig>>;
        match &settings.storage.database_url {
            Some(url) => {
                info!("Connecting to database...");
                let pg = store::connect(url, settings.storage.max_connections).await?;
                info!("✓ Database connected, migrations applied");
                bots = Arc::new(pg.clone());
                engines = Arc::new(pg);
            }
            None => {
                info!("No database configured, using in-memory config store");
                bots = Arc::new(MemoryStore::<BotConfig>::new());
                engines = Arc::new(MemoryStore::<EngineConfig>::new());
            }
        }

        if let Some(path) = &settings.storage.seed_file {
            let report = Seed::from_file(path)?.apply(bots.as_ref(), engines.as_ref()).await?;
            info!(
                path = %path.display(),
                bots = report.bots_created,
                engines = report.engines_created,
                "✓ Seed file loaded"
            );
        }

        let accounts = build_accounts(settings)?;

        let secret = match &settings.auth.jwt_secret {
            Some(secret) => secret.clone().into_bytes(),
            None => {
                warn!("auth.jwt_secret not set; generated a random secret, tokens will not survive a restart");
                random_hex(32).into_bytes()
            }
        };
        let jwt = JwtService::new(&secret, settings.auth.issuer.clone(), settings.auth.token_ttl_secs);

        Ok(Self::new(bots, engines, accounts, jwt)
            .with_login_limiter(RateLimiter::new(60, settings.auth.login_attempts_per_minute)))
    }
}

fn build_accounts(settings: &Settings) -> anyhow::Result<Accounts> {
    let mut accounts = Accounts::new();
    for user in &settings.auth.users {
        accounts.insert_hash(user.username.clone(), user.password_hash.clone())?;
    }

    if accounts.is_empty() {
        let password = match &settings.auth.bootstrap_password {
            Some(password) => password.clone(),
            None => {
                let generated = random_hex(16);
                warn!(
                    username = "admin",
                    password = %generated,
                    "No login accounts configured; generated a bootstrap password"
                );
                generated
            }
        };
        accounts.insert_hash("admin", auth::hash_password(&password)?)?;
    }

    info!(accounts = accounts.len(), "Login accounts loaded");
    Ok(accounts)
}

fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Routes for one config collection, with and without the trailing slash.
fn config_routes<R: ConfigRecord>(base: &str) -> Router<Arc<AppState>>
where
    AppState: StoreFor<R>,
{
    use handlers::configs::{create_config, delete_config, get_config, list_configs, update_config};

    Router::new()
        .route(base, get(list_configs::<R>).post(create_config::<R>))
        .route(&format!("{}/", base), get(list_configs::<R>).post(create_config::<R>))
        .route(
            &format!("{}/{{id}}", base),
            get(get_config::<R>)
                .put(update_config::<R>)
                .delete(delete_config::<R>),
        )
}

/// Build the API router
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let verifier: Arc<dyn TokenVerifier> = state.jwt.clone();

    // Config and detail routes (require a bearer token). route_layer keeps
    // unknown paths answering 404 instead of 401.
    let protected_routes = Router::new()
        .merge(config_routes::<BotConfig>("/api/config/bots"))
        .merge(config_routes::<EngineConfig>("/api/config/engines"))
        .route("/api/health", get(health::health_detail))
        .route_layer(axum::middleware::from_fn_with_state(
            verifier,
            middleware::auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/api/auth/login", post(handlers::login::login))
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
