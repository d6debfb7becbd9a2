//! Config CRUD handlers, shared by the bot and engine config routes.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::{
    auth::AuthContext,
    error::{ApiError, StoreError},
    models::{ConfigRecord, Envelope},
    observability::{metrics, Logger},
    AppState, StoreFor,
};

/// GET /api/config/{type} - List all records in insertion order
pub async fn list_configs<R: ConfigRecord>(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<R>>>, ApiError>
where
    AppState: StoreFor<R>,
{
    let records = StoreFor::<R>::store(state.as_ref()).get_all().await?;
    state.metrics.increment(metrics::CONFIG_LIST, 1).await;

    Ok(Json(Envelope::new(records)))
}

/// GET /api/config/{type}/{id} - Get one record
pub async fn get_config<R: ConfigRecord>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<R>>, ApiError>
where
    AppState: StoreFor<R>,
{
    let record = StoreFor::<R>::store(state.as_ref()).get_by_id(&id).await?;
    state.metrics.increment(metrics::CONFIG_GET, 1).await;

    Ok(Json(Envelope::new(record)))
}

/// POST /api/config/{type} - Create a record with a caller-supplied id
pub async fn create_config<R: ConfigRecord>(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    body: Result<Json<R>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<R>>), ApiError>
where
    AppState: StoreFor<R>,
{
    let Json(record) = body.map_err(bad_body)?;

    let created = match StoreFor::<R>::store(state.as_ref()).create(record).await {
        Ok(created) => created,
        Err(e) => return Err(rejected(&state, e).await),
    };

    state.metrics.increment(metrics::CONFIG_CREATED, 1).await;
    Logger::config_event(R::KIND, created.id(), "created", &auth.username);

    Ok((StatusCode::CREATED, Json(Envelope::new(created))))
}

/// PUT /api/config/{type}/{id} - Replace a record
pub async fn update_config<R: ConfigRecord>(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    body: Result<Json<R>, JsonRejection>,
) -> Result<Json<Envelope<R>>, ApiError>
where
    AppState: StoreFor<R>,
{
    let Json(record) = body.map_err(bad_body)?;

    if record.id() != id {
        state.metrics.increment(metrics::CONFIG_REJECTED, 1).await;
        return Err(ApiError::Validation(format!(
            "{} id '{}' does not match path id '{}'",
            R::KIND,
            record.id(),
            id
        )));
    }

    let updated = match StoreFor::<R>::store(state.as_ref()).update(record).await {
        Ok(updated) => updated,
        Err(e) => return Err(rejected(&state, e).await),
    };

    state.metrics.increment(metrics::CONFIG_UPDATED, 1).await;
    Logger::config_event(R::KIND, &id, "updated", &auth.username);

    Ok(Json(Envelope::new(updated)))
}

/// DELETE /api/config/{type}/{id} - Remove a record
pub async fn delete_config<R: ConfigRecord>(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    AppState: StoreFor<R>,
{
    if let Err(e) = StoreFor::<R>::store(state.as_ref()).delete(&id).await {
        return Err(rejected(&state, e).await);
    }

    state.metrics.increment(metrics::CONFIG_DELETED, 1).await;
    Logger::config_event(R::KIND, &id, "deleted", &auth.username);

    Ok(StatusCode::NO_CONTENT)
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(rejection.body_text())
}

async fn rejected(state: &AppState, e: StoreError) -> ApiError {
    if !matches!(e, StoreError::Internal(_)) {
        state.metrics.increment(metrics::CONFIG_REJECTED, 1).await;
    }
    e.into()
}
