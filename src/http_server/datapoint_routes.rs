//! Datapoint HTTP Routes
//!
//! Handlers for the datapoint resource. Each one runs the same steps in
//! order: authorize, validate input, resolve the target record (id routes
//! only), call the repository, transform, respond. Any failure returns a
//! `DatapointError`, which renders itself as the HTTP error response.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use tracing::info;

use super::auth::authorize;
use crate::auth::{JwtManager, Role};
use crate::datapoint::validation::{parse_id, validate_body, validate_query};
use crate::datapoint::{
    Datapoint, DatapointError, DatapointRepository, DatapointResult, DatapointView, Location,
};

// ==================
// Shared State
// ==================

/// State shared across datapoint handlers
pub struct DatapointState {
    pub repository: DatapointRepository,
    pub jwt: JwtManager,
}

impl DatapointState {
    pub fn new(repository: DatapointRepository, jwt: JwtManager) -> Self {
        Self { repository, jwt }
    }
}

// ==================
// Datapoint Routes
// ==================

/// Create datapoint routes, mounted at `/datapoint`
pub fn datapoint_routes(state: Arc<DatapointState>) -> Router {
    let collection = get(list_handler).post(create_handler);

    Router::new()
        .route("/datapoint", collection.clone())
        .route("/datapoint/", collection)
        .route(
            "/datapoint/{datapoint_id}",
            get(get_handler)
                .put(replace_handler)
                .patch(update_handler)
                .delete(remove_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

/// Resolve `:datapointId` to its record.
///
/// A malformed id is a validation error; a well-formed id with no record
/// is `NotFound`.
pub fn load(state: &DatapointState, raw_id: &str) -> DatapointResult<Datapoint> {
    let id = parse_id(raw_id)?;
    state.repository.find(&id)
}

/// Unwrap a JSON body, turning extractor rejections into validation errors.
///
/// A request without a JSON content type carries no fields and reads as `{}`.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> DatapointResult<Value> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Object(Map::new())),
        Err(rejection) => Err(DatapointError::invalid(
            "body",
            Location::Body,
            rejection.body_text(),
        )),
    }
}

// ==================
// Collection Handlers
// ==================

async fn list_handler(
    State(state): State<Arc<DatapointState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> DatapointResult<Json<Vec<DatapointView>>> {
    authorize(&headers, &state.jwt, Role::Admin)?;
    let query = validate_query(&params)?;

    let datapoints = state.repository.list(&query)?;
    Ok(Json(datapoints.iter().map(Datapoint::transform).collect()))
}

async fn create_handler(
    State(state): State<Arc<DatapointState>>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> DatapointResult<(StatusCode, Json<DatapointView>)> {
    let caller = authorize(&headers, &state.jwt, Role::Admin)?;
    let fields = validate_body(&json_body(body)?)?;

    let datapoint = state.repository.create(&fields)?;
    info!(id = %datapoint.id, caller = %caller.id, "datapoint created");
    Ok((StatusCode::CREATED, Json(datapoint.transform())))
}

// ==================
// Item Handlers
// ==================

async fn get_handler(
    State(state): State<Arc<DatapointState>>,
    headers: HeaderMap,
    Path(datapoint_id): Path<String>,
) -> DatapointResult<Json<DatapointView>> {
    authorize(&headers, &state.jwt, Role::User)?;
    let datapoint = load(&state, &datapoint_id)?;

    Ok(Json(datapoint.transform()))
}

async fn replace_handler(
    State(state): State<Arc<DatapointState>>,
    headers: HeaderMap,
    Path(datapoint_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> DatapointResult<Json<DatapointView>> {
    authorize(&headers, &state.jwt, Role::User)?;
    let id = parse_id(&datapoint_id)?;
    let fields = validate_body(&json_body(body)?)?;
    let existing = state.repository.find(&id)?;

    let replaced = state.repository.replace(&existing, &fields)?;
    Ok(Json(replaced.transform()))
}

async fn update_handler(
    State(state): State<Arc<DatapointState>>,
    headers: HeaderMap,
    Path(datapoint_id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> DatapointResult<Json<DatapointView>> {
    authorize(&headers, &state.jwt, Role::User)?;
    let id = parse_id(&datapoint_id)?;
    let fields = validate_body(&json_body(body)?)?;
    let existing = state.repository.find(&id)?;

    let updated = state.repository.update(existing, &fields)?;
    Ok(Json(updated.transform()))
}

async fn remove_handler(
    State(state): State<Arc<DatapointState>>,
    headers: HeaderMap,
    Path(datapoint_id): Path<String>,
) -> DatapointResult<StatusCode> {
    let caller = authorize(&headers, &state.jwt, Role::User)?;
    let datapoint = load(&state, &datapoint_id)?;

    state.repository.remove(&datapoint)?;
    info!(id = %datapoint.id, caller = %caller.id, "datapoint removed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use crate::datapoint::{DatapointFields, DatapointId};
    use crate::store::MemoryStore;

    fn state() -> DatapointState {
        DatapointState::new(
            DatapointRepository::new(Arc::new(MemoryStore::new())),
            JwtManager::new(JwtConfig::default()),
        )
    }

    #[test]
    fn test_load_existing() {
        let state = state();
        let created = state.repository.create(&DatapointFields::default()).unwrap();
        assert_eq!(load(&state, &created.id.to_string()).unwrap(), created);
    }

    #[test]
    fn test_load_unknown_is_not_found() {
        let state = state();
        let err = load(&state, &DatapointId::generate().to_string()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_load_malformed_is_validation_error() {
        let state = state();
        let err = load(&state, "12345").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_json_body_passes_value_through() {
        let value = json_body(Ok(Json(serde_json::json!({"windspeed": 3})))).unwrap();
        assert_eq!(value, serde_json::json!({"windspeed": 3}));
    }
}
