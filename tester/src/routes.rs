use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State as AxumState},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::{
    error::AppError,
    state::{PollBody, ResultsBody, State, VoteBody},
};

#[derive(Deserialize)]
pub struct CodeRequest {
    name: String,
    email: String,
}

#[derive(Deserialize)]
pub struct CodeVerification {
    otp: String,
    email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    poll_id: String,
    option_id: String,
    voter_email: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct NewPoll {
    title: String,
    options: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPoll {
    poll_id: u64,
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authorize(state: &State, headers: &HeaderMap) -> Result<(), AppError> {
    state.store().authorize(bearer(headers))
}

/// Public poll view, with votes attached when an admin token comes along.
pub async fn poll_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PollBody>, AppError> {
    let store = state.store();

    if store.authorize(bearer(&headers)).is_ok() {
        let poll = store
            .list_polls()
            .into_iter()
            .find(|poll| poll.id.to_string() == id.trim())
            .ok_or(AppError::NotFound)?;
        return Ok(Json(poll));
    }

    Ok(Json(store.public_poll(&id)?))
}

pub async fn results_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
) -> Result<Json<ResultsBody>, AppError> {
    Ok(Json(state.store().results(&id)?))
}

pub async fn request_code_handler(
    AxumState(state): AxumState<Arc<State>>,
    Json(payload): Json<CodeRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .store()
        .request_code(&payload.name, &payload.email, &state.config.code)?;

    Ok(StatusCode::OK)
}

pub async fn verify_code_handler(
    AxumState(state): AxumState<Arc<State>>,
    Json(payload): Json<CodeVerification>,
) -> Result<impl IntoResponse, AppError> {
    state.store().verify_code(&payload.otp, &payload.email)?;

    Ok(StatusCode::OK)
}

pub async fn vote_handler(
    AxumState(state): AxumState<Arc<State>>,
    Json(payload): Json<Ballot>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Vote for option {} in poll {}", payload.option_id, payload.poll_id);

    state
        .store()
        .vote(&payload.poll_id, &payload.option_id, &payload.voter_email)?;

    Ok(StatusCode::CREATED)
}

pub async fn login_handler(
    AxumState(state): AxumState<Arc<State>>,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    let token = state.store().login(&payload.email, &payload.password)?;

    Ok(Json(json!({ "token": token })))
}

pub async fn create_admin_handler(
    AxumState(state): AxumState<Arc<State>>,
    headers: HeaderMap,
    Json(payload): Json<Credentials>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &headers)?;
    state
        .store()
        .create_admin(&payload.email, &payload.password)?;

    Ok(StatusCode::CREATED)
}

pub async fn list_polls_handler(
    AxumState(state): AxumState<Arc<State>>,
    headers: HeaderMap,
) -> Result<Json<Vec<PollBody>>, AppError> {
    authorize(&state, &headers)?;

    Ok(Json(state.store().list_polls()))
}

pub async fn create_poll_handler(
    AxumState(state): AxumState<Arc<State>>,
    headers: HeaderMap,
    Json(payload): Json<NewPoll>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &headers)?;
    let poll_id = state
        .store()
        .create_poll(&payload.title, &payload.options)?;

    Ok((StatusCode::CREATED, Json(CreatedPoll { poll_id })))
}

pub async fn delete_poll_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &headers)?;
    state.store().delete_poll(&id)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_poll_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &headers)?;
    let active = state.store().toggle_poll(&id)?;

    Ok(Json(json!({ "active": active })))
}

pub async fn poll_votes_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<VoteBody>>, AppError> {
    authorize(&state, &headers)?;

    Ok(Json(state.store().poll_votes(&id)?))
}

pub async fn delete_vote_handler(
    AxumState(state): AxumState<Arc<State>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &headers)?;
    state.store().delete_vote(&id)?;

    Ok(StatusCode::NO_CONTENT)
}
