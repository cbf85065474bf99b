// handlers.rs

use crate::{
    commands::{DoorCommand, OpenHalf, Toggle},
    docs::ApiDoc,
    error::{AppError, ErrorBody},
    extract::CommandBody,
    models::{AppState, OpenHalfRequest, Password, ToggleRequest},
};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::{sync::Arc, time::Duration};
use tower_http::trace::TraceLayer;
use tracing::{Instrument, info, info_span};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

/// Response header carrying the final state of the door acted upon.
pub const DOOR_STATE_HEADER: &str = "x-door-state";

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/toggle", post(toggle))
        .route("/open-half", post(open_half))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness check.
#[utoipa::path(get, path = "/", responses((status = 200, body = String)))]
pub async fn home() -> &'static str {
    "Hello! I am alive!"
}

/// Toggles the first garage door on the account.
#[utoipa::path(
    post,
    path = "/toggle",
    request_body = ToggleRequest,
    responses(
        (status = 200, description = "Descriptions of the discovered doors", body = Vec<String>),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 502, body = ErrorBody),
    )
)]
pub async fn toggle(
    State(state): State<Arc<AppState>>,
    CommandBody(body): CommandBody<ToggleRequest>,
) -> Result<Response, AppError> {
    run_command(&state, Password::new(body.password), &Toggle).await
}

/// Opens a closed door for `seconds`, then closes it.
#[utoipa::path(
    post,
    path = "/open-half",
    request_body = OpenHalfRequest,
    responses(
        (status = 200, description = "Descriptions of the discovered doors", body = Vec<String>),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 502, body = ErrorBody),
    )
)]
pub async fn open_half(
    State(state): State<Arc<AppState>>,
    CommandBody(body): CommandBody<OpenHalfRequest>,
) -> Result<Response, AppError> {
    if body.seconds > state.max_hold_secs {
        return Err(AppError::Validation(format!(
            "seconds must be at most {}",
            state.max_hold_secs
        )));
    }
    let command = OpenHalf::new(Duration::from_secs(body.seconds));
    run_command(&state, Password::new(body.password), &command).await
}

async fn run_command(
    state: &AppState,
    password: Password,
    command: &dyn DoorCommand,
) -> Result<Response, AppError> {
    let span = info_span!("command", request_id = %Uuid::new_v4(), command = command.name());
    async move {
        let session = state.establisher.establish(&password).await?;

        let result = match session.first() {
            Some(door) => state.executor.execute(door.as_ref(), command).await,
            None => Err(AppError::NoDeviceFound),
        };
        let descriptions = session.descriptions();
        session.close().await;

        let door_state = result?;
        info!(%door_state, doors = descriptions.len(), "Command finished");
        Ok((
            [(
                HeaderName::from_static(DOOR_STATE_HEADER),
                HeaderValue::from_static(door_state.as_str()),
            )],
            Json(descriptions),
        )
            .into_response())
    }
    .instrument(span)
    .await
}
