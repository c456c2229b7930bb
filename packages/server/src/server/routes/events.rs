use axum::{
    extract::{Extension, Path},
    Json,
};

use crate::common::{ApiResponse, AppError};
use crate::domains::events::actions;
use crate::domains::events::{CreateEventInput, Event, UpdateEventInput};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

pub async fn create_event_handler(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateEventInput>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let event = actions::create_event(input, &user.email, &state.deps).await?;
    Ok(Json(ApiResponse::new("Event created", event)))
}

pub async fn list_events_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(actions::list_events(state.deps.store.as_ref()).await?))
}

pub async fn get_event_handler(
    Extension(state): Extension<AppState>,
    Path(codigo): Path<String>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(
        actions::get_event(&codigo, state.deps.store.as_ref()).await?,
    ))
}

pub async fn update_event_handler(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(codigo): Path<String>,
    Json(input): Json<UpdateEventInput>,
) -> Result<Json<ApiResponse<Event>>, AppError> {
    let event = actions::update_event(&codigo, input, &user.email, &state.deps).await?;
    Ok(Json(ApiResponse::new("Event updated", event)))
}

pub async fn delete_event_handler(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(codigo): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    actions::delete_event(&codigo, &user.email, &state.deps).await?;
    Ok(Json(ApiResponse::message("Event deleted")))
}
