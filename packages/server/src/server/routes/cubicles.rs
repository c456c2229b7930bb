use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};

use crate::common::{ApiResponse, AppError};
use crate::domains::cubicles::actions;
use crate::domains::cubicles::{
    CreateCubicleInput, Cubicle, CubicleDetail, CubicleFilter, UpdateCubicleInput,
};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

pub async fn create_cubicle_handler(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateCubicleInput>,
) -> Result<(StatusCode, Json<ApiResponse<Cubicle>>), AppError> {
    let cubicle = actions::create_cubicle(input, &user.email, &state.deps).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Cubicle created", cubicle)),
    ))
}

pub async fn list_cubicles_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<CubicleDetail>>, AppError> {
    Ok(Json(
        actions::list_cubicles(state.deps.store.as_ref()).await?,
    ))
}

pub async fn get_cubicle_handler(
    Extension(state): Extension<AppState>,
    Path(codigo): Path<String>,
) -> Result<Json<CubicleDetail>, AppError> {
    Ok(Json(
        actions::get_cubicle(&codigo, state.deps.store.as_ref()).await?,
    ))
}

/// GET /cubiculos/buscar/filtros?edificio=&planta=
pub async fn filter_cubicles_handler(
    Extension(state): Extension<AppState>,
    Query(filter): Query<CubicleFilter>,
) -> Result<Json<Vec<Cubicle>>, AppError> {
    Ok(Json(
        actions::filter_cubicles(filter, state.deps.store.as_ref()).await?,
    ))
}

/// GET /cubiculos/disponibles
pub async fn available_cubicles_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Cubicle>>, AppError> {
    Ok(Json(
        actions::available_cubicles(state.deps.store.as_ref()).await?,
    ))
}

pub async fn update_cubicle_handler(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(codigo): Path<String>,
    Json(input): Json<UpdateCubicleInput>,
) -> Result<Json<ApiResponse<Cubicle>>, AppError> {
    let cubicle = actions::update_cubicle(&codigo, input, &user.email, &state.deps).await?;
    Ok(Json(ApiResponse::new("Cubicle updated", cubicle)))
}

pub async fn delete_cubicle_handler(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(codigo): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    actions::delete_cubicle(&codigo, &user.email, &state.deps).await?;
    Ok(Json(ApiResponse::message("Cubicle deleted")))
}
