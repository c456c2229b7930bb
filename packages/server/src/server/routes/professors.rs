use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};

use crate::common::{ApiResponse, AppError, CascadeReport};
use crate::domains::professors::actions;
use crate::domains::professors::{
    CreateProfessorInput, Professor, ProfessorDetail, ProfessorFilter, UpdateProfessorInput,
};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

pub async fn create_professor_handler(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<CreateProfessorInput>,
) -> Result<(StatusCode, Json<ApiResponse<Professor>>), AppError> {
    let professor = actions::create_professor(input, &user.email, &state.deps).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Professor created", professor)),
    ))
}

pub async fn list_professors_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Professor>>, AppError> {
    Ok(Json(
        actions::list_professors(state.deps.store.as_ref()).await?,
    ))
}

pub async fn get_professor_handler(
    Extension(state): Extension<AppState>,
    Path(codigo): Path<String>,
) -> Result<Json<ProfessorDetail>, AppError> {
    Ok(Json(
        actions::get_professor(&codigo, state.deps.store.as_ref()).await?,
    ))
}

/// GET /profesores/buscar/filtros?nombre=&turno=
pub async fn filter_professors_handler(
    Extension(state): Extension<AppState>,
    Query(filter): Query<ProfessorFilter>,
) -> Result<Json<Vec<Professor>>, AppError> {
    Ok(Json(
        actions::filter_professors(filter, state.deps.store.as_ref()).await?,
    ))
}

/// GET /profesores/sin-cubiculo
pub async fn professors_without_cubicle_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Professor>>, AppError> {
    Ok(Json(
        actions::professors_without_cubicle(state.deps.store.as_ref()).await?,
    ))
}

pub async fn update_professor_handler(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(codigo): Path<String>,
    Json(input): Json<UpdateProfessorInput>,
) -> Result<Json<ApiResponse<Professor>>, AppError> {
    let professor = actions::update_professor(&codigo, input, &user.email, &state.deps).await?;
    Ok(Json(ApiResponse::new("Professor updated", professor)))
}

/// Deletes the professor after releasing their cubicles
pub async fn delete_professor_handler(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(codigo): Path<String>,
) -> Result<Json<ApiResponse<CascadeReport>>, AppError> {
    let report = actions::delete_professor(&codigo, &user.email, &state.deps).await?;
    Ok(Json(ApiResponse::new(
        "Professor deleted. Assigned cubicles were released.",
        report,
    )))
}
