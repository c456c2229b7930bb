//! Cubicle reads

use crate::common::{non_empty, AppError};
use crate::domains::assignments;
use crate::domains::cubicles::data::CubicleFilter;
use crate::domains::cubicles::models::{Cubicle, CubicleDetail};
use crate::kernel::BaseDocumentStore;

/// A cubicle with its professor's name and shift
pub async fn get_cubicle(
    code: &str,
    store: &dyn BaseDocumentStore,
) -> Result<CubicleDetail, AppError> {
    let cubicle = Cubicle::find(code, store)
        .await?
        .ok_or_else(|| AppError::NotFound("Cubicle not found".into()))?;

    Ok(assignments::cubicle_detail(cubicle, store).await?)
}

pub async fn list_cubicles(store: &dyn BaseDocumentStore) -> Result<Vec<CubicleDetail>, AppError> {
    let cubicles = Cubicle::list(store).await?;
    Ok(assignments::cubicle_details(cubicles, store).await?)
}

pub async fn filter_cubicles(
    filter: CubicleFilter,
    store: &dyn BaseDocumentStore,
) -> Result<Vec<Cubicle>, AppError> {
    let building = non_empty(filter.edificio);
    let floor = non_empty(filter.planta);

    Ok(Cubicle::filter(building.as_deref(), floor.as_deref(), store).await?)
}

/// Cubicles without a professor
pub async fn available_cubicles(store: &dyn BaseDocumentStore) -> Result<Vec<Cubicle>, AppError> {
    Ok(Cubicle::find_unassigned(store).await?)
}
