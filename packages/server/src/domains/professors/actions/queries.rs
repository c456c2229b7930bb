//! Professor reads

use std::collections::HashSet;

use crate::common::{non_empty, AppError};
use crate::domains::assignments;
use crate::domains::cubicles::models::Cubicle;
use crate::domains::professors::data::ProfessorFilter;
use crate::domains::professors::models::{Professor, ProfessorDetail};
use crate::kernel::BaseDocumentStore;

/// A professor with the cubicles assigned to them
pub async fn get_professor(
    code: &str,
    store: &dyn BaseDocumentStore,
) -> Result<ProfessorDetail, AppError> {
    let professor = Professor::find(code, store)
        .await?
        .ok_or_else(|| AppError::NotFound("Professor not found".into()))?;

    Ok(assignments::professor_detail(professor, store).await?)
}

pub async fn list_professors(store: &dyn BaseDocumentStore) -> Result<Vec<Professor>, AppError> {
    Ok(Professor::list(store).await?)
}

/// Case-insensitive substring match on `nombre`, exact match on `turno`
pub async fn filter_professors(
    filter: ProfessorFilter,
    store: &dyn BaseDocumentStore,
) -> Result<Vec<Professor>, AppError> {
    let name = non_empty(filter.nombre).map(|n| n.to_lowercase());
    let shift = non_empty(filter.turno);

    Ok(Professor::list(store)
        .await?
        .into_iter()
        .filter(|p| {
            name.as_ref()
                .map_or(true, |n| p.name.to_lowercase().contains(n.as_str()))
        })
        .filter(|p| shift.as_ref().map_or(true, |s| p.shift.to_string() == *s))
        .collect())
}

/// Professors no cubicle points at
pub async fn professors_without_cubicle(
    store: &dyn BaseDocumentStore,
) -> Result<Vec<Professor>, AppError> {
    let assigned: HashSet<String> = Cubicle::list(store)
        .await?
        .into_iter()
        .filter_map(|c| c.professor_id)
        .collect();

    Ok(Professor::list(store)
        .await?
        .into_iter()
        .filter(|p| !assigned.contains(&p.code))
        .collect())
}
