//! Professor ↔ cubicle relationship maintenance.
//!
//! A cubicle's `profesorId` is either null (unassigned) or the code of an
//! existing professor, and a professor holds at most one cubicle. This module
//! validates assignments, cascades professor deletion and renames onto the
//! cubicles that reference them, and joins display fields on the read path.
//!
//! Cascades are best-effort: each dependent cubicle is written independently
//! and the outcome is collected per item in a [`CascadeReport`].

use futures::future::{join_all, try_join_all};
use serde_json::Value;
use tracing::{info, warn};

use crate::common::collections::CUBICLES;
use crate::common::{now_timestamp, AppError, CascadeReport};
use crate::domains::cubicles::models::{Cubicle, CubicleDetail, CubicleSummary};
use crate::domains::professors::models::{Professor, ProfessorDetail};
use crate::kernel::{BaseDocumentStore, Document, ServerDeps, StoreResult};

/// Advisory lock key guarding assignments of one professor
pub fn lock_key(professor_code: &str) -> String {
    format!("{CUBICLES}:profesorId:{professor_code}")
}

/// The professor referenced by an assignment, or `NotFound`
pub async fn ensure_professor_exists(
    professor_code: &str,
    store: &dyn BaseDocumentStore,
) -> Result<Professor, AppError> {
    Professor::find(professor_code, store)
        .await?
        .ok_or_else(|| AppError::NotFound("The specified professor does not exist".into()))
}

/// Fails with `Conflict` if a cubicle other than `except_cubicle` already
/// holds the professor.
pub async fn ensure_professor_unassigned(
    professor_code: &str,
    except_cubicle: Option<&str>,
    store: &dyn BaseDocumentStore,
) -> Result<(), AppError> {
    let holders = Cubicle::find_by_professor(professor_code, store).await?;

    if holders
        .iter()
        .any(|cubicle| Some(cubicle.code.as_str()) != except_cubicle)
    {
        return Err(AppError::Conflict(
            "This professor already has a cubicle assigned".into(),
        ));
    }

    Ok(())
}

fn assignment_patch(professor_code: Option<&str>, actor: &str, at: &str) -> Document {
    let mut patch = Document::new();
    patch.insert(
        "profesorId".into(),
        professor_code.map_or(Value::Null, Value::from),
    );
    patch.insert("updatedAt".into(), Value::from(at));
    patch.insert("updatedBy".into(), Value::from(actor));
    patch
}

/// Point every cubicle held by `from` at `to` (or unassign when `None`).
///
/// Writes run concurrently and independently; each success publishes
/// `cubiculo.updated`. Failures are collected, not retried.
async fn reassign(
    from: &str,
    to: Option<&str>,
    actor: &str,
    deps: &ServerDeps,
) -> StoreResult<CascadeReport> {
    let store = deps.store.as_ref();
    let cubicles = Cubicle::find_by_professor(from, store).await?;
    let at = now_timestamp();

    let writes = cubicles.iter().map(|cubicle| {
        let patch = assignment_patch(to, actor, &at);
        async move {
            let result = store.update(CUBICLES, &cubicle.code, patch.clone()).await;
            (cubicle.code.clone(), result.map(|()| patch))
        }
    });

    let mut report = CascadeReport {
        matched: cubicles.len(),
        ..Default::default()
    };

    for (code, result) in join_all(writes).await {
        match result {
            Ok(mut payload) => {
                payload.insert("codigo".into(), Value::from(code.as_str()));
                deps.notifier.publish("cubiculo.updated", &payload);
                report.updated.push(code);
            }
            Err(e) => {
                warn!(cubicle = %code, professor = %from, error = %e, "Cascade write failed");
                report.failed.push(code);
            }
        }
    }

    info!(
        professor = %from,
        target = ?to,
        matched = report.matched,
        failed = report.failed.len(),
        "Cubicle assignments cascaded"
    );

    Ok(report)
}

/// Clear `profesorId` on every cubicle assigned to the professor
pub async fn unassign_professor(
    professor_code: &str,
    actor: &str,
    deps: &ServerDeps,
) -> StoreResult<CascadeReport> {
    reassign(professor_code, None, actor, deps).await
}

/// Re-point cubicles from a professor's old code to its new one
pub async fn repoint_professor(
    old_code: &str,
    new_code: &str,
    actor: &str,
    deps: &ServerDeps,
) -> StoreResult<CascadeReport> {
    reassign(old_code, Some(new_code), actor, deps).await
}

/// Attach the assigned professor's name and shift
pub async fn cubicle_detail(
    cubicle: Cubicle,
    store: &dyn BaseDocumentStore,
) -> StoreResult<CubicleDetail> {
    let professor = match &cubicle.professor_id {
        Some(code) => Professor::find(code, store).await?,
        None => None,
    };

    Ok(CubicleDetail {
        profesor_nombre: professor.as_ref().map(|p| p.name.clone()),
        profesor_turno: professor.map(|p| p.shift),
        cubicle,
    })
}

pub async fn cubicle_details(
    cubicles: Vec<Cubicle>,
    store: &dyn BaseDocumentStore,
) -> StoreResult<Vec<CubicleDetail>> {
    try_join_all(
        cubicles
            .into_iter()
            .map(|cubicle| cubicle_detail(cubicle, store)),
    )
    .await
}

/// Attach the cubicles assigned to the professor, ordered by code
pub async fn professor_detail(
    professor: Professor,
    store: &dyn BaseDocumentStore,
) -> StoreResult<ProfessorDetail> {
    let mut assigned: Vec<CubicleSummary> = Cubicle::find_by_professor(&professor.code, store)
        .await?
        .iter()
        .map(CubicleSummary::from)
        .collect();
    assigned.sort_by(|a, b| a.codigo.cmp(&b.codigo));

    Ok(ProfessorDetail {
        professor,
        cubiculos_asignados: assigned,
    })
}
