//! Cubicle create/update/delete

use serde_json::Value;
use tokio::sync::OwnedMutexGuard;
use tracing::info;

use crate::common::{non_empty, now_timestamp, optional_text, AppError};
use crate::domains::assignments;
use crate::domains::codes::cubicle_code;
use crate::domains::cubicles::data::{CreateCubicleInput, UpdateCubicleInput};
use crate::domains::cubicles::models::Cubicle;
use crate::kernel::{BaseDocumentStore, Document, ServerDeps};

/// Lock the professor's assignments and check they can take `cubicle`.
///
/// The returned guard must be held until the assignment is written.
async fn claim_professor(
    professor_code: &str,
    cubicle: Option<&str>,
    deps: &ServerDeps,
) -> Result<OwnedMutexGuard<()>, AppError> {
    let guard = deps
        .locks
        .acquire(assignments::lock_key(professor_code))
        .await;
    check_assignable(professor_code, cubicle, deps).await?;

    Ok(guard)
}

async fn check_assignable(
    professor_code: &str,
    cubicle: Option<&str>,
    deps: &ServerDeps,
) -> Result<(), AppError> {
    let store = deps.store.as_ref();
    assignments::ensure_professor_exists(professor_code, store).await?;
    assignments::ensure_professor_unassigned(professor_code, cubicle, store).await
}

/// Lock both sides of a change to the cubicle's `profesorId`: its current
/// professor, whose cascades would otherwise overwrite the change, and the
/// new one. Locks are taken in key order.
async fn lock_reassignment(
    code: &str,
    new_professor: Option<&str>,
    deps: &ServerDeps,
) -> Result<Vec<OwnedMutexGuard<()>>, AppError> {
    let store = deps.store.as_ref();

    loop {
        let current = current_professor(code, store).await?;

        let mut keys: Vec<String> = [current.as_deref(), new_professor]
            .into_iter()
            .flatten()
            .map(assignments::lock_key)
            .collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(deps.locks.acquire(key).await);
        }

        // Reassigned while we waited: the lock set is stale
        if current_professor(code, store).await? == current {
            return Ok(guards);
        }
    }
}

async fn current_professor(
    code: &str,
    store: &dyn BaseDocumentStore,
) -> Result<Option<String>, AppError> {
    Cubicle::find(code, store)
        .await?
        .map(|cubicle| cubicle.professor_id)
        .ok_or_else(|| AppError::NotFound("Cubicle not found".into()))
}

/// Create a cubicle, optionally assigned to a professor.
///
/// A taken code is a `Conflict`; codes are never suffixed.
pub async fn create_cubicle(
    input: CreateCubicleInput,
    actor: &str,
    deps: &ServerDeps,
) -> Result<Cubicle, AppError> {
    let (Some(building), Some(number), Some(floor)) = (
        non_empty(input.edificio),
        non_empty(input.numero_cubiculo),
        non_empty(input.planta),
    ) else {
        return Err(AppError::Validation(
            "Missing required fields: edificio, numeroCubiculo, planta".into(),
        ));
    };

    let code = non_empty(input.codigo).unwrap_or_else(|| cubicle_code(&building, &number, &floor));
    let store = deps.store.as_ref();

    if Cubicle::exists(&code, store).await? {
        return Err(AppError::Conflict(
            "A cubicle with this code already exists".into(),
        ));
    }

    let professor_id = non_empty(input.profesor_id);
    let _guard = match &professor_id {
        Some(professor) => Some(claim_professor(professor, None, deps).await?),
        None => None,
    };

    let cubicle = Cubicle {
        code,
        building,
        number,
        floor,
        professor_id,
        created_at: now_timestamp(),
        created_by: actor.to_string(),
        updated_at: None,
        updated_by: None,
    };

    // The existence check above is advisory; the insert is conditional
    if !cubicle.insert(store).await? {
        return Err(AppError::Conflict(
            "A cubicle with this code already exists".into(),
        ));
    }

    info!(code = %cubicle.code, professor = ?cubicle.professor_id, actor = %actor, "Cubicle created");
    deps.notifier.publish("cubiculo.created", &cubicle);

    Ok(cubicle)
}

/// Merge changes into a cubicle. The code itself never changes.
pub async fn update_cubicle(
    code: &str,
    input: UpdateCubicleInput,
    actor: &str,
    deps: &ServerDeps,
) -> Result<Cubicle, AppError> {
    let store = deps.store.as_ref();

    if !Cubicle::exists(code, store).await? {
        return Err(AppError::NotFound("Cubicle not found".into()));
    }

    let mut patch = Document::new();
    for (field, value) in [
        ("edificio", input.edificio),
        ("numeroCubiculo", input.numero_cubiculo),
        ("planta", input.planta),
    ] {
        if let Some(text) = optional_text(field, value)? {
            patch.insert(field.into(), Value::from(text));
        }
    }

    let assignment = input.profesor_id.map(non_empty);
    let _guards = match &assignment {
        Some(professor) => {
            let guards = lock_reassignment(code, professor.as_deref(), deps).await?;
            if let Some(professor) = professor {
                check_assignable(professor, Some(code), deps).await?;
            }
            guards
        }
        None => Vec::new(),
    };
    if let Some(professor) = assignment {
        patch.insert(
            "profesorId".into(),
            professor.map_or(Value::Null, Value::from),
        );
    }

    patch.insert("updatedAt".into(), Value::from(now_timestamp()));
    patch.insert("updatedBy".into(), Value::from(actor));

    let cubicle = Cubicle::update(code, patch, store)
        .await?
        .ok_or_else(|| AppError::NotFound("Cubicle not found".into()))?;

    info!(code = %code, professor = ?cubicle.professor_id, actor = %actor, "Cubicle updated");
    deps.notifier.publish("cubiculo.updated", &cubicle);

    Ok(cubicle)
}

pub async fn delete_cubicle(code: &str, actor: &str, deps: &ServerDeps) -> Result<(), AppError> {
    let store = deps.store.as_ref();

    if !Cubicle::exists(code, store).await? {
        return Err(AppError::NotFound("Cubicle not found".into()));
    }

    Cubicle::delete(code, store).await?;

    info!(code = %code, actor = %actor, "Cubicle deleted");
    deps.notifier
        .publish("cubiculo.deleted", &serde_json::json!({ "codigo": code }));

    Ok(())
}
