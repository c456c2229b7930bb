//! Professor create/update/delete

use serde_json::Value;
use tracing::{info, warn};

use crate::common::collections::PROFESSORS;
use crate::common::{non_empty, now_timestamp, optional_text, AppError, CascadeReport};
use crate::domains::assignments;
use crate::domains::codes::{claim_with_suffix, professor_code_base};
use crate::domains::professors::data::{CreateProfessorInput, UpdateProfessorInput};
use crate::domains::professors::models::{Professor, Shift};
use crate::kernel::{to_document, Document, ServerDeps};

fn parse_shift(turno: &str) -> Result<Shift, AppError> {
    turno
        .parse()
        .map_err(|e: anyhow::Error| AppError::Validation(e.to_string()))
}

/// Create a professor, deriving its code from the name unless one is given.
///
/// A taken code (derived or explicit) is suffixed `-1`, `-2`, ... until free.
pub async fn create_professor(
    input: CreateProfessorInput,
    actor: &str,
    deps: &ServerDeps,
) -> Result<Professor, AppError> {
    let (Some(name), Some(turno)) = (non_empty(input.nombre), non_empty(input.turno)) else {
        return Err(AppError::Validation(
            "Missing required fields: nombre, turno".into(),
        ));
    };
    let shift = parse_shift(&turno)?;

    let base = match non_empty(input.codigo) {
        Some(code) => code,
        None => professor_code_base(&name).ok_or_else(|| {
            AppError::Validation("nombre must contain at least one letter".into())
        })?,
    };

    let mut professor = Professor {
        code: base.clone(),
        name,
        shift,
        created_at: now_timestamp(),
        created_by: actor.to_string(),
        updated_at: None,
        updated_by: None,
    };

    let code = claim_with_suffix(deps.store.as_ref(), PROFESSORS, &base, |candidate| {
        to_document(&Professor {
            code: candidate.to_string(),
            ..professor.clone()
        })
    })
    .await?;
    professor.code = code;

    info!(code = %professor.code, actor = %actor, "Professor created");
    deps.notifier.publish("profesor.created", &professor);

    Ok(professor)
}

/// Merge changes into a professor.
///
/// A new `codigo` moves the professor: the document is created at the new key,
/// its cubicles are re-pointed, and only then is the old key removed.
pub async fn update_professor(
    code: &str,
    input: UpdateProfessorInput,
    actor: &str,
    deps: &ServerDeps,
) -> Result<Professor, AppError> {
    let store = deps.store.as_ref();

    let existing = Professor::find(code, store)
        .await?
        .ok_or_else(|| AppError::NotFound("Professor not found".into()))?;

    let shift = non_empty(input.turno).map(|t| parse_shift(&t)).transpose()?;
    let name = optional_text("nombre", input.nombre)?;
    let updated_at = now_timestamp();

    match non_empty(input.codigo).filter(|new_code| new_code != code) {
        None => {
            let mut patch = Document::new();
            if let Some(name) = name {
                patch.insert("nombre".into(), Value::from(name));
            }
            if let Some(shift) = shift {
                patch.insert("turno".into(), Value::from(shift.to_string()));
            }
            patch.insert("updatedAt".into(), Value::from(updated_at));
            patch.insert("updatedBy".into(), Value::from(actor));

            let professor = Professor::update(code, patch, store)
                .await?
                .ok_or_else(|| AppError::NotFound("Professor not found".into()))?;

            info!(code = %code, actor = %actor, "Professor updated");
            deps.notifier.publish("profesor.updated", &professor);

            Ok(professor)
        }
        Some(new_code) => {
            let renamed = Professor {
                code: new_code,
                name: name.unwrap_or(existing.name),
                shift: shift.unwrap_or(existing.shift),
                created_at: existing.created_at,
                created_by: existing.created_by,
                updated_at: Some(updated_at),
                updated_by: Some(actor.to_string()),
            };
            rename_professor(code, renamed, actor, deps).await
        }
    }
}

async fn rename_professor(
    old_code: &str,
    renamed: Professor,
    actor: &str,
    deps: &ServerDeps,
) -> Result<Professor, AppError> {
    let store = deps.store.as_ref();
    // Both codes, in key order
    let mut keys = [old_code, renamed.code.as_str()].map(assignments::lock_key);
    keys.sort();
    let [first, second] = keys;
    let _first = deps.locks.acquire(first).await;
    let _second = deps.locks.acquire(second).await;

    if !renamed.insert(store).await? {
        return Err(AppError::Conflict(format!(
            "A professor with code {} already exists",
            renamed.code
        )));
    }

    let report = assignments::repoint_professor(old_code, &renamed.code, actor, deps).await?;
    if !report.is_complete() {
        // Both documents are kept so the move can be retried
        warn!(
            from = %old_code,
            to = %renamed.code,
            failed = ?report.failed,
            "Professor rename left cubicles on the old code"
        );
        return Err(AppError::CascadeFailed { report });
    }

    Professor::delete(old_code, store).await?;

    info!(from = %old_code, to = %renamed.code, actor = %actor, "Professor renamed");

    let mut payload = to_document(&renamed)?;
    payload.insert("codigoAnterior".into(), Value::from(old_code));
    deps.notifier.publish("profesor.updated", &payload);

    Ok(renamed)
}

/// Release the professor's cubicles, then delete the professor.
///
/// If any cubicle could not be released the professor is kept and the
/// per-cubicle report is returned as `CascadeFailed`.
pub async fn delete_professor(
    code: &str,
    actor: &str,
    deps: &ServerDeps,
) -> Result<CascadeReport, AppError> {
    let store = deps.store.as_ref();
    let _guard = deps.locks.acquire(assignments::lock_key(code)).await;

    if Professor::find(code, store).await?.is_none() {
        return Err(AppError::NotFound("Professor not found".into()));
    }

    let report = assignments::unassign_professor(code, actor, deps).await?;
    if !report.is_complete() {
        warn!(code = %code, failed = ?report.failed, "Professor kept: cubicles not released");
        return Err(AppError::CascadeFailed { report });
    }

    Professor::delete(code, store).await?;

    info!(code = %code, actor = %actor, released = report.updated.len(), "Professor deleted");
    deps.notifier
        .publish("profesor.deleted", &serde_json::json!({ "codigo": code }));

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::common::collections::CUBICLES;
    use crate::domains::cubicles::models::Cubicle;
    use crate::kernel::{test_server_deps, FailingDocumentStore, MemoryDocumentStore};

    const ACTOR: &str = "staff@campus.edu";

    fn input(nombre: &str, turno: &str) -> CreateProfessorInput {
        CreateProfessorInput {
            nombre: Some(nombre.into()),
            turno: Some(turno.into()),
            codigo: None,
        }
    }

    async fn assign(code: &str, professor: &str, deps: &ServerDeps) {
        let cubicle = Cubicle {
            code: code.into(),
            building: "A".into(),
            number: "1".into(),
            floor: "1".into(),
            professor_id: Some(professor.into()),
            created_at: "t".into(),
            created_by: ACTOR.into(),
            updated_at: None,
            updated_by: None,
        };
        assert!(cubicle.insert(deps.store.as_ref()).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_derives_and_suffixes_codes() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));

        let first = create_professor(input("Juan Pérez", "Matutino"), ACTOR, &deps)
            .await
            .unwrap();
        let second = create_professor(input("Juan Perez", "Vespertino"), ACTOR, &deps)
            .await
            .unwrap();

        assert_eq!(first.code, "JUAN-PEREZ");
        assert_eq!(second.code, "JUAN-PEREZ-1");
        assert_eq!(second.created_by, ACTOR);
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));

        let missing = CreateProfessorInput {
            nombre: Some("Ana".into()),
            ..Default::default()
        };
        assert!(matches!(
            create_professor(missing, ACTOR, &deps).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create_professor(input("Ana", "Nocturno"), ACTOR, &deps).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            create_professor(input("123", "Ambos"), ACTOR, &deps).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_explicit_code_is_suffixed_on_collision() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));
        let with_code = || CreateProfessorInput {
            codigo: Some("PROF-01".into()),
            ..input("Ana Ruiz", "Ambos")
        };

        let first = create_professor(with_code(), ACTOR, &deps).await.unwrap();
        let second = create_professor(with_code(), ACTOR, &deps).await.unwrap();

        assert_eq!(first.code, "PROF-01");
        assert_eq!(second.code, "PROF-01-1");
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));
        create_professor(input("Ana Ruiz", "Matutino"), ACTOR, &deps)
            .await
            .unwrap();

        let updated = update_professor(
            "ANA-RUIZ",
            UpdateProfessorInput {
                turno: Some("Ambos".into()),
                ..Default::default()
            },
            "editor@campus.edu",
            &deps,
        )
        .await
        .unwrap();

        assert_eq!(updated.name, "Ana Ruiz");
        assert_eq!(updated.shift, Shift::Both);
        assert_eq!(updated.updated_by.as_deref(), Some("editor@campus.edu"));

        let bad = update_professor(
            "ANA-RUIZ",
            UpdateProfessorInput {
                turno: Some("Nocturno".into()),
                ..Default::default()
            },
            ACTOR,
            &deps,
        )
        .await;
        assert!(matches!(bad, Err(AppError::Validation(_))));

        let absent = update_professor("NOBODY", UpdateProfessorInput::default(), ACTOR, &deps).await;
        assert!(matches!(absent, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rename_moves_professor_and_cubicles() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));
        create_professor(input("Ana Ruiz", "Matutino"), ACTOR, &deps)
            .await
            .unwrap();
        assign("A-1-1", "ANA-RUIZ", &deps).await;

        let renamed = update_professor(
            "ANA-RUIZ",
            UpdateProfessorInput {
                codigo: Some("ANA-RUIZ-GOMEZ".into()),
                ..Default::default()
            },
            ACTOR,
            &deps,
        )
        .await
        .unwrap();

        let store = deps.store.as_ref();
        assert_eq!(renamed.code, "ANA-RUIZ-GOMEZ");
        assert!(Professor::find("ANA-RUIZ", store).await.unwrap().is_none());
        let cubicle = Cubicle::find("A-1-1", store).await.unwrap().unwrap();
        assert_eq!(cubicle.professor_id.as_deref(), Some("ANA-RUIZ-GOMEZ"));
    }

    #[tokio::test]
    async fn test_rename_to_taken_code_conflicts() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));
        create_professor(input("Ana Ruiz", "Matutino"), ACTOR, &deps)
            .await
            .unwrap();
        create_professor(input("Luis Mora", "Matutino"), ACTOR, &deps)
            .await
            .unwrap();

        let result = update_professor(
            "ANA-RUIZ",
            UpdateProfessorInput {
                codigo: Some("LUIS-MORA".into()),
                ..Default::default()
            },
            ACTOR,
            &deps,
        )
        .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(Professor::find("ANA-RUIZ", deps.store.as_ref())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_delete_releases_cubicles() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));
        let mut rx = deps.notifier.subscribe();
        create_professor(input("Ana Ruiz", "Matutino"), ACTOR, &deps)
            .await
            .unwrap();
        assign("A-1-1", "ANA-RUIZ", &deps).await;
        assign("A-2-1", "ANA-RUIZ", &deps).await;

        let report = delete_professor("ANA-RUIZ", ACTOR, &deps).await.unwrap();

        assert_eq!(report.matched, 2);
        assert!(report.is_complete());
        assert!(Professor::find("ANA-RUIZ", deps.store.as_ref())
            .await
            .unwrap()
            .is_none());

        let events: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|n| n.event)
            .collect();
        assert_eq!(
            events,
            [
                "profesor.created",
                "cubiculo.updated",
                "cubiculo.updated",
                "profesor.deleted"
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_keeps_professor_when_release_fails() {
        let failing = FailingDocumentStore::new(MemoryDocumentStore::new());
        failing.fail_updates_to(CUBICLES, "A-2-1");
        let deps = test_server_deps(Arc::new(failing));

        create_professor(input("Ana Ruiz", "Matutino"), ACTOR, &deps)
            .await
            .unwrap();
        assign("A-1-1", "ANA-RUIZ", &deps).await;
        assign("A-2-1", "ANA-RUIZ", &deps).await;

        let Err(AppError::CascadeFailed { report }) =
            delete_professor("ANA-RUIZ", ACTOR, &deps).await
        else {
            panic!("expected a cascade failure");
        };

        assert_eq!(report.updated, vec!["A-1-1".to_string()]);
        assert_eq!(report.failed, vec!["A-2-1".to_string()]);
        assert!(Professor::find("ANA-RUIZ", deps.store.as_ref())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_delete_absent_is_not_found() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));
        assert!(matches!(
            delete_professor("NOBODY", ACTOR, &deps).await,
            Err(AppError::NotFound(_))
        ));
    }
}
