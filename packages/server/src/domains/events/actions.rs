//! Event actions

use serde_json::Value;
use tracing::info;

use crate::common::{non_empty, now_timestamp, optional_text, AppError};
use crate::domains::events::data::{CreateEventInput, UpdateEventInput};
use crate::domains::events::models::Event;
use crate::kernel::{BaseDocumentStore, Document, ServerDeps};

/// Store an event under its code, replacing any event already there
pub async fn create_event(
    input: CreateEventInput,
    actor: &str,
    deps: &ServerDeps,
) -> Result<Event, AppError> {
    let (Some(codigo), Some(title), Some(latitude), Some(longitude)) = (
        non_empty(input.codigo),
        non_empty(input.title),
        input.latitude,
        input.longitude,
    ) else {
        return Err(AppError::Validation(
            "Missing required fields: codigo, title, latitude, longitude".into(),
        ));
    };

    let event = Event {
        codigo,
        latitude,
        longitude,
        title,
        description: input.description.unwrap_or_default(),
        created_by: actor.to_string(),
        created_at: now_timestamp(),
        updated_at: None,
        updated_by: None,
    };
    event.save(deps.store.as_ref()).await?;

    info!(code = %event.codigo, actor = %actor, "Event saved");
    deps.notifier.publish("event.created", &event);

    Ok(event)
}

pub async fn list_events(store: &dyn BaseDocumentStore) -> Result<Vec<Event>, AppError> {
    Ok(Event::list(store).await?)
}

pub async fn get_event(code: &str, store: &dyn BaseDocumentStore) -> Result<Event, AppError> {
    Event::find(code, store)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}

/// Merge changes into an event. The code itself never changes.
pub async fn update_event(
    code: &str,
    input: UpdateEventInput,
    actor: &str,
    deps: &ServerDeps,
) -> Result<Event, AppError> {
    let mut patch = Document::new();
    if let Some(latitude) = input.latitude {
        patch.insert("latitude".into(), Value::from(latitude));
    }
    if let Some(longitude) = input.longitude {
        patch.insert("longitude".into(), Value::from(longitude));
    }
    if let Some(title) = optional_text("title", input.title)? {
        patch.insert("title".into(), Value::from(title));
    }
    if let Some(description) = input.description {
        patch.insert("description".into(), Value::from(description));
    }
    patch.insert("updatedAt".into(), Value::from(now_timestamp()));
    patch.insert("updatedBy".into(), Value::from(actor));

    let event = Event::update(code, patch, deps.store.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))?;

    info!(code = %code, actor = %actor, "Event updated");
    deps.notifier.publish("event.updated", &event);

    Ok(event)
}

pub async fn delete_event(code: &str, actor: &str, deps: &ServerDeps) -> Result<(), AppError> {
    let store = deps.store.as_ref();

    if Event::find(code, store).await?.is_none() {
        return Err(AppError::NotFound("Event not found".into()));
    }
    Event::delete(code, store).await?;

    info!(code = %code, actor = %actor, "Event deleted");
    deps.notifier
        .publish("event.deleted", &serde_json::json!({ "codigo": code }));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::kernel::{test_server_deps, MemoryDocumentStore};

    const ACTOR: &str = "staff@campus.edu";

    fn input(code: &str, title: &str) -> CreateEventInput {
        CreateEventInput {
            codigo: Some(code.into()),
            latitude: Some(19.4326),
            longitude: Some(-99.1332),
            title: Some(title.into()),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_overwrites_same_code() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));

        create_event(input("FERIA", "Feria"), ACTOR, &deps)
            .await
            .unwrap();
        create_event(input("FERIA", "Feria de ciencias"), ACTOR, &deps)
            .await
            .unwrap();

        let events = list_events(deps.store.as_ref()).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Feria de ciencias");
        assert_eq!(events[0].description, "");
    }

    #[tokio::test]
    async fn test_create_requires_code_and_title() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));

        assert!(matches!(
            create_event(input("", "Feria"), ACTOR, &deps).await,
            Err(AppError::Validation(_))
        ));
        let no_position = CreateEventInput {
            latitude: None,
            ..input("FERIA", "Feria")
        };
        assert!(matches!(
            create_event(no_position, ACTOR, &deps).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_merges_and_absent_is_not_found() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));
        create_event(input("FERIA", "Feria"), ACTOR, &deps)
            .await
            .unwrap();

        let updated = update_event(
            "FERIA",
            UpdateEventInput {
                description: Some("Patio central".into()),
                ..Default::default()
            },
            "editor@campus.edu",
            &deps,
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Feria");
        assert_eq!(updated.description, "Patio central");
        assert_eq!(updated.updated_by.as_deref(), Some("editor@campus.edu"));

        assert!(matches!(
            update_event("NADA", UpdateEventInput::default(), ACTOR, &deps).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            delete_event("NADA", ACTOR, &deps).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_mutations_are_broadcast() {
        let deps = test_server_deps(Arc::new(MemoryDocumentStore::new()));
        let mut rx = deps.notifier.subscribe();

        create_event(input("FERIA", "Feria"), ACTOR, &deps)
            .await
            .unwrap();
        delete_event("FERIA", ACTOR, &deps).await.unwrap();

        let created = rx.recv().await.unwrap();
        assert_eq!(created.event, "event.created");
        assert_eq!(created.payload["codigo"], "FERIA");

        let deleted = rx.recv().await.unwrap();
        assert_eq!(deleted.event, "event.deleted");
        assert_eq!(deleted.payload, serde_json::json!({ "codigo": "FERIA" }));
    }
}
