use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::collections::CUBICLES;
use crate::domains::professors::models::Shift;
use crate::kernel::{from_document, to_document, BaseDocumentStore, Document, StoreResult};

/// Cubicle (office) document in the `cubiculos` collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cubicle {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "edificio")]
    pub building: String,
    #[serde(rename = "numeroCubiculo")]
    pub number: String,
    #[serde(rename = "planta")]
    pub floor: String,
    /// Code of the assigned professor; serialized as `null` when unassigned
    #[serde(rename = "profesorId", default)]
    pub professor_id: Option<String>,

    // Audit
    pub created_at: String,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Location fields of a cubicle, as listed on its professor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CubicleSummary {
    pub codigo: String,
    pub edificio: String,
    #[serde(rename = "numeroCubiculo")]
    pub numero_cubiculo: String,
    pub planta: String,
}

impl From<&Cubicle> for CubicleSummary {
    fn from(cubicle: &Cubicle) -> Self {
        Self {
            codigo: cubicle.code.clone(),
            edificio: cubicle.building.clone(),
            numero_cubiculo: cubicle.number.clone(),
            planta: cubicle.floor.clone(),
        }
    }
}

/// Cubicle with its professor's display fields (read-time join)
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CubicleDetail {
    #[serde(flatten)]
    pub cubicle: Cubicle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profesor_nombre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profesor_turno: Option<Shift>,
}

// =============================================================================
// Store access - ALL document reads/writes for cubicles live here
// =============================================================================

fn decode_all(docs: Vec<(String, Document)>) -> StoreResult<Vec<Cubicle>> {
    docs.into_iter().map(|(_, doc)| from_document(doc)).collect()
}

impl Cubicle {
    pub async fn find(code: &str, store: &dyn BaseDocumentStore) -> StoreResult<Option<Self>> {
        store
            .get(CUBICLES, code)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn exists(code: &str, store: &dyn BaseDocumentStore) -> StoreResult<bool> {
        store.exists(CUBICLES, code).await
    }

    pub async fn list(store: &dyn BaseDocumentStore) -> StoreResult<Vec<Self>> {
        decode_all(store.list(CUBICLES).await?)
    }

    /// Cubicles assigned to the given professor
    pub async fn find_by_professor(
        professor_code: &str,
        store: &dyn BaseDocumentStore,
    ) -> StoreResult<Vec<Self>> {
        let docs = store
            .find_eq(CUBICLES, "profesorId", &Value::from(professor_code))
            .await?;
        decode_all(docs)
    }

    /// Cubicles with no professor assigned
    pub async fn find_unassigned(store: &dyn BaseDocumentStore) -> StoreResult<Vec<Self>> {
        decode_all(store.find_eq(CUBICLES, "profesorId", &Value::Null).await?)
    }

    /// Exact-match filter on building and/or floor
    pub async fn filter(
        building: Option<&str>,
        floor: Option<&str>,
        store: &dyn BaseDocumentStore,
    ) -> StoreResult<Vec<Self>> {
        let candidates = match building {
            Some(building) => decode_all(
                store
                    .find_eq(CUBICLES, "edificio", &Value::from(building))
                    .await?,
            )?,
            None => Self::list(store).await?,
        };

        Ok(candidates
            .into_iter()
            .filter(|c| floor.map_or(true, |floor| c.floor == floor))
            .collect())
    }

    /// Insert a new cubicle. Returns `false` if the code is already taken.
    pub async fn insert(&self, store: &dyn BaseDocumentStore) -> StoreResult<bool> {
        store
            .create(CUBICLES, &self.code, to_document(self)?)
            .await
    }

    /// Merge `patch` into the stored cubicle and return the result
    pub async fn update(
        code: &str,
        patch: Document,
        store: &dyn BaseDocumentStore,
    ) -> StoreResult<Option<Self>> {
        store.update(CUBICLES, code, patch).await?;
        Self::find(code, store).await
    }

    pub async fn delete(code: &str, store: &dyn BaseDocumentStore) -> StoreResult<()> {
        store.delete(CUBICLES, code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cubicle(code: &str, building: &str, floor: &str, professor: Option<&str>) -> Cubicle {
        Cubicle {
            code: code.into(),
            building: building.into(),
            number: "1".into(),
            floor: floor.into(),
            professor_id: professor.map(Into::into),
            created_at: "t".into(),
            created_by: "u".into(),
            updated_at: None,
            updated_by: None,
        }
    }

    #[test]
    fn test_unassigned_serializes_null() {
        let value = serde_json::to_value(cubicle("A-1-1", "A", "1", None)).unwrap();
        assert_eq!(value["profesorId"], Value::Null);
        assert_eq!(value["numeroCubiculo"], json!("1"));
        assert!(value.get("updatedAt").is_none());
    }

    #[tokio::test]
    async fn test_filter_by_building_and_floor() {
        let store = crate::kernel::MemoryDocumentStore::new();
        for c in [
            cubicle("A-1-1", "A", "1", None),
            cubicle("A-2-2", "A", "2", Some("X")),
            cubicle("B-1-1", "B", "1", None),
        ] {
            assert!(c.insert(&store).await.unwrap());
        }

        let a = Cubicle::filter(Some("A"), None, &store).await.unwrap();
        assert_eq!(a.len(), 2);

        let a1 = Cubicle::filter(Some("A"), Some("1"), &store).await.unwrap();
        assert_eq!(a1.len(), 1);
        assert_eq!(a1[0].code, "A-1-1");

        let floor1 = Cubicle::filter(None, Some("1"), &store).await.unwrap();
        assert_eq!(floor1.len(), 2);

        let free = Cubicle::find_unassigned(&store).await.unwrap();
        assert_eq!(free.len(), 2);

        let of_x = Cubicle::find_by_professor("X", &store).await.unwrap();
        assert_eq!(of_x.len(), 1);
        assert_eq!(of_x[0].code, "A-2-2");
    }
}
