use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::common::collections::PROFESSORS;
use crate::domains::cubicles::models::CubicleSummary;
use crate::kernel::{from_document, to_document, BaseDocumentStore, Document, StoreResult};

/// Teaching shift
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Shift {
    #[serde(rename = "Matutino")]
    Morning,
    #[serde(rename = "Vespertino")]
    Evening,
    #[serde(rename = "Ambos")]
    Both,
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shift::Morning => write!(f, "Matutino"),
            Shift::Evening => write!(f, "Vespertino"),
            Shift::Both => write!(f, "Ambos"),
        }
    }
}

impl std::str::FromStr for Shift {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Matutino" => Ok(Shift::Morning),
            "Vespertino" => Ok(Shift::Evening),
            "Ambos" => Ok(Shift::Both),
            _ => Err(anyhow::anyhow!(
                "Invalid turno. Must be one of: Matutino, Vespertino, Ambos"
            )),
        }
    }
}

/// Professor document in the `profesores` collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Professor {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "turno")]
    pub shift: Shift,

    // Audit
    pub created_at: String,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Professor with the cubicles currently assigned (read-time join)
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorDetail {
    #[serde(flatten)]
    pub professor: Professor,
    pub cubiculos_asignados: Vec<CubicleSummary>,
}

// =============================================================================
// Store access - ALL document reads/writes for professors live here
// =============================================================================

impl Professor {
    pub async fn find(code: &str, store: &dyn BaseDocumentStore) -> StoreResult<Option<Self>> {
        store
            .get(PROFESSORS, code)
            .await?
            .map(from_document)
            .transpose()
    }

    pub async fn list(store: &dyn BaseDocumentStore) -> StoreResult<Vec<Self>> {
        store
            .list(PROFESSORS)
            .await?
            .into_iter()
            .map(|(_, doc)| from_document(doc))
            .collect()
    }

    /// Insert a new professor. Returns `false` if the code is already taken.
    pub async fn insert(&self, store: &dyn BaseDocumentStore) -> StoreResult<bool> {
        store
            .create(PROFESSORS, &self.code, to_document(self)?)
            .await
    }

    /// Merge `patch` into the stored professor and return the result
    pub async fn update(
        code: &str,
        patch: Document,
        store: &dyn BaseDocumentStore,
    ) -> StoreResult<Option<Self>> {
        store.update(PROFESSORS, code, patch).await?;
        Self::find(code, store).await
    }

    pub async fn delete(code: &str, store: &dyn BaseDocumentStore) -> StoreResult<()> {
        store.delete(PROFESSORS, code).await
    }
}
