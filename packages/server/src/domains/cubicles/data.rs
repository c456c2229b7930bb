//! Request bodies and query parameters for cubicle operations

use serde::Deserialize;

use crate::common::{deserialize_some, deserialize_text};

/// Body of `POST /cubiculos`. Location fields accept strings or numbers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCubicleInput {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub edificio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub numero_cubiculo: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub planta: Option<String>,
    #[serde(default)]
    pub profesor_id: Option<String>,
    /// Explicit code; composed from the location fields when absent
    #[serde(default)]
    pub codigo: Option<String>,
}

/// Body of `PUT /cubiculos/:codigo`.
///
/// `profesorId: null` unassigns the cubicle; an absent `profesorId` leaves
/// the assignment unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCubicleInput {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub edificio: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub numero_cubiculo: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub planta: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub profesor_id: Option<Option<String>>,
}

/// Query of `GET /cubiculos/buscar/filtros`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CubicleFilter {
    pub edificio: Option<String>,
    pub planta: Option<String>,
}
