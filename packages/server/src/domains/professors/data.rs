//! Request bodies and query parameters for professor operations

use serde::Deserialize;

/// Body of `POST /profesores`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProfessorInput {
    pub nombre: Option<String>,
    pub turno: Option<String>,
    /// Explicit code; derived from `nombre` when absent
    pub codigo: Option<String>,
}

/// Body of `PUT /profesores/:codigo`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfessorInput {
    pub nombre: Option<String>,
    pub turno: Option<String>,
    /// New code; moves the professor and re-points its cubicles
    pub codigo: Option<String>,
}

/// Query of `GET /profesores/buscar/filtros`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessorFilter {
    pub nombre: Option<String>,
    pub turno: Option<String>,
}
