use serde::Deserialize;

/// Body of `POST /events`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventInput {
    pub codigo: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Body of `PUT /events/:codigo`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventInput {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub title: Option<String>,
    pub description: Option<String>,
}
