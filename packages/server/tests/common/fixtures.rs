//! Test fixtures for creating test data.

use axum::http::StatusCode;
use directory_core::domains::auth::actions::register;
use directory_core::domains::auth::{totp, User};
use directory_core::kernel::ServerDeps;
use serde_json::{json, Value};

use super::ApiClient;

pub const STAFF_EMAIL: &str = "staff@campus.edu";

/// Register a user directly and return its TOTP secret
pub async fn create_user(deps: &ServerDeps, email: &str, password: &str) -> String {
    register(Some(email.to_string()), Some(password.to_string()), deps)
        .await
        .expect("registration");

    User::find_by_email(email, deps.store.as_ref())
        .await
        .expect("store read")
        .expect("user exists")
        .totp_secret
}

/// The code an authenticator app shows right now
pub fn current_code(secret: &str) -> String {
    totp::code_at(secret, totp::now_unix()).expect("valid secret")
}

/// Create a professor through the API, returning the stored entity
pub async fn create_professor(client: &ApiClient, nombre: &str, turno: &str) -> Value {
    client
        .post("/profesores", json!({ "nombre": nombre, "turno": turno }))
        .await
        .expect(StatusCode::CREATED)["data"]
        .clone()
}

/// Create a cubicle through the API, returning the stored entity
pub async fn create_cubicle(
    client: &ApiClient,
    edificio: &str,
    numero: &str,
    planta: &str,
    profesor_id: Option<&str>,
) -> Value {
    client
        .post(
            "/cubiculos",
            json!({
                "edificio": edificio,
                "numeroCubiculo": numero,
                "planta": planta,
                "profesorId": profesor_id,
            }),
        )
        .await
        .expect(StatusCode::CREATED)["data"]
        .clone()
}
