//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod alert_model;
pub mod interaction_model;
pub mod push_model;
pub mod user_model;

/// `None` y "" cuentan igual: campo ausente.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
