//! tests/mod.rs
//! Pruebas del servicio. SQLite en memoria con las migraciones reales.

mod alert_service_tests;
mod fcm_tests;
mod support;
