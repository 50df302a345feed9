#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "This crate contains the core business logic, domain models, authentication"]
#![doc = "mechanisms, owner-scoped repositories, routing configuration, and error"]
#![doc = "handling for the TaskVault service. It is used by the main binary"]
#![doc = "(`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod models;
pub mod repo;
pub mod routes;
pub mod services;
