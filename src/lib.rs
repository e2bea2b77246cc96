#![doc = "The `taskgate` library crate."]
#![doc = ""]
#![doc = "A single admin logs in with static credentials, receives a signed, time-bound"]
#![doc = "token, and uses it to manage a personal task list. This crate holds the credential"]
#![doc = "check, token issuance and validation, the access gate middleware, the task store"]
#![doc = "with its completion rules, routing and error handling. `main.rs` only wires them up."]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
