pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod intake;
pub mod leads;
pub mod templates_structs;
pub mod webhook;
