// src/lib.rs
pub mod api;
pub mod backend;
pub mod banner;
pub mod config;
pub mod errors;
pub mod language;
pub mod session;
pub mod store;
pub mod view;
