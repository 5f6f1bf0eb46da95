// src/api/handlers/mod.rs
mod health;
mod languages;
mod sessions;

pub use health::health_check;
pub use languages::list_languages;
pub use sessions::{
    create_session, delete_session, export_source, get_session, run, select_language, set_input,
    set_source,
};
