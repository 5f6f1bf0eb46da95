// src/api/handlers/languages.rs
use actix_web::{HttpResponse, Result};
use serde::Serialize;

use crate::language::Language;

#[derive(Serialize)]
pub struct LanguageEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub editor_mode: &'static str,
    pub extension: &'static str,
    pub filename: &'static str,
}

#[derive(Serialize)]
pub struct LanguagesResponse {
    pub languages: Vec<LanguageEntry>,
}

/// GET /api/v1/languages - Supported languages and their export mapping
pub async fn list_languages() -> Result<HttpResponse> {
    let languages = Language::ALL
        .iter()
        .map(|lang| {
            let mapping = lang.export_mapping();
            LanguageEntry {
                id: lang.as_str(),
                label: lang.label(),
                editor_mode: lang.editor_mode(),
                extension: mapping.extension,
                filename: mapping.filename,
            }
        })
        .collect();

    Ok(HttpResponse::Ok().json(LanguagesResponse { languages }))
}
