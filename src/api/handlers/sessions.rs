// src/api/handlers/sessions.rs
use actix_web::http::header;
use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::api::AppState;
use crate::errors::RunpadError;
use crate::store::{self, SharedSession};
use crate::view::{self, View};

#[derive(Deserialize)]
pub struct SelectLanguageRequest {
    pub language: String,
}

#[derive(Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Deserialize, Default)]
pub struct RunQuery {
    /// Hold the response until the run settles instead of answering with the pending view.
    #[serde(default)]
    pub wait: bool,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub view: View,
}

fn error_response(e: &RunpadError) -> HttpResponse {
    let body = json!({ "error": e.to_string() });
    match e {
        RunpadError::SessionNotFound(_) => HttpResponse::NotFound().json(body),
        RunpadError::UnsupportedLanguage(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

async fn lookup(state: &AppState, id: &Uuid) -> std::result::Result<SharedSession, HttpResponse> {
    state.sessions.get(id).await.map_err(|e| {
        log::debug!("{}", e);
        error_response(&e)
    })
}

/// POST /api/v1/sessions - Start a session with the default language
pub async fn create_session(state: web::Data<AppState>) -> Result<HttpResponse> {
    let (id, session) = state.sessions.create(state.config.default_language).await;
    let guard = session.lock().await;
    let view = view::render(&guard);

    Ok(HttpResponse::Created().json(SessionResponse { id, view }))
}

/// GET /api/v1/sessions/{id} - Current view of a session
pub async fn get_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let guard = session.lock().await;
    Ok(HttpResponse::Ok().json(view::render(&guard)))
}

/// DELETE /api/v1/sessions/{id} - Drop a session when its page goes away
pub async fn delete_session(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    match state.sessions.remove(&path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(error_response(&e)),
    }
}

/// PUT /api/v1/sessions/{id}/language - Switch language and load its template
pub async fn select_language(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<SelectLanguageRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let mut session = session.lock().await;
    match session.select_language(&req.language) {
        Ok(()) => Ok(HttpResponse::Ok().json(view::render(&session))),
        Err(e) => {
            log::warn!("Rejected language selection for {}: {}", id, e);
            Ok(HttpResponse::BadRequest().json(json!({
                "error": e.to_string(),
                "view": view::render(&session)
            })))
        }
    }
}

/// PUT /api/v1/sessions/{id}/source - Replace the editor text
pub async fn set_source(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<TextRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let mut session = session.lock().await;
    session.set_source(req.into_inner().text);
    Ok(HttpResponse::Ok().json(view::render(&session)))
}

/// PUT /api/v1/sessions/{id}/input - Replace the program input
pub async fn set_input(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<TextRequest>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let mut session = session.lock().await;
    session.set_input(req.into_inner().text);
    Ok(HttpResponse::Ok().json(view::render(&session)))
}

/// POST /api/v1/sessions/{id}/run - Submit the current program
///
/// Answers 202 with the pending view and settles in the background, or 200 with the
/// unchanged view when a run is already pending. With `?wait=true` the response carries
/// the settled view instead.
pub async fn run(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<RunQuery>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let (request, pending_view) = {
        let mut guard = session.lock().await;
        let request = guard.begin_run(state.config.backend.timeout_seconds);
        (request, view::render(&guard))
    };

    let Some(request) = request else {
        log::info!("Session {} already has a run pending", id);
        return Ok(HttpResponse::Ok().json(pending_view));
    };

    log::info!("Session {} started a {} run", id, request.language);

    if query.wait {
        store::execute_and_settle(&session, state.backend.as_ref(), &request).await;
        let guard = session.lock().await;
        return Ok(HttpResponse::Ok().json(view::render(&guard)));
    }

    let backend = state.backend.clone();
    actix_web::rt::spawn(async move {
        store::execute_and_settle(&session, backend.as_ref(), &request).await;
    });

    Ok(HttpResponse::Accepted().json(pending_view))
}

/// GET /api/v1/sessions/{id}/export - Download the current source
pub async fn export_source(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let session = match lookup(&state, &id).await {
        Ok(session) => session,
        Err(resp) => return Ok(resp),
    };

    let file = session.lock().await.export_source();
    Ok(HttpResponse::Ok()
        .content_type(file.mime_type)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ))
        .body(file.content))
}
