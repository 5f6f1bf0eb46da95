use actix_cors::Cors;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, middleware, Responder};
use rust_embed::RustEmbed;
use runpad::api::{configure_routes_with_limit, AppState};
use runpad::{banner, config, store};
use std::borrow::Cow;
use std::time::Duration;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  No .env file loaded ({}), using process environment", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = match config::AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    let host = app_config.server.host.clone();
    let port = app_config.server.port;
    let max_body_bytes = app_config.server.max_body_bytes;
    let idle_ttl = Duration::from_secs(app_config.server.session_idle_ttl_secs);

    let state = AppState::new(app_config).map_err(|e| {
        log::error!("Failed to initialise execution client: {}", e);
        std::io::Error::other(e)
    })?;

    actix_web::rt::spawn(store::sweep_forever(state.sessions.clone(), idle_ttl));

    log::info!("🚀 Starting server on http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(move |cfg| configure_routes_with_limit(cfg, max_body_bytes))
            .route("/{_:.*}", web::get().to(static_file_handler))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

async fn static_file_handler(req: HttpRequest) -> impl Responder {
    let path = if req.path() == "/" {
        "index.html"
    } else {
        // trim leading '/'
        &req.path()[1..]
    };

    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            HttpResponse::Ok().content_type(mime.as_ref()).body(Cow::into_owned(content.data))
        }
        None => HttpResponse::NotFound().body("404 Not Found"),
    }
}
