use actix_web::{web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};

use crate::client::Backend;
use crate::form::ProfileForm;
use crate::prediction::RenderOptions;
use crate::session::DashboardSession;
use crate::tabs::{TabError, PREDICT_TAB};

pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub default_tab: String,
    pub options: RenderOptions,
}

enum Action {
    Initial,
    Tab(String),
    Submit(ProfileForm),
}

enum RenderFailure {
    UnknownTab(String),
    Internal(String),
}

impl From<TabError> for RenderFailure {
    fn from(err: TabError) -> Self {
        match err {
            TabError::Unknown(tab) => RenderFailure::UnknownTab(tab),
            other => RenderFailure::Internal(other.to_string()),
        }
    }
}

// Every page view gets a fresh session; nothing is cached between requests.
fn render(state: &AppState, action: Action) -> Result<String, RenderFailure> {
    let backend = state.backend.as_ref();
    let mut session = DashboardSession::new(&state.default_tab, state.options)?;
    match action {
        Action::Initial => {
            session.load_initial(backend).map_err(|e| RenderFailure::Internal(e.to_string()))?;
        }
        Action::Tab(tab) => {
            session.switch_tab(backend, &tab)?;
        }
        Action::Submit(form) => {
            // the result container lives on the predict tab
            session.switch_tab(backend, PREDICT_TAB)?;
            session.submit(backend, &form).map_err(|e| RenderFailure::Internal(e.to_string()))?;
        }
    }
    Ok(session.render_document())
}

async fn run_blocking(state: web::Data<AppState>, action: Action) -> HttpResponse {
    match web::block(move || render(&state, action)).await {
        Ok(Ok(document)) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(document),
        Ok(Err(RenderFailure::UnknownTab(tab))) => HttpResponse::NotFound().body(format!("Unknown tab: {tab}")),
        Ok(Err(RenderFailure::Internal(message))) => {
            error!(%message, "render failed");
            HttpResponse::InternalServerError().body(message)
        }
        Err(err) => {
            error!(error = %err, "render task failed");
            HttpResponse::InternalServerError().body("render task failed")
        }
    }
}

// Homepage endpoint
async fn serve_homepage(state: web::Data<AppState>) -> HttpResponse {
    run_blocking(state, Action::Initial).await
}

async fn serve_tab(state: web::Data<AppState>, tab: web::Path<String>) -> HttpResponse {
    run_blocking(state, Action::Tab(tab.into_inner())).await
}

async fn submit_prediction(state: web::Data<AppState>, form: web::Form<ProfileForm>) -> HttpResponse {
    run_blocking(state, Action::Submit(form.into_inner())).await
}

// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Scholarship dashboard is running!")
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(serve_homepage))
        .route("/tab/{name}", web::get().to(serve_tab))
        .route("/predict", web::post().to(submit_prediction))
        .route("/health", web::get().to(health_check));
}

pub async fn start(bind_address: &str, state: AppState) -> std::io::Result<()> {
    let state = web::Data::new(state);
    info!("Starting scholarship dashboard on http://{bind_address}");

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(bind_address)?
        .run()
        .await
}
