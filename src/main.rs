use std::sync::Arc;

use scholarship_dashboard::server::{self, AppState};
use scholarship_dashboard::{logging, Config, DashboardError, HttpBackend};
use tracing::info;

#[actix_web::main]
async fn main() -> Result<(), DashboardError> {
    let config = Config::load()?;
    logging::init(&config.log_level)?;

    let backend = HttpBackend::new(&config.backend_url, config.connect_timeout(), config.read_timeout());
    info!("Prediction service at {}", backend.base_url());
    info!(
        recommendations = config.render.recommendations,
        explanations = config.render.explanations,
        default_tab = %config.default_tab,
        "Result rendering configured"
    );

    let state = AppState {
        backend: Arc::new(backend),
        default_tab: config.default_tab.clone(),
        options: config.render_options(),
    };
    server::start(&config.bind_address, state).await?;

    Ok(())
}
