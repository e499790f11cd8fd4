pub mod inventory;
pub mod refunds;
pub mod reservations;
pub mod views;

use std::sync::Arc;

use anyhow::Result;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use chrono_tz::Tz;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::calendar;
use crate::models::Config;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<Config>,
    pub(crate) tz: Tz,
}

impl AppState {
    pub(crate) fn new(config: Config) -> Result<Self> {
        let tz = config.timezone()?;
        Ok(Self {
            config: Arc::new(config),
            tz,
        })
    }

    pub(crate) fn today(&self) -> NaiveDate {
        calendar::today(self.tz)
    }
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(
            "/reservations",
            get(reservations::prompt_handler).post(reservations::submit_handler),
        )
        .route(
            "/inventory",
            get(inventory::form_handler).post(inventory::submit_handler),
        )
        .route(
            "/refunds",
            get(refunds::form_handler).post(refunds::submit_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index_handler() -> Html<String> {
    Html(views::render_index())
}

pub async fn serve(config: Config, addr: &str) -> Result<()> {
    let state = AppState::new(config)?;
    info!("Using timezone {} (today is {})", state.tz, state.today());

    let app = router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
