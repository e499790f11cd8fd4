use axum::extract::Form;
use axum::response::Html;
use serde::Deserialize;
use tracing::{info, warn};

use super::views::{self, InventoryView};
use crate::inventory::{self, ParseOutcome};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LogsForm {
    #[serde(default)]
    logs: String,
}

pub(crate) async fn form_handler() -> Html<String> {
    Html(views::render_inventory("", InventoryView::Empty))
}

pub(crate) async fn submit_handler(Form(form): Form<LogsForm>) -> Html<String> {
    let view = match inventory::parse_log(&form.logs) {
        Err(e) => {
            warn!("Inventory: rejected submission: {}", e);
            InventoryView::Rejected(e.to_string())
        }
        Ok(outcome) => {
            match &outcome {
                ParseOutcome::Error { errors_by_line } => {
                    info!("Inventory: {} lines with errors", errors_by_line.len())
                }
                ParseOutcome::Success { products } => {
                    info!("Inventory: {} products parsed", products.len())
                }
            }
            InventoryView::Parsed(outcome)
        }
    };
    Html(views::render_inventory(&form.logs, view))
}
