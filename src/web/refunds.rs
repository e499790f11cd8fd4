use std::collections::BTreeMap;

use axum::extract::{Form, State};
use axum::response::Html;
use tracing::info;

use super::views;
use super::AppState;
use crate::refunds::{self, RefundForm, RefundOutcome};

pub(crate) async fn form_handler() -> Html<String> {
    Html(views::render_refund_form(&RefundForm::default(), &BTreeMap::new()))
}

pub(crate) async fn submit_handler(
    State(state): State<AppState>,
    Form(form): Form<RefundForm>,
) -> Html<String> {
    match refunds::process_refund(&form, state.today()) {
        RefundOutcome::Rejected { form, errors } => {
            info!("Refunds: rejected with {} field errors", errors.len());
            Html(views::render_refund_form(&form, &errors))
        }
        RefundOutcome::Accepted(summary) => {
            info!(
                "Refunds: accepted {} request, deadline {}",
                summary.incident_type.label(),
                summary.deadline.date
            );
            Html(views::render_refund_summary(&summary))
        }
    }
}
