use std::collections::HashMap;

use axum::extract::{Form, Query, State};
use axum::response::Html;
use serde::Deserialize;
use tracing::{info, warn};

use super::views;
use super::AppState;
use crate::reservations::{self, BatchOutcome, ReservationInput, ReservationRecord};

#[derive(Debug, Deserialize)]
pub(crate) struct CountQuery {
    count: Option<String>,
}

/// Step one: ask how many reservations, then show that many blank forms.
pub(crate) async fn prompt_handler(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Html<String> {
    let Some(raw) = query.count else {
        return Html(views::render_count_prompt(None));
    };
    match reservations::parse_batch_size(&raw) {
        Ok(n) => {
            let blank = vec![ReservationRecord::default(); n];
            Html(views::render_reservation_forms(&blank, &state.config.catalog))
        }
        Err(e) => {
            warn!("Reservations: rejected count {:?}", raw);
            Html(views::render_count_prompt(Some(&e.to_string())))
        }
    }
}

fn field(form: &HashMap<String, String>, name: &str, i: usize) -> String {
    form.get(&format!("{name}_{i}")).cloned().unwrap_or_default()
}

pub(crate) async fn submit_handler(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Html<String> {
    let raw_count = form.get("count").map(String::as_str).unwrap_or("");
    let n = match reservations::parse_batch_size(raw_count) {
        Ok(n) => n,
        Err(e) => {
            warn!("Reservations: rejected posted count {:?}", raw_count);
            return Html(views::render_count_prompt(Some(&e.to_string())));
        }
    };

    let inputs: Vec<ReservationInput> = (0..n)
        .map(|i| ReservationInput {
            date: field(&form, "date", i),
            activity: field(&form, "activity", i),
            instructor: field(&form, "instructor", i),
            duration: field(&form, "duration", i),
            participants: field(&form, "participants", i),
            notes: field(&form, "notes", i),
        })
        .collect();

    match reservations::process_batch(&inputs, state.today()) {
        BatchOutcome::Invalid(records) => {
            let invalid = records.iter().filter(|r| !r.is_valid()).count();
            info!("Reservations: {} submitted, {} with errors", n, invalid);
            Html(views::render_reservation_forms(&records, &state.config.catalog))
        }
        BatchOutcome::Valid(summary) => {
            info!(
                "Reservations: {} accepted, {} minutes in total",
                n, summary.totals.duration_minutes
            );
            Html(views::render_reservation_summary(&summary))
        }
    }
}
