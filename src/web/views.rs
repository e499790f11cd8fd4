use std::collections::BTreeMap;

use leptos::prelude::*;

use crate::calendar;
use crate::inventory::{self, LineError, ParseOutcome, ProductAggregate};
use crate::models::Catalog;
use crate::refunds::{IncidentType, RefundField, RefundForm, RefundSummary, DEADLINE_CUTOFF};
use crate::reservations::{self, Field, ReservationRecord, ReservationRow, Summary};

const STYLE: &str = include_str!("../style.css");

pub(crate) enum InventoryView {
    Empty,
    /// Request-level rejection (size or line count).
    Rejected(String),
    Parsed(ParseOutcome),
}

fn render_page(title: &str, content: String) -> String {
    let heading = title.to_string();
    let title = title.to_string();

    let page = view! {
        <html lang="es">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <title>{title}</title>
                <style>{STYLE}</style>
            </head>
            <body>
                <main class="container">
                    <h1>{heading}</h1>
                    <div inner_html=content />
                </main>
                <footer>
                    <nav>
                        <a href="/">"Inicio"</a>
                        <a href="/reservations">"Reservas"</a>
                        <a href="/inventory">"Inventario"</a>
                        <a href="/refunds">"Reembolsos"</a>
                    </nav>
                </footer>
            </body>
        </html>
    }
    .to_html();
    format!("<!DOCTYPE html>{page}")
}

fn error_box(message: &str) -> String {
    let message = message.to_string();
    view! { <div class="error-box"><p>{message}</p></div> }.to_html()
}

fn error_message(message: &str) -> String {
    let message = message.to_string();
    view! { <span class="error-message">{message}</span> }.to_html()
}

/// Textarea content is written verbatim during rendering, so it is escaped
/// here.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn invalid_class(invalid: bool) -> &'static str {
    if invalid {
        "campo-invalido"
    } else {
        ""
    }
}

pub(crate) fn render_index() -> String {
    let content = view! {
        <ul class="menu">
            <li>
                <a href="/reservations">"Reservas de actividades"</a>
                <p>
                    "Reserva varias actividades a la vez y consulta el resumen "
                    "por fecha e instructor."
                </p>
            </li>
            <li>
                <a href="/inventory">"Gestor de logs de inventario"</a>
                <p>"Procesa registros producto#pasillo#estantería#cantidad."</p>
            </li>
            <li>
                <a href="/refunds">"Sistema de reembolsos"</a>
                <p>"Solicita un reembolso y calcula la fecha límite de resolución."</p>
            </li>
        </ul>
    }
    .to_html();
    render_page("Administración del centro deportivo", content)
}

// Reservations

pub(crate) fn render_count_prompt(error: Option<&str>) -> String {
    let error_html = error.map(error_box).unwrap_or_default();
    let content = view! {
        <div>
            <div inner_html=error_html />
            <form method="get" action="/reservations">
                <label>
                    "Número de reservas (1-50)"
                    <input type="number" name="count" min="1" max="50" />
                </label>
                <button type="submit">"Continuar"</button>
            </form>
        </div>
    }
    .to_html();
    render_page("Reservas de actividades", content)
}

fn render_options(options: &[String], selected: &str, placeholder: &str) -> String {
    let placeholder = placeholder.to_string();
    let mut html = view! { <option value="">{placeholder}</option> }.to_html();
    for option in options {
        let is_selected = option == selected;
        let value = option.clone();
        let label = option.clone();
        let option_html = view! { <option value=value selected=is_selected>{label}</option> };
        html.push_str(&option_html.to_html());
    }
    html
}

/// Numeric fields are only refilled with a positive parsed value.
fn positive(value: Option<i64>) -> String {
    match value {
        Some(v) if v > 0 => v.to_string(),
        _ => String::new(),
    }
}

fn render_record_fields(i: usize, record: &ReservationRecord, catalog: &Catalog) -> String {
    let legend = format!("Reserva {}", i + 1);
    let date_errors: String = record.date_errors().map(|e| error_message(e.message)).collect();
    let other_errors: String = record
        .errors
        .iter()
        .filter(|e| e.field != Field::Date)
        .map(|e| error_message(e.message))
        .collect();
    let activity_options = render_options(
        &catalog.activities,
        &record.activity,
        "Seleccione una actividad",
    );
    let instructor_options = render_options(
        &catalog.instructors,
        &record.instructor,
        "Seleccione un instructor",
    );

    let date_class = invalid_class(record.has_date_error());
    let activity_class = invalid_class(record.has_error(Field::Activity));
    let instructor_class = invalid_class(record.has_error(Field::Instructor));
    let duration_class = invalid_class(record.has_error(Field::Duration));
    let participants_class = invalid_class(record.has_error(Field::Participants));
    let notes_class = invalid_class(record.has_error(Field::Notes));

    let date_name = format!("date_{i}");
    let activity_name = format!("activity_{i}");
    let instructor_name = format!("instructor_{i}");
    let duration_name = format!("duration_{i}");
    let participants_name = format!("participants_{i}");
    let notes_name = format!("notes_{i}");

    let date_value = record.date_text.clone();
    let duration_value = positive(record.duration);
    let participants_value = positive(record.participants);
    let notes_value = escape_text(&record.notes);

    view! {
        <fieldset class="reserva">
            <legend>{legend}</legend>
            <label>
                "Fecha"
                <input type="text" name=date_name value=date_value
                    placeholder="dd/mm/yyyy" class=date_class />
            </label>
            <div class="errores-fecha" inner_html=date_errors />
            <label>
                "Actividad"
                <select name=activity_name class=activity_class
                    inner_html=activity_options />
            </label>
            <label>
                "Instructor"
                <select name=instructor_name class=instructor_class
                    inner_html=instructor_options />
            </label>
            <label>
                "Duración (minutos)"
                <input type="number" name=duration_name value=duration_value
                    min="30" max="180" class=duration_class />
            </label>
            <label>
                "Participantes"
                <input type="number" name=participants_name value=participants_value
                    min="1" max="25" class=participants_class />
            </label>
            <label>
                "Observaciones"
                <textarea
                    name=notes_name
                    maxlength="300"
                    class=notes_class
                    inner_html=notes_value
                />
            </label>
            <div class="errores" inner_html=other_errors />
        </fieldset>
    }
    .to_html()
}

pub(crate) fn render_reservation_forms(records: &[ReservationRecord], catalog: &Catalog) -> String {
    let count = records.len().to_string();
    let banner = if records.iter().any(|r| !r.is_valid()) {
        error_box("Revise los campos marcados en rojo.")
    } else {
        String::new()
    };
    let fields: String = records
        .iter()
        .enumerate()
        .map(|(i, r)| render_record_fields(i, r, catalog))
        .collect();

    let content = view! {
        <div>
            <div inner_html=banner />
            <form method="post" action="/reservations">
                <input type="hidden" name="count" value=count />
                <div inner_html=fields />
                <button type="submit">"Reservar"</button>
            </form>
            <a href="/reservations" class="back-link">"Cambiar número de reservas"</a>
        </div>
    }
    .to_html();
    render_page("Reservas de actividades", content)
}

fn render_summary_row(row: &ReservationRow) -> String {
    let r = &row.reservation;
    let mut cells = String::new();

    if let Some(span) = row.date_span {
        let date = calendar::format_dmy(r.date);
        let span = span.to_string();
        cells.push_str(&view! { <td class="grupo" rowspan=span>{date}</td> }.to_html());
    }
    if let Some(span) = row.instructor_span {
        let instructor = r.instructor.clone();
        let span = span.to_string();
        cells.push_str(&view! { <td class="grupo" rowspan=span>{instructor}</td> }.to_html());
    }

    let activity = r.activity.clone();
    let duration = format!("{} min", r.duration_minutes);
    let participants = r.participants.to_string();
    let notes = reservations::title_case(&r.notes);
    cells.push_str(&view! { <td>{activity}</td> }.to_html());
    cells.push_str(&view! { <td class="numero">{duration}</td> }.to_html());
    cells.push_str(&view! { <td class="numero">{participants}</td> }.to_html());
    cells.push_str(&view! { <td>{notes}</td> }.to_html());

    view! { <tr inner_html=cells /> }.to_html()
}

pub(crate) fn render_reservation_summary(summary: &Summary) -> String {
    let rows_html: String = summary.rows.iter().map(render_summary_row).collect();
    let totals = &summary.totals;
    let duration = format!("{} minutos", totals.duration_minutes);
    let participants = totals.participants.to_string();
    let activities = totals.distinct_activities.to_string();
    let instructors = totals.distinct_instructors.to_string();

    let content = view! {
        <div>
            <table>
                <thead>
                    <tr>
                        <th>"Fecha"</th>
                        <th>"Instructor"</th>
                        <th>"Actividad"</th>
                        <th>"Duración"</th>
                        <th>"Participantes"</th>
                        <th>"Observaciones"</th>
                    </tr>
                </thead>
                <tbody inner_html=rows_html />
            </table>
            <div class="totales">
                <p><strong>"Duración total: "</strong>{duration}</p>
                <p><strong>"Participantes totales: "</strong>{participants}</p>
                <p><strong>"Actividades distintas: "</strong>{activities}</p>
                <p><strong>"Instructores distintos: "</strong>{instructors}</p>
            </div>
            <a href="/reservations" class="back-link">"Nuevas reservas"</a>
        </div>
    }
    .to_html();
    render_page("Resumen de reservas", content)
}

// Inventory

fn render_line_errors(errors: &[LineError]) -> String {
    let items: String = errors
        .iter()
        .map(|e| {
            let label = format!("Línea {}:", e.line);
            let text = e.text.clone();
            view! { <li class="linea-error"><strong>{label}</strong><span>{text}</span></li> }
                .to_html()
        })
        .collect();

    view! {
        <div class="resultado resultado-error">
            <h2>"Se encontraron líneas con errores"</h2>
            <ul inner_html=items />
        </div>
    }
    .to_html()
}

fn render_products(products: &[ProductAggregate]) -> String {
    if products.is_empty() {
        return view! { <p class="empty">"No se encontraron registros."</p> }.to_html();
    }

    let items: String = products
        .iter()
        .map(|p| {
            let name = p.product.clone();
            let total = format!("Total: {}", inventory::units(p.total_quantity()));
            let locations: String = p
                .locations()
                .iter()
                .map(|group| {
                    let text = group.describe();
                    view! { <li class="ubicacion">{text}</li> }.to_html()
                })
                .collect();
            view! {
                <div class="producto-item">
                    <h3>{name}</h3>
                    <p class="producto-total">{total}</p>
                    <ul inner_html=locations />
                </div>
            }
            .to_html()
        })
        .collect();

    view! {
        <div class="resultado resultado-exito">
            <h2>"Inventario procesado"</h2>
            <div inner_html=items />
        </div>
    }
    .to_html()
}

pub(crate) fn render_inventory(logs: &str, result: InventoryView) -> String {
    let result_html = match result {
        InventoryView::Empty => String::new(),
        InventoryView::Rejected(message) => error_box(&message),
        InventoryView::Parsed(ParseOutcome::Error { errors_by_line }) => {
            render_line_errors(&errors_by_line)
        }
        InventoryView::Parsed(ParseOutcome::Success { products }) => render_products(&products),
    };
    let logs = escape_text(logs);

    let content = view! {
        <div>
            <div class="info-box">
                <h3>"Formato"</h3>
                <p>
                    "Una línea por registro: "
                    <code>"producto#pasillo#estantería#cantidad"</code>
                </p>
                <p>"Máximo 50000 bytes, 1000 líneas y 150 caracteres por línea."</p>
            </div>
            <form method="post" action="/inventory">
                <textarea name="logs" rows="12" placeholder="Producto1#2#3#10" inner_html=logs />
                <button type="submit">"Procesar logs"</button>
            </form>
            <div inner_html=result_html />
        </div>
    }
    .to_html();
    render_page("Gestor de logs de inventario", content)
}

// Refunds

fn field_error(
    errors: &BTreeMap<RefundField, &'static str>,
    field: RefundField,
) -> (&'static str, String) {
    match errors.get(&field) {
        Some(message) => ("campo-invalido", error_message(message)),
        None => ("", String::new()),
    }
}

fn text_field(
    label: &str,
    name: &str,
    value: &str,
    placeholder: &str,
    error: (&'static str, String),
) -> String {
    let (class, message) = error;
    let label = label.to_string();
    let name = name.to_string();
    let value = value.to_string();
    let placeholder = placeholder.to_string();

    view! {
        <div class="form-group">
            <label>
                {label}
                <input type="text" name=name value=value placeholder=placeholder class=class />
            </label>
            <div inner_html=message />
        </div>
    }
    .to_html()
}

pub(crate) fn render_refund_form(
    form: &RefundForm,
    errors: &BTreeMap<RefundField, &'static str>,
) -> String {
    let banner = if errors.is_empty() {
        String::new()
    } else {
        error_box("Revise los campos marcados en rojo.")
    };

    let incident_labels: Vec<String> = IncidentType::ALL
        .iter()
        .map(|t| t.label().to_string())
        .collect();
    let incident_options = render_options(
        &incident_labels,
        &form.incident_type,
        "Seleccione un tipo de incidencia",
    );
    let (incident_class, incident_error) = field_error(errors, RefundField::IncidentType);
    let (description_class, description_error) = field_error(errors, RefundField::Description);
    let description = escape_text(&form.description);

    let fields = [
        text_field(
            "Nombre del socio",
            "member_name",
            &form.member_name,
            "",
            field_error(errors, RefundField::MemberName),
        ),
        text_field(
            "Número de membresía",
            "membership_id",
            &form.membership_id,
            "SOC123456",
            field_error(errors, RefundField::MembershipId),
        ),
        text_field(
            "Fecha de la actividad",
            "activity_date",
            &form.activity_date,
            "10/01/2025",
            field_error(errors, RefundField::ActivityDate),
        ),
        text_field(
            "Hora de inicio",
            "start_time",
            &form.start_time,
            "10:30",
            field_error(errors, RefundField::StartTime),
        ),
        text_field(
            "Importe a reembolsar (€)",
            "amount",
            &form.amount,
            "25.50",
            field_error(errors, RefundField::Amount),
        ),
        text_field(
            "Días laborables para resolución",
            "resolution_days",
            &form.resolution_days,
            "2.5",
            field_error(errors, RefundField::ResolutionDays),
        ),
    ]
    .concat();

    let content = view! {
        <div>
            <div inner_html=banner />
            <form method="post" action="/refunds">
                <div inner_html=fields />
                <div class="form-group">
                    <label>
                        "Tipo de incidencia"
                        <select
                            name="incident_type"
                            class=incident_class
                            inner_html=incident_options
                        />
                    </label>
                    <div inner_html=incident_error />
                </div>
                <div class="form-group">
                    <label>
                        "Descripción de la incidencia"
                        <textarea
                            name="description"
                            rows="5"
                            maxlength="400"
                            class=description_class
                            inner_html=description
                        />
                    </label>
                    <div inner_html=description_error />
                </div>
                <button type="submit">"Solicitar reembolso"</button>
            </form>
        </div>
    }
    .to_html();
    render_page("Sistema de reembolsos", content)
}

pub(crate) fn render_refund_summary(summary: &RefundSummary) -> String {
    let items = [
        ("Socio", summary.member_name.clone()),
        ("Membresía", summary.membership_id.clone()),
        ("Fecha de la actividad", summary.activity_date_text.clone()),
        ("Hora de inicio", summary.start_time.clone()),
        ("Tipo de incidencia", summary.incident_type.label().to_string()),
        ("Importe", format!("{} €", summary.amount)),
        (
            "Fecha límite de resolución",
            format!("{} a las {}", summary.deadline.display_date(), DEADLINE_CUTOFF),
        ),
        ("Descripción", summary.description.clone()),
    ];
    let mut items_html: String = items
        .into_iter()
        .map(|(label, value)| {
            view! {
                <div class="resumen-item">
                    <strong>{label}</strong>
                    <span class="valor">{value}</span>
                </div>
            }
            .to_html()
        })
        .collect();

    if summary.deadline.fractional_hours > 0.0 {
        let note = format!(
            "Incluye {:.1} horas adicionales, que no desplazan la fecha límite.",
            summary.deadline.fractional_hours
        );
        items_html.push_str(&view! { <p class="nota">{note}</p> }.to_html());
    }

    let content = view! {
        <div>
            <div class="resumen" inner_html=items_html />
            <a href="/refunds" class="back-link">"Nueva solicitud"</a>
        </div>
    }
    .to_html();
    render_page("Solicitud de reembolso registrada", content)
}
