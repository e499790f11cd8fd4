//! Batch validation of activity reservations and the grouped summary shown
//! once every record in the batch is valid.

use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::{self, DateError};

pub const MIN_RESERVATIONS: usize = 1;
pub const MAX_RESERVATIONS: usize = 50;

const MIN_DURATION: i64 = 30;
const MAX_DURATION: i64 = 180;
const MIN_PARTICIPANTS: i64 = 1;
const MAX_PARTICIPANTS: i64 = 25;
const MAX_NOTES_CHARS: usize = 300;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BatchSizeError {
    #[error("El número de reservas debe estar entre 1 y 50.")]
    OutOfRange,
}

/// Parses the declared number of reservations. Anything that is not an
/// integer in `[1, 50]` is rejected with the same message.
pub fn parse_batch_size(raw: &str) -> Result<usize, BatchSizeError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (MIN_RESERVATIONS..=MAX_RESERVATIONS).contains(n))
        .ok_or(BatchSizeError::OutOfRange)
}

/// Raw field values of one reservation as submitted.
#[derive(Debug, Clone, Default)]
pub struct ReservationInput {
    pub date: String,
    pub activity: String,
    pub instructor: String,
    pub duration: String,
    pub participants: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Activity,
    Instructor,
    Duration,
    Notes,
    Participants,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: Field, message: &'static str) -> Self {
        Self { field, message }
    }
}

pub const ERR_DATE_REQUIRED: &str = "Fecha requerida";
pub const ERR_DATE_FORMAT: &str = "Formato inválido. Use dd/mm/yyyy";
pub const ERR_DATE_INVALID: &str = "Fecha inválida";
pub const ERR_DATE_PAST: &str = "La fecha no puede ser anterior a hoy";
pub const ERR_ACTIVITY: &str = "Debe seleccionar una actividad";
pub const ERR_INSTRUCTOR: &str = "Debe seleccionar un instructor";
pub const ERR_DURATION: &str = "La duración debe estar entre 30 y 180 minutos";
pub const ERR_NOTES: &str = "Las observaciones no pueden superar 300 caracteres";
pub const ERR_PARTICIPANTS: &str = "El número de participantes debe estar entre 1 y 25";

/// One submitted reservation after validation. Values are trimmed; numeric
/// fields keep their parsed value (if any) for redisplay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationRecord {
    /// `dd/mm/yyyy` when the date is valid, the trimmed input otherwise.
    pub date_text: String,
    pub date: Option<NaiveDate>,
    pub activity: String,
    pub instructor: String,
    pub duration: Option<i64>,
    pub participants: Option<i64>,
    pub notes: String,
    pub errors: Vec<FieldError>,
}

impl ReservationRecord {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Canonical sort key, only present for a valid date.
    pub fn iso_date(&self) -> Option<String> {
        self.date.map(calendar::format_iso)
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn has_date_error(&self) -> bool {
        self.has_error(Field::Date)
    }

    pub fn date_errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter(|e| e.field == Field::Date)
    }

    fn into_reservation(self) -> Option<Reservation> {
        if !self.is_valid() {
            return None;
        }
        Some(Reservation {
            date: self.date?,
            activity: self.activity,
            instructor: self.instructor,
            duration_minutes: u32::try_from(self.duration?).ok()?,
            participants: u32::try_from(self.participants?).ok()?,
            notes: self.notes,
        })
    }
}

/// A fully validated reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub date: NaiveDate,
    pub activity: String,
    pub instructor: String,
    pub duration_minutes: u32,
    pub participants: u32,
    pub notes: String,
}

fn parse_count(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

fn in_range(value: Option<i64>, min: i64, max: i64) -> bool {
    matches!(value, Some(v) if v != 0 && (min..=max).contains(&v))
}

/// Validates one record, collecting every applicable error in field order.
pub fn validate_record(input: &ReservationInput, today: NaiveDate) -> ReservationRecord {
    let mut errors = Vec::new();

    let raw_date = input.date.trim();
    let mut date_text = raw_date.to_string();
    let mut date = None;
    if raw_date.is_empty() {
        errors.push(FieldError::new(Field::Date, ERR_DATE_REQUIRED));
    } else {
        match calendar::parse_dmy_strict(raw_date) {
            Err(DateError::BadFormat) | Err(DateError::Unreadable) => {
                errors.push(FieldError::new(Field::Date, ERR_DATE_FORMAT));
            }
            Err(DateError::NotACalendarDate) => {
                errors.push(FieldError::new(Field::Date, ERR_DATE_INVALID));
            }
            Ok(d) if d < today => {
                errors.push(FieldError::new(Field::Date, ERR_DATE_PAST));
            }
            Ok(d) => {
                date_text = calendar::format_dmy(d);
                date = Some(d);
            }
        }
    }

    let activity = input.activity.trim().to_string();
    if activity.is_empty() {
        errors.push(FieldError::new(Field::Activity, ERR_ACTIVITY));
    }

    let instructor = input.instructor.trim().to_string();
    if instructor.is_empty() {
        errors.push(FieldError::new(Field::Instructor, ERR_INSTRUCTOR));
    }

    let duration = parse_count(input.duration.trim());
    if !in_range(duration, MIN_DURATION, MAX_DURATION) {
        errors.push(FieldError::new(Field::Duration, ERR_DURATION));
    }

    let notes = input.notes.trim().to_string();
    if notes.chars().count() > MAX_NOTES_CHARS {
        errors.push(FieldError::new(Field::Notes, ERR_NOTES));
    }

    let participants = parse_count(input.participants.trim());
    if !in_range(participants, MIN_PARTICIPANTS, MAX_PARTICIPANTS) {
        errors.push(FieldError::new(Field::Participants, ERR_PARTICIPANTS));
    }

    ReservationRecord {
        date_text,
        date,
        activity,
        instructor,
        duration,
        participants,
        notes,
        errors,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservationRow {
    pub reservation: Reservation,
    /// Rows spanned by the date cell; `None` when the row continues the
    /// previous row's date group.
    pub date_span: Option<usize>,
    /// Same for the instructor cell, grouped by (date, instructor).
    pub instructor_span: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Totals {
    pub duration_minutes: u32,
    pub participants: u32,
    pub distinct_activities: usize,
    pub distinct_instructors: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rows: Vec<ReservationRow>,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// At least one record failed; every record is returned for redisplay.
    Invalid(Vec<ReservationRecord>),
    Valid(Summary),
}

pub fn process_batch(inputs: &[ReservationInput], today: NaiveDate) -> BatchOutcome {
    let records: Vec<ReservationRecord> = inputs
        .iter()
        .map(|input| validate_record(input, today))
        .collect();

    if records.iter().any(|r| !r.is_valid()) {
        return BatchOutcome::Invalid(records);
    }

    let reservations: Vec<Reservation> = records
        .into_iter()
        .filter_map(ReservationRecord::into_reservation)
        .collect();
    BatchOutcome::Valid(summarize(reservations))
}

/// Sorts by (date, instructor) keeping input order for ties, then computes
/// the rowspans and totals.
pub fn summarize(mut reservations: Vec<Reservation>) -> Summary {
    reservations.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.instructor.cmp(&b.instructor))
    });

    let date_spans = group_spans(&reservations, |r| r.date);
    let instructor_spans = group_spans(&reservations, |r| (r.date, r.instructor.as_str()));

    let totals = Totals {
        duration_minutes: reservations.iter().map(|r| r.duration_minutes).sum(),
        participants: reservations.iter().map(|r| r.participants).sum(),
        distinct_activities: reservations
            .iter()
            .map(|r| r.activity.as_str())
            .collect::<HashSet<_>>()
            .len(),
        distinct_instructors: reservations
            .iter()
            .map(|r| r.instructor.as_str())
            .collect::<HashSet<_>>()
            .len(),
    };

    let rows = reservations
        .into_iter()
        .zip(date_spans.into_iter().zip(instructor_spans))
        .map(|(reservation, (date_span, instructor_span))| ReservationRow {
            reservation,
            date_span,
            instructor_span,
        })
        .collect();

    Summary { rows, totals }
}

/// For each item, `Some(run length)` if it starts a run of adjacent items
/// with an equal key, `None` if it continues one.
pub fn group_spans<'a, T, K, F>(items: &'a [T], key: F) -> Vec<Option<usize>>
where
    K: PartialEq,
    F: Fn(&'a T) -> K,
{
    let mut spans = vec![None; items.len()];
    let mut start = 0;
    while start < items.len() {
        let k = key(&items[start]);
        let mut end = start + 1;
        while end < items.len() && key(&items[end]) == k {
            end += 1;
        }
        spans[start] = Some(end - start);
        start = end;
    }
    spans
}

/// Lower-cases the text and upper-cases the first letter of every
/// whitespace-separated word.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
