//! Refund requests: per-field and cross-field validation, then the
//! resolution deadline in working days.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::calendar::{self, DateError};

const MAX_NAME_CHARS: usize = 150;
const MAX_DESCRIPTION_CHARS: usize = 400;
const MAX_DAYS_IN_PAST: i64 = 30;
const OPENING_MINUTES: u32 = 9 * 60;
const CLOSING_MINUTES: u32 = 18 * 60;
const MIN_AMOUNT_CENTS: u64 = 500;
const MAX_AMOUNT_CENTS: u64 = 20_000;
const MIN_RESOLUTION_TENTHS: u64 = 5;
const MAX_RESOLUTION_TENTHS: u64 = 100;
/// Hours in a working day, used for the fractional part of resolution days.
const WORKING_HOURS_PER_DAY: f64 = 8.0;

/// Time of day paired with every deadline in the summary.
pub const DEADLINE_CUTOFF: &str = "09:00";

static MEMBERSHIP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^SOC[0-9]{6}$").expect("Valid regex pattern"));
static NUMERIC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("Valid regex pattern")
});
static AMOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").expect("Valid regex pattern"));
static DAYS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9])?$").expect("Valid regex pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentType {
    ClassCancelled,
    FaultyEquipment,
    InstructorAbsent,
    Overbooking,
    Other,
}

impl IncidentType {
    pub const ALL: [IncidentType; 5] = [
        IncidentType::ClassCancelled,
        IncidentType::FaultyEquipment,
        IncidentType::InstructorAbsent,
        IncidentType::Overbooking,
        IncidentType::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IncidentType::ClassCancelled => "Cancelación de clase",
            IncidentType::FaultyEquipment => "Equipamiento defectuoso",
            IncidentType::InstructorAbsent => "Instructor ausente",
            IncidentType::Overbooking => "Sobreventa de plazas",
            IncidentType::Other => "Otros",
        }
    }
}

impl FromStr for IncidentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IncidentType::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or(())
    }
}

/// Raw refund form values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefundForm {
    pub member_name: String,
    pub membership_id: String,
    pub activity_date: String,
    pub start_time: String,
    pub incident_type: String,
    pub amount: String,
    pub resolution_days: String,
    pub description: String,
}

impl RefundForm {
    fn trimmed(&self) -> RefundForm {
        RefundForm {
            member_name: self.member_name.trim().to_string(),
            membership_id: self.membership_id.trim().to_string(),
            activity_date: self.activity_date.trim().to_string(),
            start_time: self.start_time.trim().to_string(),
            incident_type: self.incident_type.trim().to_string(),
            amount: self.amount.trim().to_string(),
            resolution_days: self.resolution_days.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RefundField {
    MemberName,
    MembershipId,
    ActivityDate,
    StartTime,
    IncidentType,
    Amount,
    ResolutionDays,
    Description,
}

/// Money in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(pub u64);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Resolution time in tenths of a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResolutionDays(pub u64);

impl ResolutionDays {
    pub fn whole_days(self) -> u32 {
        u32::try_from(self.0 / 10).unwrap_or(u32::MAX)
    }

    /// Fractional part expressed in working hours (`2.5` days gives 4.0).
    pub fn fractional_hours(self) -> f64 {
        (self.0 % 10) as f64 / 10.0 * WORKING_HOURS_PER_DAY
    }
}

impl fmt::Display for ResolutionDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Parses an unsigned decimal literal into an integer scaled by
/// `10^scale`. The caller guarantees at most `scale` decimals.
fn parse_scaled(raw: &str, scale: u32) -> Option<u64> {
    let (int_part, frac_part) = raw.split_once('.').unwrap_or((raw, ""));
    let int: u64 = int_part.parse().ok()?;
    let mut frac: u64 = if frac_part.is_empty() {
        0
    } else {
        frac_part.parse().ok()?
    };
    for _ in frac_part.len()..scale as usize {
        frac *= 10;
    }
    int.checked_mul(10u64.pow(scale))?.checked_add(frac)
}

pub const ERR_NAME_REQUIRED: &str = "El nombre del socio es requerido";
pub const ERR_NAME_LENGTH: &str = "El nombre no puede superar 150 caracteres";
pub const ERR_MEMBERSHIP_REQUIRED: &str = "El número de membresía es requerido";
pub const ERR_MEMBERSHIP_FORMAT: &str =
    "Formato incorrecto. Debe ser: SOC + 6 dígitos (ej: SOC123456)";
pub const ERR_DATE_REQUIRED: &str = "La fecha de la actividad es requerida";
pub const ERR_DATE_FORMAT: &str = "Formato de fecha incorrecto. Use DD/MM/YYYY";
pub const ERR_DATE_UNREADABLE: &str = "No se pudo procesar la fecha";
pub const ERR_DATE_INVALID: &str = "La fecha no es válida";
pub const ERR_DATE_FUTURE: &str = "La fecha no puede ser posterior al día actual";
pub const ERR_DATE_TOO_OLD: &str = "La fecha no puede ser anterior a 30 días desde hoy";
pub const ERR_TIME_REQUIRED: &str = "La hora de inicio es requerida";
pub const ERR_TIME_FORMAT: &str = "Formato incorrecto. Use HH:MM (24h)";
pub const ERR_TIME_HOURS: &str = "El horario de atención es de 9:00 a 18:00";
pub const ERR_TIME_WEEKEND: &str = "La actividad debe ser en día laboral (lunes-viernes)";
pub const ERR_INCIDENT_REQUIRED: &str = "Debe seleccionar un tipo de incidencia";
pub const ERR_INCIDENT_UNKNOWN: &str = "Tipo de incidencia no válido";
pub const ERR_AMOUNT_REQUIRED: &str = "El importe a reembolsar es requerido";
pub const ERR_AMOUNT_NOT_NUMERIC: &str = "El importe debe ser un número válido";
pub const ERR_AMOUNT_FORMAT: &str = "Formato incorrecto. Use números con máximo 2 decimales";
pub const ERR_AMOUNT_RANGE: &str = "El importe debe estar entre 5.00 y 200.00 euros";
pub const ERR_DAYS_REQUIRED: &str = "Los días para resolución son requeridos";
pub const ERR_DAYS_FORMAT: &str = "Formato incorrecto. Use números con máximo 1 decimal";
pub const ERR_DAYS_RANGE: &str = "Los días deben estar entre 0.5 y 10.0";
pub const ERR_DESCRIPTION_REQUIRED: &str = "La descripción de la incidencia es requerida";
pub const ERR_DESCRIPTION_BLANK: &str = "La descripción no puede contener solo espacios";
pub const ERR_DESCRIPTION_LENGTH: &str = "La descripción no puede superar 400 caracteres";

pub fn parse_amount(raw: &str) -> Result<Amount, &'static str> {
    if raw.is_empty() {
        return Err(ERR_AMOUNT_REQUIRED);
    }
    if !NUMERIC_PATTERN.is_match(raw) {
        return Err(ERR_AMOUNT_NOT_NUMERIC);
    }
    if !AMOUNT_PATTERN.is_match(raw) {
        return Err(ERR_AMOUNT_FORMAT);
    }
    parse_scaled(raw, 2)
        .filter(|c| (MIN_AMOUNT_CENTS..=MAX_AMOUNT_CENTS).contains(c))
        .map(Amount)
        .ok_or(ERR_AMOUNT_RANGE)
}

pub fn parse_resolution_days(raw: &str) -> Result<ResolutionDays, &'static str> {
    if raw.is_empty() {
        return Err(ERR_DAYS_REQUIRED);
    }
    if !DAYS_PATTERN.is_match(raw) {
        return Err(ERR_DAYS_FORMAT);
    }
    parse_scaled(raw, 1)
        .filter(|t| (MIN_RESOLUTION_TENTHS..=MAX_RESOLUTION_TENTHS).contains(t))
        .map(ResolutionDays)
        .ok_or(ERR_DAYS_RANGE)
}

/// Parses the activity date without the range checks. The date is still
/// needed for the weekday rule when it is out of range.
fn parse_activity_date(raw: &str) -> Result<NaiveDate, &'static str> {
    if raw.is_empty() {
        return Err(ERR_DATE_REQUIRED);
    }
    calendar::parse_dmy_lenient(raw).map_err(|e| match e {
        DateError::BadFormat => ERR_DATE_FORMAT,
        DateError::Unreadable => ERR_DATE_UNREADABLE,
        DateError::NotACalendarDate => ERR_DATE_INVALID,
    })
}

fn check_activity_window(date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if date > today {
        Err(ERR_DATE_FUTURE)
    } else if date < today - Duration::days(MAX_DAYS_IN_PAST) {
        Err(ERR_DATE_TOO_OLD)
    } else {
        Ok(())
    }
}

fn parse_start_time(raw: &str, date: Option<NaiveDate>) -> Result<u32, &'static str> {
    if raw.is_empty() {
        return Err(ERR_TIME_REQUIRED);
    }
    let minutes = calendar::parse_hhmm(raw).ok_or(ERR_TIME_FORMAT)?;
    if !(OPENING_MINUTES..=CLOSING_MINUTES).contains(&minutes) {
        return Err(ERR_TIME_HOURS);
    }
    match date {
        Some(d) if !calendar::is_working_day(d) => Err(ERR_TIME_WEEKEND),
        _ => Ok(minutes),
    }
}

/// Working-day deadline: `floor(days)` weekdays after the activity date.
/// The fractional part is reported in hours but does not move the date.
pub fn compute_deadline(activity_date: NaiveDate, days: ResolutionDays) -> Deadline {
    Deadline {
        date: calendar::add_working_days(activity_date, days.whole_days()),
        fractional_hours: days.fractional_hours(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deadline {
    pub date: NaiveDate,
    pub fractional_hours: f64,
}

impl Deadline {
    pub fn display_date(&self) -> String {
        calendar::format_dmy(self.date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefundSummary {
    pub member_name: String,
    pub membership_id: String,
    /// As entered.
    pub activity_date_text: String,
    pub activity_date: NaiveDate,
    pub start_time: String,
    pub incident_type: IncidentType,
    pub amount: Amount,
    pub resolution_days: ResolutionDays,
    /// Upper-cased.
    pub description: String,
    pub deadline: Deadline,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefundOutcome {
    /// Trimmed values for redisplay plus the first error of each failing field.
    Rejected {
        form: RefundForm,
        errors: BTreeMap<RefundField, &'static str>,
    },
    Accepted(RefundSummary),
}

pub fn process_refund(raw: &RefundForm, today: NaiveDate) -> RefundOutcome {
    let form = raw.trimmed();
    let mut errors = BTreeMap::new();

    let name_ok = if form.member_name.is_empty() {
        Err(ERR_NAME_REQUIRED)
    } else if form.member_name.chars().count() > MAX_NAME_CHARS {
        Err(ERR_NAME_LENGTH)
    } else {
        Ok(())
    };
    if let Err(e) = name_ok {
        errors.insert(RefundField::MemberName, e);
    }

    if form.membership_id.is_empty() {
        errors.insert(RefundField::MembershipId, ERR_MEMBERSHIP_REQUIRED);
    } else if !MEMBERSHIP_PATTERN.is_match(&form.membership_id) {
        errors.insert(RefundField::MembershipId, ERR_MEMBERSHIP_FORMAT);
    }

    let parsed_date = parse_activity_date(&form.activity_date);
    let activity_date = match parsed_date {
        Ok(d) => match check_activity_window(d, today) {
            Ok(()) => Some(d),
            Err(e) => {
                errors.insert(RefundField::ActivityDate, e);
                None
            }
        },
        Err(e) => {
            errors.insert(RefundField::ActivityDate, e);
            None
        }
    };

    // A weekend date is reported on the time field, even when the date
    // itself was rejected for being out of range.
    if let Err(e) = parse_start_time(&form.start_time, parsed_date.ok()) {
        errors.insert(RefundField::StartTime, e);
    }

    let incident = if form.incident_type.is_empty() {
        Err(ERR_INCIDENT_REQUIRED)
    } else {
        form.incident_type
            .parse::<IncidentType>()
            .map_err(|_| ERR_INCIDENT_UNKNOWN)
    };
    if let Err(e) = incident {
        errors.insert(RefundField::IncidentType, e);
    }

    let amount = parse_amount(&form.amount);
    if let Err(e) = amount {
        errors.insert(RefundField::Amount, e);
    }

    let days = parse_resolution_days(&form.resolution_days);
    if let Err(e) = days {
        errors.insert(RefundField::ResolutionDays, e);
    }

    let description = if raw.description.is_empty() {
        Err(ERR_DESCRIPTION_REQUIRED)
    } else if form.description.is_empty() {
        Err(ERR_DESCRIPTION_BLANK)
    } else if form.description.chars().count() > MAX_DESCRIPTION_CHARS {
        Err(ERR_DESCRIPTION_LENGTH)
    } else {
        Ok(form.description.to_uppercase())
    };
    if let Err(e) = description {
        errors.insert(RefundField::Description, e);
    }

    match (activity_date, incident, amount, days, description) {
        (Some(date), Ok(incident_type), Ok(amount), Ok(days), Ok(description))
            if errors.is_empty() =>
        {
            RefundOutcome::Accepted(RefundSummary {
                member_name: form.member_name,
                membership_id: form.membership_id,
                activity_date_text: form.activity_date,
                activity_date: date,
                start_time: form.start_time,
                incident_type,
                amount,
                resolution_days: days,
                description,
                deadline: compute_deadline(date, days),
            })
        }
        _ => RefundOutcome::Rejected { form, errors },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Weekday};

    /// A Wednesday.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    fn form(date: &str, time: &str) -> RefundForm {
        RefundForm {
            member_name: "Lucía Pérez".to_string(),
            membership_id: "SOC123456".to_string(),
            activity_date: date.to_string(),
            start_time: time.to_string(),
            incident_type: "Instructor ausente".to_string(),
            amount: "25.50".to_string(),
            resolution_days: "2.0".to_string(),
            description: "  la clase no se impartió  ".to_string(),
        }
    }

    fn accepted(outcome: RefundOutcome) -> RefundSummary {
        match outcome {
            RefundOutcome::Accepted(s) => s,
            RefundOutcome::Rejected { errors, .. } => panic!("unexpected errors: {:?}", errors),
        }
    }

    fn errors(outcome: RefundOutcome) -> BTreeMap<RefundField, &'static str> {
        match outcome {
            RefundOutcome::Rejected { errors, .. } => errors,
            RefundOutcome::Accepted(_) => panic!("expected errors"),
        }
    }

    #[test]
    fn test_accepted_on_wednesday() {
        let t = today();
        assert_eq!(t.weekday(), Weekday::Wed);
        let summary = accepted(process_refund(&form("12/03/2025", "10:30"), t));
        // Wednesday + 2 working days = Friday
        assert_eq!(summary.deadline.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(summary.deadline.display_date(), "14/03/2025");
        assert_eq!(summary.amount, Amount(2550));
        assert_eq!(summary.description, "LA CLASE NO SE IMPARTIÓ");
        assert_eq!(summary.incident_type, IncidentType::InstructorAbsent);
    }

    #[test]
    fn test_deadline_skips_weekend() {
        // Thursday 06/03 + 3 working days = Tuesday 11/03
        let mut f = form("06/03/2025", "09:00");
        f.resolution_days = "3".to_string();
        let summary = accepted(process_refund(&f, today()));
        assert_eq!(summary.deadline.display_date(), "11/03/2025");
    }

    #[test]
    fn test_fractional_days_do_not_move_deadline() {
        // Documented quirk, not contract: 2.5 days lands on the same date as 2.
        let mut f = form("12/03/2025", "10:30");
        f.resolution_days = "2.5".to_string();
        let summary = accepted(process_refund(&f, today()));
        assert_eq!(summary.deadline.display_date(), "14/03/2025");
        assert_eq!(summary.deadline.fractional_hours, 4.0);

        f.resolution_days = "0.5".to_string();
        let summary = accepted(process_refund(&f, today()));
        assert_eq!(summary.deadline.date, summary.activity_date);
    }

    #[test]
    fn test_membership_id() {
        let mut f = form("12/03/2025", "10:30");
        f.membership_id = "SOC12345".to_string();
        assert_eq!(
            errors(process_refund(&f, today())).get(&RefundField::MembershipId),
            Some(&ERR_MEMBERSHIP_FORMAT)
        );
        f.membership_id = "soc123456".to_string();
        assert!(errors(process_refund(&f, today())).contains_key(&RefundField::MembershipId));
        f.membership_id = "SOC123456".to_string();
        accepted(process_refund(&f, today()));
    }

    #[test]
    fn test_activity_date_window() {
        // Thursday, so that both boundary dates land on weekdays.
        let t = NaiveDate::from_ymd_opt(2025, 3, 13).unwrap();
        let thirty = t - Duration::days(30);
        let thirty_one = t - Duration::days(31);
        // Both fall on weekdays.
        assert!(calendar::is_working_day(thirty) && calendar::is_working_day(thirty_one));

        accepted(process_refund(&form(&calendar::format_dmy(thirty), "10:00"), t));
        let errs = errors(process_refund(&form(&calendar::format_dmy(thirty_one), "10:00"), t));
        assert_eq!(errs.get(&RefundField::ActivityDate), Some(&ERR_DATE_TOO_OLD));
        assert_eq!(errs.len(), 1);

        let tomorrow = calendar::format_dmy(t + Duration::days(1));
        let errs = errors(process_refund(&form(&tomorrow, "10:00"), t));
        assert_eq!(errs.get(&RefundField::ActivityDate), Some(&ERR_DATE_FUTURE));
    }

    #[test]
    fn test_activity_date_parse_errors() {
        let t = today();
        let cases = [
            ("", ERR_DATE_REQUIRED),
            ("2025-03-12", ERR_DATE_FORMAT),
            ("aa/03/2025", ERR_DATE_INVALID),
            ("30/02/2025", ERR_DATE_INVALID),
            ("010/03/02025", ERR_DATE_UNREADABLE),
            ("10 / 03 / 2025", ERR_DATE_UNREADABLE),
        ];
        for (raw, expected) in cases {
            let errs = errors(process_refund(&form(raw, "10:00"), t));
            assert_eq!(errs.get(&RefundField::ActivityDate), Some(&expected), "{raw:?}");
            assert!(!errs.contains_key(&RefundField::StartTime), "{raw:?}");
        }
    }

    #[test]
    fn test_weekend_reported_on_start_time() {
        let errs = errors(process_refund(&form("09/03/2025", "10:00"), today()));
        assert_eq!(errs.get(&RefundField::StartTime), Some(&ERR_TIME_WEEKEND));
        assert!(!errs.contains_key(&RefundField::ActivityDate));

        // Out-of-range weekend date: both fields fail.
        let errs = errors(process_refund(&form("02/02/2025", "10:00"), today()));
        assert_eq!(errs.get(&RefundField::ActivityDate), Some(&ERR_DATE_TOO_OLD));
        assert_eq!(errs.get(&RefundField::StartTime), Some(&ERR_TIME_WEEKEND));

        // Opening hours win over the weekday rule.
        let errs = errors(process_refund(&form("09/03/2025", "08:59"), today()));
        assert_eq!(errs.get(&RefundField::StartTime), Some(&ERR_TIME_HOURS));
    }

    #[test]
    fn test_start_time_bounds() {
        let t = today();
        accepted(process_refund(&form("12/03/2025", "09:00"), t));
        accepted(process_refund(&form("12/03/2025", "18:00"), t));
        accepted(process_refund(&form("12/03/2025", "9:15"), t));
        let errs = errors(process_refund(&form("12/03/2025", "18:01"), t));
        assert_eq!(errs.get(&RefundField::StartTime), Some(&ERR_TIME_HOURS));
        let errs = errors(process_refund(&form("12/03/2025", "25:00"), t));
        assert_eq!(errs.get(&RefundField::StartTime), Some(&ERR_TIME_FORMAT));
        let errs = errors(process_refund(&form("12/03/2025", ""), t));
        assert_eq!(errs.get(&RefundField::StartTime), Some(&ERR_TIME_REQUIRED));
    }

    #[test]
    fn test_amount() {
        assert_eq!(parse_amount("5"), Ok(Amount(500)));
        assert_eq!(parse_amount("200.00"), Ok(Amount(20_000)));
        assert_eq!(parse_amount("25.5"), Ok(Amount(2550)));
        assert_eq!(parse_amount(""), Err(ERR_AMOUNT_REQUIRED));
        assert_eq!(parse_amount("abc"), Err(ERR_AMOUNT_NOT_NUMERIC));
        assert_eq!(parse_amount("12,50"), Err(ERR_AMOUNT_NOT_NUMERIC));
        assert_eq!(parse_amount("25.555"), Err(ERR_AMOUNT_FORMAT));
        assert_eq!(parse_amount("1e2"), Err(ERR_AMOUNT_FORMAT));
        assert_eq!(parse_amount("-10"), Err(ERR_AMOUNT_FORMAT));
        assert_eq!(parse_amount("4.99"), Err(ERR_AMOUNT_RANGE));
        assert_eq!(parse_amount("200.01"), Err(ERR_AMOUNT_RANGE));
        assert_eq!(parse_amount("99999999999999999999999"), Err(ERR_AMOUNT_RANGE));
        assert_eq!(Amount(2550).to_string(), "25.50");
    }

    #[test]
    fn test_resolution_days() {
        assert_eq!(parse_resolution_days("0.5"), Ok(ResolutionDays(5)));
        assert_eq!(parse_resolution_days("10"), Ok(ResolutionDays(100)));
        assert_eq!(parse_resolution_days("10.0"), Ok(ResolutionDays(100)));
        assert_eq!(parse_resolution_days("0.4"), Err(ERR_DAYS_RANGE));
        assert_eq!(parse_resolution_days("10.1"), Err(ERR_DAYS_RANGE));
        assert_eq!(parse_resolution_days("2.25"), Err(ERR_DAYS_FORMAT));
        assert_eq!(parse_resolution_days("dos"), Err(ERR_DAYS_FORMAT));
        assert_eq!(parse_resolution_days(""), Err(ERR_DAYS_REQUIRED));
        assert_eq!(ResolutionDays(25).whole_days(), 2);
        assert_eq!(ResolutionDays(25).to_string(), "2.5");
    }

    #[test]
    fn test_incident_and_text_fields() {
        let mut f = form("12/03/2025", "10:30");
        f.incident_type = "Lluvia".to_string();
        f.member_name = "x".repeat(151);
        f.description = "   ".to_string();
        let errs = errors(process_refund(&f, today()));
        assert_eq!(errs.get(&RefundField::IncidentType), Some(&ERR_INCIDENT_UNKNOWN));
        assert_eq!(errs.get(&RefundField::MemberName), Some(&ERR_NAME_LENGTH));
        assert_eq!(errs.get(&RefundField::Description), Some(&ERR_DESCRIPTION_BLANK));

        f.incident_type.clear();
        f.member_name.clear();
        f.description = "d".repeat(401);
        let errs = errors(process_refund(&f, today()));
        assert_eq!(errs.get(&RefundField::IncidentType), Some(&ERR_INCIDENT_REQUIRED));
        assert_eq!(errs.get(&RefundField::MemberName), Some(&ERR_NAME_REQUIRED));
        assert_eq!(errs.get(&RefundField::Description), Some(&ERR_DESCRIPTION_LENGTH));
    }

    #[test]
    fn test_all_fields_reported_at_once() {
        let errs = errors(process_refund(&RefundForm::default(), today()));
        assert_eq!(errs.len(), 8);
    }

    #[test]
    fn test_rejected_form_is_trimmed() {
        let mut f = form("12/03/2025", "10:30");
        f.amount = " 1000 ".to_string();
        match process_refund(&f, today()) {
            RefundOutcome::Rejected { form, errors } => {
                assert_eq!(form.amount, "1000");
                assert_eq!(form.description, "la clase no se impartió");
                assert_eq!(errors.len(), 1);
            }
            RefundOutcome::Accepted(_) => panic!("expected rejection"),
        }
    }

    #[test]
    fn test_revalidation_is_idempotent() {
        let f = form("12/03/2025", "10:30");
        assert_eq!(process_refund(&f, today()), process_refund(&f, today()));
    }
}
