//! Lead and payment metrics over the published Google Sheets export.
//!
//! Columns are located by header name (case-insensitive, spaces or dashes
//! treated as underscores), so the sheet can be reordered without breaking
//! the dashboard. Rows without an email are ignored.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::domain::{AnalyticsError, Clock, SheetSource};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentBreakdown {
    pub success: usize,
    pub failed: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_leads: usize,
    pub unique_emails: usize,
    pub leads_today: usize,
    pub leads_last_7_days: usize,
    pub by_source: BTreeMap<String, usize>,
    pub by_role: BTreeMap<String, usize>,
    pub payments: PaymentBreakdown,
    pub revenue: f64,
    pub conversion_rate: f64,
    pub generated_at: DateTime<Utc>,
}

pub struct AnalyticsUseCase<'a, S: ?Sized, C> {
    pub sheet: &'a S,
    pub clock: C,
}

impl<S, C> AnalyticsUseCase<'_, S, C>
where
    S: SheetSource + ?Sized,
    C: Clock,
{
    pub async fn execute(&self) -> Result<DashboardMetrics, AnalyticsError> {
        let csv_text = self.sheet.fetch_csv().await?;
        compute_metrics(&csv_text, self.clock.now())
    }
}

enum PaymentState {
    Success,
    Failed,
    Pending,
}

fn payment_state(value: &str) -> Option<PaymentState> {
    match value.trim().to_lowercase().as_str() {
        "success" | "paid" | "completed" => Some(PaymentState::Success),
        "failed" | "failure" => Some(PaymentState::Failed),
        "need_time_to_confirm" | "pending" => Some(PaymentState::Pending),
        _ => None,
    }
}

pub fn compute_metrics(csv_text: &str, now: DateTime<Utc>) -> Result<DashboardMetrics, AnalyticsError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let columns: HashMap<String, usize> = reader
        .headers()
        .map_err(|err| AnalyticsError::Malformed(err.to_string()))?
        .iter()
        .enumerate()
        .map(|(index, name)| (normalize_header(name), index))
        .collect();
    if !columns.contains_key("email") {
        return Err(AnalyticsError::Malformed(
            "missing an email column".to_string(),
        ));
    }

    let today = now.date_naive();
    let week_ago = now - chrono::Duration::days(7);

    let mut total_leads = 0;
    let mut emails = HashSet::new();
    let mut leads_today = 0;
    let mut leads_last_7_days = 0;
    let mut by_source = BTreeMap::new();
    let mut by_role = BTreeMap::new();
    let mut payments = PaymentBreakdown::default();
    let mut revenue = 0.0;

    for record in reader.records() {
        let record = record.map_err(|err| AnalyticsError::Malformed(err.to_string()))?;
        let field = |name: &str| {
            columns
                .get(name)
                .and_then(|index| record.get(*index))
                .filter(|value| !value.is_empty())
        };

        let Some(email) = field("email") else {
            continue;
        };
        total_leads += 1;
        emails.insert(email.to_lowercase());

        if let Some(at) = field("timestamp").and_then(parse_timestamp) {
            if at.date_naive() == today {
                leads_today += 1;
            }
            if at > week_ago && at <= now {
                leads_last_7_days += 1;
            }
        }

        let source = field("source").unwrap_or("unknown").to_lowercase();
        *by_source.entry(source).or_insert(0) += 1;
        let role = field("role").unwrap_or("unknown").to_lowercase();
        *by_role.entry(role).or_insert(0) += 1;

        match field("payment_status").and_then(payment_state) {
            Some(PaymentState::Success) => {
                payments.success += 1;
                revenue += field("amount").and_then(parse_amount).unwrap_or(0.0);
            }
            Some(PaymentState::Failed) => payments.failed += 1,
            Some(PaymentState::Pending) => payments.pending += 1,
            None => {}
        }
    }

    let conversion_rate = if emails.is_empty() {
        0.0
    } else {
        round2(payments.success as f64 / emails.len() as f64 * 100.0)
    };

    Ok(DashboardMetrics {
        total_leads,
        unique_emails: emails.len(),
        leads_today,
        leads_last_7_days,
        by_source,
        by_role,
        payments,
        revenue: round2(revenue),
        conversion_rate,
        generated_at: now,
    })
}

fn normalize_header(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

// Accepts RFC 3339 and the formats Google Sheets exports by locale. Naive values are UTC.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(value, format) {
            return Some(at.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(day) = NaiveDate::parse_from_str(value, format) {
            return day.and_hms_opt(0, 0, 0).map(|at| at.and_utc());
        }
    }
    None
}

// "₹1,499.00" -> 1499.0
fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse().ok()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
