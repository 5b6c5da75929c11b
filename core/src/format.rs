//! id-ID display formatting.

use crate::types::Activity;

/// `15000` → `Rp 15.000`.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}Rp {grouped}")
}

/// Activity date as `d/m/yyyy`; the raw string when it does not parse.
pub fn format_date(activity: &Activity) -> String {
    activity.scheduled_time().map_or_else(
        || activity.scheduled_at.clone(),
        |t| t.format("%-d/%-m/%Y").to_string(),
    )
}
