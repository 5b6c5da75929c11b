//! `sentra activities ...`

use catalog_core::format::format_date;
use catalog_core::types::parse_datetime;
use catalog_core::{Activity, MediaKind};
use chrono::{DateTime, Utc};

use super::{CliError, Session};

fn print_activities(activities: &[Activity]) {
    if activities.is_empty() {
        println!("No activities found.");
    }
    for activity in activities {
        println!(
            "{:>4}  {:<10} {:<32} {}",
            activity.id,
            format_date(activity),
            activity.name,
            activity.location.as_deref().unwrap_or("-")
        );
    }
}

fn parse_bound(raw: &str) -> Result<DateTime<Utc>, CliError> {
    parse_datetime(raw).ok_or_else(|| CliError::InvalidDate(raw.to_string()))
}

pub async fn upcoming(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let store = session.load::<Activity>().await?;
    print_activities(&store.upcoming(Utc::now()).await);
    Ok(())
}

pub async fn past(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let store = session.load::<Activity>().await?;
    print_activities(&store.past(Utc::now()).await);
    Ok(())
}

pub async fn range(session: &Session, from: &str, to: &str) -> Result<(), Box<dyn std::error::Error>> {
    let start = parse_bound(from)?;
    let end = parse_bound(to)?;
    let store = session.load::<Activity>().await?;
    print_activities(&store.in_range(start, end).await);
    Ok(())
}

pub async fn show(session: &Session, id: u64) -> Result<(), Box<dyn std::error::Error>> {
    let activity = session.api.get::<Activity>(&id).await?;
    let photo = session.media().resolve_versioned(
        activity.photo.as_deref(),
        MediaKind::Activity,
        activity.updated_at.as_deref(),
    );

    println!("{}", activity.name);
    println!("  When:     {}", format_date(&activity));
    println!("  Who:      {}", activity.participants);
    if let Some(location) = &activity.location {
        println!("  Where:    {location}");
    }
    if let Some(description) = &activity.description {
        println!("  About:    {description}");
    }
    println!("  Photo:    {}", photo.src);
    Ok(())
}
