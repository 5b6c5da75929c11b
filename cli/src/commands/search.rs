//! `sentra search` and `sentra suggest`.

use std::sync::Arc;
use std::time::Duration;

use catalog_core::search::{PageSection, SearchPhase};
use catalog_core::{Dropdown, Route, SearchBox, SearchPage};
use tracing::info;

use super::{CliError, Session};

const SUGGEST_TIMEOUT_SECS: u64 = 30;

/// Run the results-page search and print all three sections.
pub async fn page(session: &Session, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let route = Route::search(query).ok_or(CliError::EmptyQuery)?;
    info!(%route, "Searching");

    let page = SearchPage::new(Arc::clone(&session.api), session.media());
    page.load(query).await;

    let state = page.state();
    if let Some(message) = state.error {
        return Err(message.into());
    }
    println!("Search results for \"{}\"", state.query);
    for section in page.sections() {
        print!("{}", render_section(&section));
    }
    Ok(())
}

fn render_section(section: &PageSection) -> String {
    let mut out = format!("\n{} ({})\n", section.title, section.cards.len());
    if section.cards.is_empty() {
        out.push_str(&format!("  {}\n", section.empty_notice));
    }
    for card in &section.cards {
        out.push_str(&format!("  {}", card.title));
        if let Some(subtitle) = &card.subtitle {
            out.push_str(&format!(" | {subtitle}"));
        }
        out.push_str(&format!("  {} {}\n", card.link_label, card.route));
    }
    out
}

/// Type `query` into a live search box and print what its dropdown settles on.
pub async fn suggest(session: &Session, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let search = SearchBox::with_debounce(Arc::clone(&session.api), session.config.search_debounce);
    let mut state = search.subscribe();

    search.set_query(query).await;
    let settled = tokio::time::timeout(
        Duration::from_secs(SUGGEST_TIMEOUT_SECS),
        state.wait_for(|s| matches!(s.phase, SearchPhase::Idle | SearchPhase::Ready | SearchPhase::Failed)),
    )
    .await
    .is_ok();
    if !settled {
        search.unmount().await;
        return Err(CliError::SearchTimeout(SUGGEST_TIMEOUT_SECS).into());
    }

    print!("{}", render_dropdown(&search.dropdown()));
    search.unmount().await;
    Ok(())
}

fn render_dropdown(dropdown: &Dropdown) -> String {
    match dropdown {
        Dropdown::Hidden => "(nothing to show)\n".to_string(),
        Dropdown::Loading => "Loading...\n".to_string(),
        Dropdown::Error(message) => format!("{message}\n"),
        Dropdown::NoResults => "No results found.\n".to_string(),
        Dropdown::Sections(sections) => {
            let mut out = String::new();
            for section in sections {
                out.push_str(&format!("{}\n", section.title));
                for hit in &section.hits {
                    out.push_str(&format!("  {}  {}\n", hit.label, hit.route));
                }
            }
            out
        }
    }
}
