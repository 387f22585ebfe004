use chrono::Datelike;
use church_budget::{
    app::AppState,
    config::{database, load_config_or_default, settings},
    core::{aggregate, date, report},
    errors::Result,
    services::{Advisor, EventStore, GeminiAdvisor, HttpSyncBackend},
};
use dotenvy::dotenv;
use std::{path::Path, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load configuration, then apply environment overrides
    let config = settings::with_env_overrides(
        load_config_or_default(CONFIG_PATH)
            .inspect_err(|e| error!("Failed to load {}: {}", CONFIG_PATH, e))?,
    );

    // 4. Open the local database
    let database_url = &config.storage.database_url;
    if database_url == database::DEFAULT_DATABASE_URL {
        std::fs::create_dir_all(Path::new("data"))?;
    }
    let db = database::create_connection(database_url)
        .await
        .inspect_err(|e| error!("Failed to open database: {}", e))?;
    database::create_tables(&db).await?;

    // 5. Build the app state
    let remote = Arc::new(HttpSyncBackend::new(&config.sync)?);
    let mut state = AppState::load(EventStore::new(db), remote, &config.sync).await;
    if state.sync_status().sync_code.is_some() {
        match state.refresh_from_cloud().await {
            Ok(true) => info!("Local data refreshed from cloud"),
            Ok(false) => warn!("Cloud refresh skipped, working on local data"),
            Err(e) => warn!("Cloud refresh failed: {}", e),
        }
    }

    // 6. Dashboard summary
    let today = date::today_local();
    let stats = aggregate::dashboard_stats(state.events(), today.year());
    info!(
        "{} active events, total budget {}, {} in {}",
        stats.active_events,
        report::format_currency(stats.total_budget),
        report::format_currency(stats.year_total),
        today.year()
    );
    for bar in &stats.chart {
        info!("  {:<15} {}", bar.label, report::format_currency(bar.total));
    }

    let upcoming: Vec<_> = aggregate::sort_events_by_date(state.events())
        .into_iter()
        .filter(|event| matches!(aggregate::is_finished(event, today), Ok(false)))
        .collect();
    for event in &upcoming {
        match date::days_remaining(&event.date, today) {
            Ok(days) => info!(
                "{} on {} - {} days left, budget {}",
                event.name,
                date::format_event_date(&event.date).unwrap_or_else(|_| event.date.clone()),
                days,
                report::format_currency(aggregate::total_budget(event))
            ),
            Err(e) => warn!("Skipping event {}: {}", event.id, e),
        }
    }

    // 7. Optional advice for the next event
    if let (Some(api_key), Some(next)) = (settings::advisory_api_key(), upcoming.first()) {
        let advisor = GeminiAdvisor::new(
            config.advisory.clone(),
            Some(api_key),
            config.sync.request_timeout(),
        )?;
        info!("Advice for {}:\n{}", next.name, advisor.advise(next).await);
    }

    Ok(())
}
