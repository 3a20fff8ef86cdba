//! Seating chart demo.
//!
//! Loads the configured venue, restores the previous session, picks the first
//! block of adjacent seats and prints what a renderer would show.
//!
//! ```text
//! cargo run --bin seatmap-demo -- 3
//! ```

use seatmap::presentation::{heat_map_legend, status_legend};
use seatmap::{Config, SeatingAction, SeatingStore, store_from_config};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(15);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("seatmap={},seatmap_runtime=warn", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        venue_source = %config.venue.source,
        storage = ?config.storage.dir,
        prices = %config.selection.prices,
        "Configuration loaded"
    );

    let store = store_from_config(&config)?;
    let prices = store.environment().prices.clone();

    let loaded = store
        .send_and_wait_for(
            SeatingAction::LoadVenue,
            |a| {
                matches!(
                    a,
                    SeatingAction::VenueLoaded { .. } | SeatingAction::VenueLoadFailed { .. }
                )
            },
            SETTLE_TIMEOUT,
        )
        .await?;
    if let SeatingAction::VenueLoadFailed { reason } = loaded {
        warn!(%reason, "Venue unavailable");
        println!("Could not load venue: {reason}");
        return Ok(());
    }

    let mut handle = store.send(SeatingAction::RestoreSession).await?;
    handle.wait_with_timeout(SETTLE_TIMEOUT).await?;

    let restored = store.state(|s| s.selection.len()).await;
    info!(restored, "Session restored");

    if let Some(run_length) = std::env::args().nth(1).and_then(|arg| arg.parse().ok()) {
        store.send(SeatingAction::SetRunLength { run_length }).await?;
    }

    let mut handle = store.send(SeatingAction::FindAdjacentSeats).await?;
    handle.wait_with_timeout(SETTLE_TIMEOUT).await?;

    print_chart(&store, &prices).await;

    store.shutdown(SETTLE_TIMEOUT).await?;
    Ok(())
}

async fn print_chart(store: &SeatingStore, prices: &seatmap::pricing::PriceTable) {
    let (venue_name, summary, details, notice, heat_map, failure) = store
        .state(|s| {
            (
                s.catalog().map(|c| c.venue().name.clone()).unwrap_or_default(),
                s.summary(prices),
                s.focused_details(prices),
                s.notice.clone(),
                s.preferences.heat_map,
                s.last_persistence_error.clone(),
            )
        })
        .await;

    println!("{venue_name}");
    println!("Select up to 8 seats for your event\n");

    let legend = if heat_map {
        heat_map_legend(prices)
    } else {
        status_legend()
    };
    let legend: Vec<String> = legend
        .into_iter()
        .map(|entry| format!("{} {}", entry.color, entry.label))
        .collect();
    println!("Legend: {}\n", legend.join(" | "));

    if let Some(notice) = notice {
        println!("! {notice}\n");
    }

    print!("{summary}");

    if let Some(details) = details {
        println!("\nSeat Details\n{details}");
    }

    if let Some(failure) = failure {
        println!("\nSelection not saved ({}): {}", failure.key, failure.message);
    }
}
