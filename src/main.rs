// src/main.rs
//
// Composition root demo: opens the store, shows the listing states for the
// default query, then exits.

use std::time::Duration;

use anyhow::{Context, Result};

use coursehub::application::state::AppState;
use coursehub::config::AppConfig;
use coursehub::domain::{Course, ResultState};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(60);
const QUIET_PERIOD: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. CONFIGURATION
    let config = AppConfig::from_env().context("invalid COURSEHUB_* configuration")?;

    // 2. APPLICATION STATE
    let state = AppState::build(&config).context("failed to open the course store")?;

    // 3. LISTING SCREEN
    let mut refreshing = state.catalog_sync.loading();
    let list = state.course_list();
    let mut states = list.observe();

    let settled = tokio::time::timeout(SETTLE_TIMEOUT, async {
        while let Some(current) = states.next().await {
            print_state(&current);
            if !current.is_loading() {
                break;
            }
        }

        // The listing starts a background resync when a remote catalog is configured
        if state.catalog_sync.is_enabled() {
            let _ = refreshing.changed().await;
            let _ = refreshing.wait_for(|busy| !*busy).await;
            state.course_service.flush().await;
            while let Ok(Some(current)) =
                tokio::time::timeout(QUIET_PERIOD, states.next()).await
            {
                print_state(&current);
            }
        }
    })
    .await;

    if settled.is_err() {
        log::warn!("Listing did not settle within {:?}", SETTLE_TIMEOUT);
    }

    // 4. SHUTDOWN
    list.shutdown().await;
    state.course_service.flush().await;

    let stats = state.database_stats()?;
    println!(
        "{} courses ({} favorites), {} bytes on disk",
        stats.course_count, stats.favorite_count, stats.size_bytes
    );

    Ok(())
}

fn print_state(state: &ResultState<Vec<Course>>) {
    match state {
        ResultState::Loading { data: None } => println!("[loading]"),
        ResultState::Loading { data: Some(rows) } => {
            println!("[refreshing] showing {} cached courses", rows.len())
        }
        ResultState::Success { data } if data.is_empty() => println!("[empty] no courses"),
        ResultState::Success { data } => {
            println!("[success] {} courses", data.len());
            for course in data {
                println!(
                    "  #{:<3} {:<45} {:<12} {:<9} {}",
                    course.id,
                    course.title,
                    course.level.label(),
                    course.formatted_duration(),
                    if course.is_favorite { "★" } else { "" }
                );
            }
        }
        ResultState::Error { message, data } => println!(
            "[error] {} ({} courses still shown)",
            message,
            data.as_ref().map(Vec::len).unwrap_or(0)
        ),
    }
}
