//! Stats Report Tool
//!
//! Prints the platform stats report (or trip analytics) as JSON.
//!
//! Run with: cargo run --bin stats_report -- [--analytics] [--top N] [--days N]

use std::sync::Arc;

use trip_admin_stats::{db, telemetry, Config, PgStatsStore, StatsService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    telemetry::init_tracing(config.log_format);

    let args: Vec<String> = std::env::args().collect();
    let analytics = args.iter().any(|a| a == "--analytics");

    let mut settings = config.stats_settings();
    if let Some(top) = flag_value(&args, "--top") {
        settings.top_n = top;
    }
    if let Some(days) = flag_value(&args, "--days") {
        settings.window_days = days;
    }

    let pool = db::connect(&config).await?;
    let store = PgStatsStore::new(pool.clone(), config.store_query_timeout);
    let stats = StatsService::new(Arc::new(store), settings);

    let output = if analytics {
        serde_json::to_string_pretty(&stats.trip_analytics().await?)?
    } else {
        serde_json::to_string_pretty(&stats.platform_stats().await?)?
    };

    println!("{}", output);

    pool.close().await;
    Ok(())
}

/// Parse the value following `flag`, if present and valid
fn flag_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}
