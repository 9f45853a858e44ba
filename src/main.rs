//! Bootstrap binary: opens the database, seeds the configured accounts on
//! first run, and logs the headline figures (treasury, provisions, and the
//! current month's budget).

use chrono::Utc;
use compta_core::config;
use compta_core::core::{account, account::BalanceScope, budget};
use compta_core::errors::Result;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Connect and make sure the schema exists
    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 4. Seed initial accounts from config.toml when present
    match config::accounts::load_default_config() {
        Ok(account_config) => {
            config::accounts::seed_initial_accounts(&db, &account_config).await?;
        }
        Err(e) => warn!("No usable config.toml, skipping account seeding: {e}"),
    }

    // 5. Headline figures
    let treasury = account::total_balance(&db, BalanceScope::Treasury).await?;
    let provisioned = account::total_balance(&db, BalanceScope::Provisions).await?;
    let this_month = Utc::now().date_naive();
    let breakdown = budget::monthly_breakdown(&db, this_month).await?;

    info!(%treasury, %provisioned, "account totals");
    info!(
        month = %this_month.format("%Y-%m"),
        provisions = %breakdown.provisions,
        amortizations = %breakdown.amortizations,
        net = %breakdown.net(),
        "monthly budget"
    );

    Ok(())
}
