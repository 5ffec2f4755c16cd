//! Demo entry point: wires the library against the configured data service,
//! without a chat host, and walks one order through the pipeline.
//!
//! Outside a chat app the order goes out through the deep-link fallback, which
//! this binary just logs.

use std::sync::Arc;

use bento_order::catalog::Category;
use bento_order::clients::{DetachedHost, NoClipboard, SheetDbClient};
use bento_order::config::AppConfig;
use bento_order::lifecycle::tracing::setup_tracing;
use bento_order::lifecycle::OrderSystem;
use bento_order::model::PickupDetails;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AppConfig::load().map_err(|e| e.to_string())?;
    info!(data_service = %config.data_service_url, "Starting ordering session");

    let data_service = Arc::new(SheetDbClient::from_config(&config).map_err(|e| e.to_string())?);
    let system = OrderSystem::start(
        &config,
        data_service,
        Arc::new(DetachedHost),
        Arc::new(NoClipboard),
    )
    .await
    .map_err(|e| e.to_string())?;

    let client = &system.ordering_client;
    let state = client.snapshot().await.map_err(|e| e.to_string())?;
    for notice in &state.status().notices {
        info!(%notice, "Notice");
    }
    let Some(item) = state.catalog().items(Category::All).first().map(|i| (*i).clone()) else {
        info!("Menu is empty, nothing to order");
        return system.shutdown().await.map_err(|e| e.to_string());
    };

    let span = tracing::info_span!("demo_order", item = %item.name);
    let result = async {
        client.open_item(&item.id).await?;
        if let Some(main) = item.main_options.first() {
            client.set_main(main).await?;
        }
        if let Some(soup) = item.soup_options.first() {
            client.set_soup(soup).await?;
        }
        client.commit_item().await?;
        client.open_checkout().await?;
        let pickup = PickupDetails::new(state.pickup().date.clone(), "12:00");
        client.set_pickup(pickup).await?;
        client.submit().await
    }
    .instrument(span)
    .await;

    match result {
        Ok(report) => {
            for alert in &report.alerts {
                info!(%alert, "Alert");
            }
            info!(
                delivered = ?report.delivered,
                cart_cleared = report.cart_cleared,
                "Demo order finished"
            );
        }
        Err(e) => error!(error = %e, retryable = e.is_retryable(), "Demo order failed"),
    }

    system.shutdown().await.map_err(|e| e.to_string())?;
    info!("Done");
    Ok(())
}
