#![allow(dead_code)]

use std::sync::Arc;

use bento_order::catalog::{MenuRow, SettingsRow};
use bento_order::clients::OrderingClient;
use bento_order::config::AppConfig;
use bento_order::framework::mock::{MockChatHost, MockClipboard, MockDataService};
use bento_order::lifecycle::OrderSystem;
use bento_order::model::PickupDetails;
use serde_json::json;

pub const TIMEOUT_MS: u64 = 200;

pub fn config() -> AppConfig {
    AppConfig {
        data_service_url: "http://data.invalid/api".to_string(),
        request_timeout_ms: TIMEOUT_MS,
        ..AppConfig::default()
    }
}

pub fn menu_rows() -> Vec<MenuRow> {
    serde_json::from_value(json!([
        {
            "id": "c1", "type": "套餐", "name": "Set A", "price": "110",
            "mainOptions": "Rice,Noodle", "soupOptions": "Soup|Tea"
        },
        { "id": "s1", "type": "單點", "name": "Iced tea", "price": "30" },
        { "id": "s2", "type": "單點", "name": "牛肉麵", "price": "150" }
    ]))
    .unwrap()
}

pub fn settings_rows(is_open: bool) -> Vec<SettingsRow> {
    serde_json::from_value(json!([{
        "name": "Auntie Lin",
        "isOpen": if is_open { "TRUE" } else { "FALSE" },
        "notices": "Cash only|Closed Mondays",
        "password": "1234"
    }]))
    .unwrap()
}

/// Scripts the startup load and starts a system over the mocks.
pub async fn start(
    data: &MockDataService,
    host: &MockChatHost,
    clipboard: &MockClipboard,
    is_open: bool,
) -> OrderSystem {
    data.expect_fetch_menu().return_ok(menu_rows());
    data.expect_fetch_settings().return_ok(settings_rows(is_open));
    OrderSystem::start(
        &config(),
        Arc::new(data.clone()),
        Arc::new(host.clone()),
        Arc::new(clipboard.clone()),
    )
    .await
    .unwrap()
}

/// Cart = [Set A x2 (main:Rice / soup:Soup)], pickup 2024-06-01 12:30.
pub async fn fill_cart(client: &OrderingClient) {
    client.open_item("c1").await.unwrap();
    client.set_main("Rice").await.unwrap();
    client.set_soup("Soup").await.unwrap();
    client.set_quantity(2).await.unwrap();
    client.commit_item().await.unwrap();
    client.open_checkout().await.unwrap();
    client
        .set_pickup(PickupDetails::new("2024-06-01", "12:30"))
        .await
        .unwrap();
}
