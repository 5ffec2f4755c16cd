//! Spreadsheet-style data service: catalog and settings reads, order-log
//! appends, and the settings patch used by the admin gate.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::catalog::{Catalog, MenuRow, SettingsRow};
use crate::composer::OrderLogRecord;
use crate::config::AppConfig;
use crate::model::ShopStatus;
use crate::session_actor::{NetworkError, NetworkStep};

use super::{bounded, encode_component};

const MENU_SHEET: &str = "Menu";
const SETTINGS_SHEET: &str = "Settings";
const ORDERS_SHEET: &str = "Orders";

#[derive(Debug, Error)]
pub enum DataServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered, but not with rows.
    #[error("data service unavailable: {0}")]
    Unavailable(String),
}

/// Remote storage behind the ordering session.
#[async_trait]
pub trait DataService: Send + Sync {
    async fn fetch_menu(&self) -> Result<Vec<MenuRow>, DataServiceError>;

    async fn fetch_settings(&self) -> Result<Vec<SettingsRow>, DataServiceError>;

    async fn append_order(&self, record: &OrderLogRecord) -> Result<(), DataServiceError>;

    /// Partial update of the settings row keyed by `vendor_name`.
    async fn patch_open_status(
        &self,
        vendor_name: &str,
        is_open: bool,
    ) -> Result<(), DataServiceError>;
}

/// Reads the menu and settings concurrently.
///
/// Settings fall back to [`ShopStatus::default`] when missing or failing; a
/// failed menu read is an error.
pub async fn load_catalog(
    data_service: &dyn DataService,
    timeout: Duration,
) -> Result<(Catalog, ShopStatus), NetworkError> {
    let (menu, settings) = tokio::join!(
        bounded(NetworkStep::CatalogLoad, timeout, data_service.fetch_menu()),
        bounded(NetworkStep::SettingsLoad, timeout, data_service.fetch_settings()),
    );

    let status = match settings {
        Ok(rows) => ShopStatus::from_rows(rows),
        Err(e) => {
            warn!(error = %e, "settings unavailable, using defaults");
            ShopStatus::default()
        }
    };
    let catalog = Catalog::from_rows(menu?);
    debug!(items = catalog.len(), ?status, "catalog loaded");
    Ok((catalog, status))
}

/// [`DataService`] over a SheetDB-style REST endpoint.
#[derive(Debug, Clone)]
pub struct SheetDbClient {
    base_url: String,
    client: reqwest::Client,
}

impl SheetDbClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataServiceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, DataServiceError> {
        Self::new(config.data_service_url.clone(), config.request_timeout())
    }

    async fn get_sheet<T>(&self, sheet: &str) -> Result<Vec<T>, DataServiceError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("sheet", sheet)])
            .send()
            .await?;
        let response = check_status(response).await?;
        let value: serde_json::Value = response.json().await?;
        if !value.is_array() {
            // A missing sheet comes back as 200 with an error object.
            return Err(DataServiceError::Unavailable(format!("{sheet} sheet: {value}")));
        }
        serde_json::from_value(value)
            .map_err(|e| DataServiceError::Unavailable(format!("{sheet} sheet: {e}")))
    }

    async fn send_json(
        &self,
        request: reqwest::RequestBuilder,
        body: &impl Serialize,
    ) -> Result<(), DataServiceError> {
        let response = request.json(body).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DataServiceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    warn!(status, body = %body, "data service error");
    Err(DataServiceError::Status { status, body })
}

#[async_trait]
impl DataService for SheetDbClient {
    #[instrument(skip(self))]
    async fn fetch_menu(&self) -> Result<Vec<MenuRow>, DataServiceError> {
        let rows: Vec<MenuRow> = self.get_sheet(MENU_SHEET).await?;
        debug!(rows = rows.len(), "menu fetched");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn fetch_settings(&self) -> Result<Vec<SettingsRow>, DataServiceError> {
        let rows: Vec<SettingsRow> = self.get_sheet(SETTINGS_SHEET).await?;
        debug!(rows = rows.len(), "settings fetched");
        Ok(rows)
    }

    #[instrument(skip(self, record), fields(total = record.total))]
    async fn append_order(&self, record: &OrderLogRecord) -> Result<(), DataServiceError> {
        let request = self
            .client
            .post(&self.base_url)
            .query(&[("sheet", ORDERS_SHEET)]);
        self.send_json(request, &json!({ "data": record })).await
    }

    #[instrument(skip(self))]
    async fn patch_open_status(
        &self,
        vendor_name: &str,
        is_open: bool,
    ) -> Result<(), DataServiceError> {
        let url = format!("{}/name/{}", self.base_url, encode_component(vendor_name));
        let request = self.client.patch(url).query(&[("sheet", SETTINGS_SHEET)]);
        let flag = if is_open { "TRUE" } else { "FALSE" };
        self.send_json(request, &json!({ "data": { "isOpen": flag } })).await
    }
}
