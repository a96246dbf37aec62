// 🌐 Market Fetcher - live market cap + remote/local table sources
//
// Endpoint contract: { "success": bool, "mcap": number }
// success == false means "no value available", not an error.

use crate::bracket::LiveValue;
use crate::session::{Change, ComparisonState};
use crate::table::{load_table_csv, parse_table_str, LoadReport};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MARKET_URL: &str = "https://api.oauth.dustlabs.com/pricing/marketcap";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode market response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("market response reported success but carried no usable `mcap`")]
    MissingValue,
}

/// Wire shape of the pricing endpoint
#[derive(Debug, Deserialize)]
pub struct MarketResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub mcap: Option<f64>,
}

impl MarketResponse {
    /// `Ok(None)` when the endpoint says it has no value
    pub fn into_live_value(self) -> Result<Option<LiveValue>, FetchError> {
        if !self.success {
            return Ok(None);
        }
        let mcap = self.mcap.ok_or(FetchError::MissingValue)?;
        LiveValue::new(mcap).map(Some).ok_or(FetchError::MissingValue)
    }
}

pub fn parse_market_response(body: &str) -> Result<Option<LiveValue>, FetchError> {
    let response: MarketResponse = serde_json::from_str(body)?;
    response.into_live_value()
}

pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

async fn get_text(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })
}

/// Fetch the current market cap. `Ok(None)` if the endpoint has no value.
pub async fn fetch_live_value(client: &Client, url: &str) -> Result<Option<LiveValue>, FetchError> {
    let body = get_text(client, url).await?;
    let value = parse_market_response(&body)?;

    match value {
        Some(v) => log::info!("Market cap from {}: {}", url, v.get()),
        None => log::warn!("Market endpoint {} reported no value", url),
    }
    Ok(value)
}

// ============================================================================
// TABLE SOURCE
// ============================================================================

/// Where the reference CSV lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    Path(PathBuf),
    Url(String),
}

impl TableSource {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            TableSource::Url(raw.to_string())
        } else {
            TableSource::Path(PathBuf::from(raw))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TableSource::Path(p) => p.display().to_string(),
            TableSource::Url(u) => u.clone(),
        }
    }
}

impl std::str::FromStr for TableSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(TableSource::parse(s))
    }
}

pub async fn fetch_table(client: &Client, source: &TableSource) -> Result<LoadReport> {
    let report = match source {
        TableSource::Path(path) => load_table_csv(path)
            .with_context(|| format!("Failed to load table from {}", path.display()))?,
        TableSource::Url(url) => {
            let text = get_text(client, url)
                .await
                .with_context(|| format!("Failed to download table from {}", url))?;
            parse_table_str(&text).with_context(|| format!("Failed to parse table from {}", url))?
        }
    };

    log::info!("Table from {}: {}", source.describe(), report.summary());
    Ok(report)
}

// ============================================================================
// SOURCES
// ============================================================================

/// HTTP client plus both input locations
#[derive(Debug, Clone)]
pub struct Sources {
    client: Client,
    market_url: String,
    table: TableSource,
}

impl Sources {
    pub fn new(market_url: &str, table: TableSource, timeout: Duration) -> Result<Self> {
        Ok(Sources {
            client: build_client(timeout)?,
            market_url: market_url.to_string(),
            table,
        })
    }

    pub fn table_source(&self) -> &TableSource {
        &self.table
    }

    pub async fn live_value(&self) -> Result<Option<LiveValue>> {
        fetch_live_value(&self.client, &self.market_url)
            .await
            .with_context(|| format!("Failed to fetch market cap from {}", self.market_url))
    }

    pub async fn table(&self) -> Result<LoadReport> {
        fetch_table(&self.client, &self.table).await
    }

    /// Fetch both inputs concurrently and feed them into `state`.
    ///
    /// A table failure is returned as an error. A market failure is only
    /// logged: the state simply has no live value and shows nothing.
    pub async fn refresh_into(&self, state: &mut ComparisonState) -> Result<Change> {
        let (live, table) = tokio::join!(self.live_value(), self.table());

        let report = table?;
        let live = live.unwrap_or_else(|e| {
            log::error!("{:#}", e);
            None
        });

        let table_change = state.set_table(Arc::new(report.table));
        let live_change = state.set_live_value(live);

        if table_change == Change::Updated || live_change == Change::Updated {
            Ok(Change::Updated)
        } else {
            Ok(Change::Unchanged)
        }
    }
}
