use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::data::record::IncomeStatement;

/// Blocking client for the income-statement endpoint.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Fetch all income statements for `ticker`.
    ///
    /// Transport failures, non-success statuses, and undecodable payloads are
    /// distinct errors; callers decide how to surface them. A failed fetch
    /// never yields a partial record set.
    pub fn income_statements(&self, ticker: &str, period: &str) -> Result<Vec<IncomeStatement>> {
        let url = format!("{}/api/v3/income-statement/{}", self.base_url, ticker);
        debug!(target: "api", "GET {} period={}", url, period);

        let response = self
            .client
            .get(&url)
            .query(&[("period", period), ("apikey", self.api_key.as_str())])
            .send()
            .with_context(|| format!("request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!(
                "API returned {} for {}: {}",
                status,
                ticker,
                truncate(body.trim(), 200)
            ));
        }

        let statements: Vec<IncomeStatement> = response
            .json()
            .with_context(|| format!("decoding income-statement response for {}", ticker))?;

        info!(
            target: "api",
            "fetched {} statements for {} (period={})",
            statements.len(),
            ticker,
            period
        );
        Ok(statements)
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
