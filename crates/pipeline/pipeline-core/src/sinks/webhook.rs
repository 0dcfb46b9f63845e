//! Webhook sinks.

use std::time::Duration;

use anomaly_api::AlertingConfig;
use anomaly_spi::AnomalyReport;
use pipeline_spi::{AlertSink, PipelineError, Result};
use serde::Serialize;
use tracing::info;

use super::{slack_message, AlertPayload};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

fn client(sink: &str, timeout: Duration) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| PipelineError::delivery(sink, e))
}

fn require_url(sink: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(PipelineError::config(format!("webhook url is required for {sink} sink")));
    }
    Ok(())
}

fn post<T: Serialize>(client: &reqwest::blocking::Client, sink: &str, url: &str, body: &T) -> Result<()> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .map_err(|e| PipelineError::delivery(sink, e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(PipelineError::delivery(sink, format!("status {status}")));
    }
    info!(sink, status = status.as_u16(), "alert delivered");
    Ok(())
}

/// Posts the JSON alert payload to a generic webhook.
#[derive(Debug, Clone)]
pub struct HttpSink {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpSink {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        require_url("http", &url)?;
        Ok(Self {
            url,
            client: client("http", timeout)?,
        })
    }

    /// Create from configuration.
    pub fn from_config(config: &AlertingConfig) -> Result<Self> {
        Self::with_timeout(
            config.webhook_url.clone().unwrap_or_default(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AlertSink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    fn send(&self, report: &AnomalyReport) -> Result<()> {
        post(&self.client, self.name(), &self.url, &AlertPayload::from_report(report))
    }
}

#[derive(Debug, Serialize)]
struct SlackBody<'a> {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<&'a str>,
}

/// Posts a formatted message to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackSink {
    url: String,
    channel: Option<String>,
    client: reqwest::blocking::Client,
}

impl SlackSink {
    pub fn new(url: impl Into<String>, channel: Option<String>) -> Result<Self> {
        Self::with_timeout(url, channel, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        url: impl Into<String>,
        channel: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let url = url.into();
        require_url("slack", &url)?;
        Ok(Self {
            url,
            channel,
            client: client("slack", timeout)?,
        })
    }

    /// Create from configuration.
    pub fn from_config(config: &AlertingConfig) -> Result<Self> {
        Self::with_timeout(
            config.webhook_url.clone().unwrap_or_default(),
            config.channel.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }
}

impl AlertSink for SlackSink {
    fn name(&self) -> &str {
        "slack"
    }

    fn send(&self, report: &AnomalyReport) -> Result<()> {
        let body = SlackBody {
            text: slack_message(report),
            channel: self.channel.as_deref(),
        };
        post(&self.client, self.name(), &self.url, &body)
    }
}
