//! HTTP client for the analysis service.

use std::time::Duration;

use boardlens_common::{AnalysisSettings, BoardlensError, BoardlensResult};

use crate::protocol::{AnalysisOutcome, ProcessImageRequest, ProcessImageResponse, ServiceStatus};

/// Seam between the scheduler and the analysis transport.
///
/// The production implementation is [`AnalysisClient`]; tests drive the
/// scheduler with in-memory implementations.
#[async_trait::async_trait]
pub trait Analyze: Send + Sync {
    /// Submit one encoded frame payload and await the validated outcome.
    async fn process_image(&self, payload: &str) -> BoardlensResult<AnalysisOutcome>;
}

/// JSON client for the remote analysis endpoint.
pub struct AnalysisClient {
    client: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    /// Client for the given base URL with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> BoardlensResult<Self> {
        Self::with_settings(&AnalysisSettings {
            base_url: base_url.into(),
            ..AnalysisSettings::default()
        })
    }

    /// Client configured from application settings.
    pub fn with_settings(settings: &AnalysisSettings) -> BoardlensResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| BoardlensError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe `GET /api/status` for diagnostics.
    pub async fn service_status(&self) -> BoardlensResult<ServiceStatus> {
        let url = format!("{}/api/status", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BoardlensError::analysis(format!("status probe failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(BoardlensError::analysis(format!(
                "status probe returned HTTP {status}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| BoardlensError::analysis(format!("malformed status body: {e}")))
    }
}

#[async_trait::async_trait]
impl Analyze for AnalysisClient {
    async fn process_image(&self, payload: &str) -> BoardlensResult<AnalysisOutcome> {
        let url = format!("{}/process_image", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ProcessImageRequest { image: payload })
            .send()
            .await
            .map_err(|e| BoardlensError::analysis(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoardlensError::analysis(format!(
                "analysis endpoint returned HTTP {status}"
            )));
        }

        let body: ProcessImageResponse = response
            .json()
            .await
            .map_err(|e| BoardlensError::analysis(format!("malformed response body: {e}")))?;

        if body.status != "success" {
            let detail = body.message.unwrap_or_else(|| body.status.clone());
            return Err(BoardlensError::analysis(format!(
                "analysis reported failure: {detail}"
            )));
        }

        Ok(AnalysisOutcome {
            detections: body
                .detections
                .into_iter()
                .map(|d| d.with_clamped_box())
                .collect(),
            processing_time_secs: body.processing_time,
        })
    }
}
