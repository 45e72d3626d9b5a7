use async_trait::async_trait;
use booking_core::{ArenaConfig, AvailabilitySnapshot, SyncBackend, SyncError};

/// Polling adapter for a remote JSON agenda endpoint (Sheets proxy,
/// Edge-Config style API, or anything speaking the same contract):
/// `GET` returns either the canonical `SlotKey -> {court, gourmet}` object
/// or raw spreadsheet rows; `POST` receives the canonical object and stores
/// it under its `slots` key. The bearer token, when the remote requires
/// one, lives here and nowhere else.
pub struct HttpBackend {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    free_marker: String,
}

impl HttpBackend {
    pub fn new(url: String, token: Option<String>) -> Self {
        HttpBackend {
            client: reqwest::Client::new(),
            url,
            token,
            free_marker: ArenaConfig::default().free_marker,
        }
    }
}

#[async_trait]
impl SyncBackend for HttpBackend {
    async fn fetch_snapshot(&self) -> Result<AvailabilitySnapshot, SyncError> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SyncError::BackendUnavailable(format!(
                "agenda endpoint answered {}",
                response.status()
            )));
        }
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        AvailabilitySnapshot::load(&payload, &self.free_marker)
            .map_err(|e| SyncError::BackendUnavailable(e.to_string()))
    }

    async fn persist(&self, snapshot: &AvailabilitySnapshot) -> Result<(), SyncError> {
        let mut request = self.client.post(&self.url).json(&snapshot.to_wire());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SyncError::BackendUnavailable(format!(
                "agenda endpoint rejected the write with {}",
                response.status()
            )));
        }
        Ok(())
    }
}
