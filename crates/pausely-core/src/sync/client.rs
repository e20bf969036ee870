//! Best-effort upload of finalized sessions.
//!
//! The local session log is authoritative; an upload is attempted once
//! per stop when an auth token is present, and its outcome never feeds
//! back into local state. Failures are logged by the caller, not retried.
//! Sync success is not recorded against the local record either - a later
//! reconciliation pass cannot tell which sessions already reached the
//! server (known gap, kept as-is).

use reqwest::Client;
use serde_json::json;

use crate::error::SyncError;
use crate::session::SessionRecord;

pub struct SyncClient {
    api_url: String,
    client: Client,
}

impl SyncClient {
    /// `api_url` is the service base URL, without the trailing slash.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// POST the record to `{api_url}/work_sessions/` with bearer auth.
    /// 2xx means synced; anything else is a failure. Without a token no
    /// request goes out at all: the session is simply "not synced".
    pub async fn sync_session(
        &self,
        record: &SessionRecord,
        token: Option<&str>,
    ) -> Result<(), SyncError> {
        let Some(token) = token else {
            return Err(SyncError::Unavailable);
        };
        let body = json!({
            "start_time": record.start.to_rfc3339(),
            "end_time": record.end.to_rfc3339(),
            "mode": record.mode.as_str(),
            "work_duration": record.work_seconds,
            "pause_duration": record.pause_seconds,
            "work_cycles": record.work_cycles,
            "note": record.note,
        });

        let resp = self
            .client
            .post(format!("{}/work_sessions/", self.api_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::Failure(e.to_string()))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            Err(SyncError::Failure(format!("HTTP {status}: {text}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerMode;
    use chrono::{Duration, Utc};

    fn record() -> SessionRecord {
        let start = Utc::now();
        SessionRecord {
            user_id: Some("7".into()),
            start,
            end: start + Duration::seconds(300),
            mode: TimerMode::Auto,
            work_seconds: 0,
            pause_seconds: 0,
            work_cycles: 2,
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn sync_posts_expected_body_and_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/work_sessions/")
            .match_header("authorization", "Bearer tok-123")
            .match_body(mockito::Matcher::PartialJson(json!({
                "mode": "auto",
                "work_cycles": 2,
                "note": "",
            })))
            .with_status(201)
            .with_body("{}")
            .create_async()
            .await;

        let client = SyncClient::new(server.url());
        client
            .sync_session(&record(), Some("tok-123"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_token_means_unavailable_without_a_request() {
        // Nothing listens on this port; a request would fail differently.
        let client = SyncClient::new("http://127.0.0.1:1");
        let err = client.sync_session(&record(), None).await.unwrap_err();
        assert!(matches!(err, SyncError::Unavailable));
    }

    #[tokio::test]
    async fn server_error_is_a_sync_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/work_sessions/")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = SyncClient::new(server.url());
        let err = client
            .sync_session(&record(), Some("tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Failure(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_sync_failure() {
        // Nothing listens on this port.
        let client = SyncClient::new("http://127.0.0.1:1");
        let err = client
            .sync_session(&record(), Some("tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Failure(_)));
    }
}
