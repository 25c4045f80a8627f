//! Google Calendar API client.
//!
//! Token material lives in the data directory: `token.json` (access and
//! refresh tokens) and optionally `credentials.json` (OAuth client id and
//! secret, Google's "installed app" download format) for refreshing. There
//! is no interactive flow; obtaining the initial token is a setup step
//! outside this tool.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::SyncEntry;
use crate::error::SyncError;

const TOKEN_FILE: &str = "token.json";
const CREDENTIALS_FILE: &str = "credentials.json";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenFile {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CredentialsFile {
    installed: ClientCredentials,
}

#[derive(Debug, Clone, Deserialize)]
struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

/// OAuth material loaded from the data directory.
pub struct SyncAuth {
    dir: PathBuf,
    token: TokenFile,
    credentials: Option<ClientCredentials>,
}

impl SyncAuth {
    /// Load token material; fails when `token.json` is absent.
    pub fn load(dir: &Path) -> Result<Self, SyncError> {
        let token_path = dir.join(TOKEN_FILE);
        let contents =
            std::fs::read_to_string(&token_path).map_err(|_| SyncError::AuthenticationRequired)?;
        let token: TokenFile =
            serde_json::from_str(&contents).map_err(|_| SyncError::AuthenticationRequired)?;

        let credentials = std::fs::read_to_string(dir.join(CREDENTIALS_FILE))
            .ok()
            .and_then(|c| serde_json::from_str::<CredentialsFile>(&c).ok())
            .map(|c| c.installed);

        Ok(Self {
            dir: dir.to_path_buf(),
            token,
            credentials,
        })
    }

    fn access_token(&self) -> &str {
        &self.token.access_token
    }

    fn can_refresh(&self) -> bool {
        self.token.refresh_token.is_some() && self.credentials.is_some()
    }

    /// Exchange the refresh token for a new access token and persist it.
    async fn refresh(&mut self, http: &reqwest::Client) -> Result<(), SyncError> {
        let (refresh_token, creds) = match (&self.token.refresh_token, &self.credentials) {
            (Some(r), Some(c)) => (r.clone(), c.clone()),
            _ => {
                return Err(SyncError::TokenRefreshFailed(
                    "no refresh token or client credentials on disk".to_string(),
                ))
            }
        };

        let response = http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::TokenRefreshFailed(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        let access_token = body["access_token"]
            .as_str()
            .ok_or_else(|| SyncError::TokenRefreshFailed("no access_token in response".to_string()))?;

        self.token.access_token = access_token.to_string();
        let serialized = serde_json::to_string_pretty(&self.token)
            .map_err(|e| SyncError::TokenRefreshFailed(e.to_string()))?;
        std::fs::write(self.dir.join(TOKEN_FILE), serialized)
            .map_err(|e| SyncError::TokenRefreshFailed(e.to_string()))?;
        Ok(())
    }
}

/// Google Calendar client for pushing schedule entries.
pub struct CalendarClient {
    http: reqwest::Client,
    auth: SyncAuth,
    calendar_id: String,
    timezone: String,
}

impl CalendarClient {
    pub fn new(auth: SyncAuth, calendar_id: String, timezone: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            calendar_id,
            timezone,
        }
    }

    /// Create or update the calendar event for one entry, returning the
    /// calendar's event id.
    pub async fn upsert_event(&mut self, entry: &SyncEntry) -> Result<String, SyncError> {
        let body = json!({
            "summary": entry.summary,
            "description": entry.description,
            "start": {
                "dateTime": entry.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": self.timezone,
            },
            "end": {
                "dateTime": entry.end.format("%Y-%m-%dT%H:%M:%S").to_string(),
                "timeZone": self.timezone,
            },
            "colorId": entry.color_id,
        });

        let response = match &entry.existing_id {
            Some(id) => self.send_with_refresh(reqwest::Method::PATCH, &self.event_url(id), &body).await?,
            None => self.send_with_refresh(reqwest::Method::POST, &self.events_url(), &body).await?,
        };

        let status = response.status();
        if !status.is_success() {
            // A PATCH against an id deleted on the calendar side falls
            // back to creating a fresh event.
            if status == reqwest::StatusCode::NOT_FOUND && entry.existing_id.is_some() {
                let response = self
                    .send_with_refresh(reqwest::Method::POST, &self.events_url(), &body)
                    .await?;
                return Self::event_id(response).await;
            }
            return Err(SyncError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Self::event_id(response).await
    }

    async fn event_id(response: reqwest::Response) -> Result<String, SyncError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        let body: serde_json::Value = response.json().await?;
        body["id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| SyncError::Api {
                status: status.as_u16(),
                message: "no event id in response".to_string(),
            })
    }

    /// Send a request, refreshing the access token once on 401.
    async fn send_with_refresh(
        &mut self,
        method: reqwest::Method,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, SyncError> {
        let response = self
            .http
            .request(method.clone(), url)
            .bearer_auth(self.auth.access_token())
            .json(body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED && self.auth.can_refresh() {
            self.auth.refresh(&self.http).await?;
            let retried = self
                .http
                .request(method, url)
                .bearer_auth(self.auth.access_token())
                .json(body)
                .send()
                .await?;
            return Ok(retried);
        }

        Ok(response)
    }

    fn events_url(&self) -> String {
        format!("{CALENDAR_API}/calendars/{}/events", self.calendar_id)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), event_id)
    }
}
