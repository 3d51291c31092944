use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config,
    types::{Credentials, TokenResponse},
};

/// Shared handle to the one credential session of a run.
pub type SharedSession = Arc<SessionManager>;

/// Owns the access/refresh token pair for the lifetime of the process.
///
/// All workers share a single session. Refreshing is guarded by a
/// generation counter: a caller that hit a 401 reports the generation it
/// observed, and only the first such report actually exchanges the refresh
/// token; late reports see a newer generation and return immediately. The
/// rotated credentials are persisted to the durable store before any caller
/// proceeds.
pub struct SessionManager {
    inner: Mutex<SessionState>,
}

struct SessionState {
    credentials: Credentials,
    generation: u64,
}

impl SessionManager {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: Mutex::new(SessionState {
                credentials,
                generation: 0,
            }),
        }
    }

    /// Loads the credential record from the durable store.
    pub async fn load() -> Result<Self, String> {
        let path = config::credentials_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let credentials: Credentials = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self::new(credentials))
    }

    /// Returns the current bearer token together with the refresh generation
    /// it belongs to.
    ///
    /// Fails when no access token is on file; the operator has to run the
    /// interactive `auth` flow first.
    pub async fn bearer(&self) -> Result<(String, u64), String> {
        let state = self.inner.lock().await;
        match &state.credentials.access_token {
            Some(token) => Ok((token.clone(), state.generation)),
            None => Err("no access token on file, run chartsync auth first".to_string()),
        }
    }

    /// Recovers from an authentication-expired response.
    ///
    /// `observed` is the generation the failing request was sent with. When
    /// the session has already moved past it another worker has refreshed in
    /// the meantime and there is nothing to do. Otherwise the refresh token
    /// is exchanged and the new credentials are written back to the store.
    ///
    /// A failed exchange is unrecoverable; the caller is expected to treat
    /// the error as fatal rather than retry.
    pub async fn recover_auth(&self, observed: u64) -> Result<(), String> {
        let mut state = self.inner.lock().await;
        if state.generation != observed {
            return Ok(());
        }

        let refresh_token = state
            .credentials
            .refresh_token
            .clone()
            .ok_or("no refresh token on file, run chartsync auth first".to_string())?;

        let token = request_refresh(
            &state.credentials.client_id,
            &state.credentials.client_secret,
            &refresh_token,
        )
        .await?;

        state.credentials.access_token = Some(token.access_token);
        if let Some(rt) = token.refresh_token {
            state.credentials.refresh_token = Some(rt);
        }
        state.generation += 1;

        persist(&state.credentials).await
    }

    /// Installs a freshly obtained token pair (interactive auth flow) and
    /// persists it.
    pub async fn store_token(&self, token: TokenResponse) -> Result<(), String> {
        let mut state = self.inner.lock().await;
        state.credentials.access_token = Some(token.access_token);
        if let Some(rt) = token.refresh_token {
            state.credentials.refresh_token = Some(rt);
        }
        state.generation += 1;

        persist(&state.credentials).await
    }

    pub async fn client_pair(&self) -> (String, String) {
        let state = self.inner.lock().await;
        (
            state.credentials.client_id.clone(),
            state.credentials.client_secret.clone(),
        )
    }

    /// Advances the refresh generation without touching the network or the
    /// store. Lets tests simulate a refresh completed by another worker.
    #[cfg(test)]
    pub async fn force_rotate(&self, access_token: &str) {
        let mut state = self.inner.lock().await;
        state.credentials.access_token = Some(access_token.to_string());
        state.generation += 1;
    }
}

/// Basic-auth header value for the token endpoint (`client_id:client_secret`).
pub fn basic_auth_value(client_id: &str, client_secret: &str) -> String {
    let pair = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", STANDARD.encode(pair.as_bytes()))
}

async fn request_refresh(
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<TokenResponse, String> {
    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .header(
            "Authorization",
            basic_auth_value(client_id, client_secret),
        )
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !res.status().is_success() {
        return Err(format!(
            "token refresh rejected with status {}",
            res.status()
        ));
    }

    res.json::<TokenResponse>().await.map_err(|e| e.to_string())
}

async fn persist(credentials: &Credentials) -> Result<(), String> {
    let path = config::credentials_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    let json = serde_json::to_string_pretty(credentials).map_err(|e| e.to_string())?;
    async_fs::write(path, json).await.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(access: Option<&str>, refresh: Option<&str>) -> Credentials {
        Credentials {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            access_token: access.map(str::to_string),
            refresh_token: refresh.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn bearer_without_token_is_an_error() {
        let session = SessionManager::new(credentials(None, None));
        assert!(session.bearer().await.is_err());
    }

    #[tokio::test]
    async fn stale_generation_skips_refresh() {
        let session = SessionManager::new(credentials(Some("expired"), None));
        let (_, generation) = session.bearer().await.unwrap();

        // another worker already rotated the token between this worker's 401
        // and its recovery call
        session.force_rotate("rotated").await;
        session.recover_auth(generation).await.unwrap();

        let (token, _) = session.bearer().await.unwrap();
        assert_eq!(token, "rotated");
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_is_fatal() {
        let session = SessionManager::new(credentials(Some("expired"), None));
        let (_, generation) = session.bearer().await.unwrap();
        assert!(session.recover_auth(generation).await.is_err());
    }

    #[test]
    fn basic_auth_value_encodes_pair() {
        assert_eq!(basic_auth_value("id", "secret"), "Basic aWQ6c2VjcmV0");
    }
}
