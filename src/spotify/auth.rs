use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    Res, config, error,
    management::{SessionManager, basic_auth_value},
    server::start_api_server,
    success,
    types::TokenResponse,
    utils, warning,
};

/// Initiates the interactive authorization-code flow.
///
/// Starts the local callback server, opens the consent URL in the user's
/// browser and waits for the callback handler to exchange the authorization
/// code. The obtained token pair is persisted to the credential store,
/// where subsequent runs pick it up.
///
/// The client id and secret must already be present in the credential
/// store; the flow only fills in the token pair.
pub async fn auth(shared_state: Arc<Mutex<Option<TokenResponse>>>) {
    let session = match SessionManager::load().await {
        Ok(session) => session,
        Err(e) => {
            error!(
                "Cannot read credential store. Create {} with your client id and secret first.\n Error: {}",
                config::credentials_path().display(),
                e
            );
        }
    };

    let (client_id, _) = session.client_pair().await;

    // start API server
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    // Construct the authorization URL
    let auth_url = format!(
        "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&scope={scope}",
        auth_url = &config::spotify_apiauth_url(),
        client_id = utils::urlencode(&client_id),
        redirect_uri = utils::urlencode(&config::spotify_redirect_uri()),
        scope = utils::urlencode(&config::spotify_scope())
    );

    // Open the authorization URL in the default browser
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    // wait for callback to be hit
    let token = wait_for_token(shared_state).await;

    match token {
        Some(t) => {
            if let Err(e) = session.store_token(t).await {
                error!("Failed to save token to credential store: {}", e);
            }

            success!("Authentication successful!");
        }
        None => {
            error!("Authentication failed or timed out.");
        }
    }
}

/// Waits for the OAuth callback to complete and return a token.
///
/// Polls the shared state with a 60-second timeout while the callback
/// handler runs concurrently.
async fn wait_for_token(shared_state: Arc<Mutex<Option<TokenResponse>>>) -> Option<TokenResponse> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref() {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code for a token pair.
///
/// Uses the authorization-code grant with a Basic client credential header,
/// as the token endpoint requires for confidential clients.
pub async fn exchange_code(
    code: &str,
    client_id: &str,
    client_secret: &str,
) -> Res<TokenResponse> {
    let redirect_uri = config::spotify_redirect_uri();

    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .header("Authorization", basic_auth_value(client_id, client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(format!("token exchange rejected with status {}", res.status()).into());
    }

    Ok(res.json::<TokenResponse>().await?)
}
