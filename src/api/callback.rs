use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{management::SessionManager, spotify, types::TokenResponse, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<TokenResponse>>>>,
) -> Html<&'static str> {
    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let session = match SessionManager::load().await {
        Ok(session) => session,
        Err(e) => {
            warning!("Cannot read credential store during callback: {}", e);
            return Html("<h4>Credential store unavailable.</h4>");
        }
    };

    let (client_id, client_secret) = session.client_pair().await;

    match spotify::auth::exchange_code(code, &client_id, &client_secret).await {
        Ok(token) => {
            let mut state = shared_state.lock().await;
            *state = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
