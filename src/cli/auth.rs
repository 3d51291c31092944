use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{spotify, types::TokenResponse};

pub async fn auth(shared_state: Arc<Mutex<Option<TokenResponse>>>) {
    spotify::auth::auth(shared_state).await;
}
