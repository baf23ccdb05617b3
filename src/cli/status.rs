use crate::{
    info,
    management::TokenManager,
    success, utils, warning,
};

pub async fn status() {
    let tokens = match TokenManager::load().await {
        Ok(tokens) => tokens,
        Err(e) => {
            warning!("Not signed in. Run sporlfeed auth\n Error: {}", e);
            return;
        }
    };

    let token = tokens.current_token();
    let expires_at = utils::format_timestamp(tokens.expires_at());

    if tokens.is_expired() {
        info!(
            "Access token expired at {}, it is refreshed on the next request.",
            expires_at
        );
    } else {
        success!("Signed in, access token valid until {}", expires_at);
    }

    info!("Scope: {}", token.scope);
    info!("Token cache: {}", tokens.path().display());
}
