use std::sync::Arc;

use axum::{
    Extension,
    extract::RawQuery,
    response::Html,
};
use reqwest::Url;

use crate::{
    config,
    spotify::exchange::{AuthExchangeFlow, NavigationOutcome},
    warning,
};

/// Reports every request to the redirect URI to the exchange flow.
pub async fn callback(
    RawQuery(query): RawQuery,
    Extension(flow): Extension<Arc<AuthExchangeFlow>>,
) -> Html<&'static str> {
    let url = redirect_url(&config::spotify_redirect_uri(), query.as_deref());

    if let Some(reason) = denial_reason(&url) {
        warning!("Authorization was not granted: {}", reason);
    }

    match flow.on_navigation(&url).await {
        NavigationOutcome::Completed(true) => {
            Html("<h2>Authentication successful.</h2><p>Close this browser window.</p>")
        }
        NavigationOutcome::Completed(false) => Html("<h4>Login failed.</h4>"),
        NavigationOutcome::Continue => Html("<h4>Missing authorization code.</h4>"),
        NavigationOutcome::Ignored => Html("<h4>Sign-in was already handled.</h4>"),
    }
}

/// Rebuilds the URL the browser navigated to from the redirect URI and the
/// request's raw query.
pub fn redirect_url(redirect_uri: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{}?{}", redirect_uri, q),
        _ => redirect_uri.to_string(),
    }
}

fn denial_reason(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == "error")
        .map(|(_, value)| value.into_owned())
}
