use std::{io, net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use reqwest::Url;
use tokio_util::sync::CancellationToken;

use crate::{api, config, spotify::exchange::AuthExchangeFlow};

const DEFAULT_CALLBACK_PATH: &str = "/callback";

/// Serves the redirect endpoint until `shutdown` is cancelled.
pub async fn start_api_server(
    flow: Arc<AuthExchangeFlow>,
    shutdown: CancellationToken,
) -> io::Result<()> {
    let app = Router::new()
        .route("/health", get(api::health))
        .route(
            &callback_path(&config::spotify_redirect_uri()),
            get(api::callback).layer(Extension(flow)),
        );

    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

/// Path component of the redirect URI, `/callback` when it has none.
pub fn callback_path(redirect_uri: &str) -> String {
    Url::parse(redirect_uri)
        .ok()
        .map(|url| url.path().to_string())
        .filter(|path| path != "/" && !path.is_empty())
        .unwrap_or_else(|| DEFAULT_CALLBACK_PATH.to_string())
}
