use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;

use crate::{
    config, error, info,
    management::FileTokenStore,
    server::start_api_server,
    spotify::exchange::{
        AuthExchangeError, AuthExchangeFlow, AuthorizationCode, FlowHost, TokenExchanger,
    },
    success,
    types::{Token, TokenResponse},
    utils, warning,
};

/// Runs the complete OAuth 2.0 PKCE sign-in.
///
/// 1. **PKCE Setup**: generates a code verifier and its S256 challenge
/// 2. **Server Start**: launches the local redirect server with a fresh
///    [`AuthExchangeFlow`]
/// 3. **Browser Launch**: opens the authorization URL in the default browser
/// 4. **Exchange**: the flow exchanges the first redirected code and stores
///    the token in the token cache
/// 5. **Completion**: waits for the flow's completion signal, bounded by
///    [`config::auth_timeout`]
///
/// Failures and timeouts terminate the program with an error message.
pub async fn auth() {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let shutdown = CancellationToken::new();
    let (flow, completion) = AuthExchangeFlow::new(
        Box::new(PkceExchanger::new(code_verifier)),
        Box::new(FileTokenStore::default()),
        Box::new(CallbackHost::new(shutdown.clone())),
    );
    let flow = Arc::new(flow);

    let server_shutdown = shutdown.clone();
    let server = tokio::spawn(async move { start_api_server(flow, server_shutdown).await });

    let auth_url = match authorize_url(&code_challenge) {
        Ok(url) => url,
        Err(e) => {
            shutdown.cancel();
            error!("Invalid authorization URL: {}", e);
        }
    };

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let outcome = tokio::time::timeout(config::auth_timeout(), completion).await;
    shutdown.cancel();

    match server.await {
        Ok(Err(e)) => warning!("Redirect server stopped with an error: {}", e),
        Err(e) => warning!("Redirect server task failed: {}", e),
        Ok(Ok(())) => {}
    }

    match outcome {
        Ok(Ok(true)) => success!("Authentication successful!"),
        Ok(Ok(false)) => error!("Authentication failed."),
        Ok(Err(_)) => error!("Authentication flow ended without a result."),
        Err(_) => error!("Authentication timed out."),
    }
}

/// Builds the authorization URL for the given PKCE challenge.
pub fn authorize_url(code_challenge: &str) -> Result<Url, String> {
    let mut url = Url::parse(&config::spotify_apiauth_url()).map_err(|e| e.to_string())?;
    url.query_pairs_mut()
        .append_pair("client_id", &config::spotify_client_id())
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &config::spotify_redirect_uri())
        .append_pair("code_challenge", code_challenge)
        .append_pair("code_challenge_method", "S256")
        .append_pair("scope", &config::spotify_scope());
    Ok(url)
}

/// Refreshes an expired token through the token endpoint.
///
/// The new token keeps the previous refresh token when Spotify does not
/// rotate it.
pub async fn refresh_token(previous: &Token) -> Result<Token, AuthExchangeError> {
    let client_id = config::spotify_client_id();

    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", previous.refresh_token.as_str()),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await?;

    let json = read_token_response(res).await?;
    Ok(json.into_token(Some(&previous.refresh_token), utils::now_timestamp()))
}

/// Exchanges an authorization code for a token using the PKCE verifier.
///
/// Never retried: the code is single-use and a second attempt is rejected by
/// the server anyway.
pub async fn exchange_code_pkce(
    code: AuthorizationCode,
    verifier: &str,
) -> Result<Token, AuthExchangeError> {
    let client_id = config::spotify_client_id();
    let redirect_uri = config::spotify_redirect_uri();
    let code = code.into_secret();

    let client = Client::new();
    let res = client
        .post(&config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code.as_str()),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?;

    let json = read_token_response(res).await?;
    Ok(json.into_token(None, utils::now_timestamp()))
}

async fn read_token_response(res: reqwest::Response) -> Result<TokenResponse, AuthExchangeError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(AuthExchangeError::Rejected { status, body });
    }

    let body = res.text().await?;
    serde_json::from_str::<TokenResponse>(&body)
        .map_err(|e| AuthExchangeError::MalformedResponse(e.to_string()))
}

/// Exchanges codes against the Spotify token endpoint with a PKCE verifier.
pub struct PkceExchanger {
    verifier: String,
}

impl PkceExchanger {
    pub fn new(verifier: String) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl TokenExchanger for PkceExchanger {
    async fn exchange(&self, code: AuthorizationCode) -> Result<Token, AuthExchangeError> {
        exchange_code_pkce(code, &self.verifier).await
    }
}

/// Flow host for the terminal: the browser tab cannot be closed from here,
/// so hiding only reports progress and popping stops the redirect server.
pub struct CallbackHost {
    shutdown: CancellationToken,
}

impl CallbackHost {
    pub fn new(shutdown: CancellationToken) -> Self {
        Self { shutdown }
    }
}

impl FlowHost for CallbackHost {
    fn hide_browser(&self) {
        info!("Authorization code received, exchanging it for a token...");
    }

    fn pop_to_root(&self) {
        self.shutdown.cancel();
    }
}
