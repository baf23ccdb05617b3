//! Authorization code exchange flow.
//!
//! The sign-in page is shown in a browser; every request that reaches the
//! redirect URI is reported to [`AuthExchangeFlow::on_navigation`]. The first
//! one carrying a `code` query parameter ends the flow: the code is exchanged
//! for a token exactly once, the token is stored and the caller is notified
//! through the receiver returned by [`AuthExchangeFlow::new`].
//!
//! ```text
//! AwaitingRedirect --code--> CodeExtracted --> Exchanging --> Completed(success)
//! ```

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tokio::sync::{Mutex, oneshot};

use crate::{types::Token, warning};

/// Name of the query parameter carrying the authorization code.
pub const CODE_PARAM: &str = "code";

#[derive(Debug, thiserror::Error)]
pub enum AuthExchangeError {
    #[error("token endpoint unreachable: {0}")]
    Network(#[from] reqwest::Error),
    #[error("token endpoint rejected the request with {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("malformed token response: {0}")]
    MalformedResponse(String),
    #[error("failed to store token: {0}")]
    Store(String),
}

/// A single-use authorization code taken from the redirect URL.
///
/// The code cannot be cloned; handing it to the exchanger consumes it.
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn into_secret(self) -> String {
        self.0
    }
}

impl fmt::Debug for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthorizationCode(***)")
    }
}

/// Exchanges an authorization code for a token. Called at most once per flow.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn exchange(&self, code: AuthorizationCode) -> Result<Token, AuthExchangeError>;
}

/// Receives the token produced by a successful exchange.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn save(&self, token: Token) -> Result<(), AuthExchangeError>;
}

/// The surface hosting the sign-in page.
pub trait FlowHost: Send + Sync {
    /// The page has served its purpose once the code is known.
    fn hide_browser(&self);

    /// Return to whatever presented the sign-in page.
    fn pop_to_root(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    AwaitingRedirect,
    CodeExtracted,
    Exchanging,
    Completed(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// No code in the URL, still waiting for the redirect.
    Continue,
    /// The flow already left `AwaitingRedirect`; the event had no effect.
    Ignored,
    /// This event carried the code and the exchange finished.
    Completed(bool),
}

struct FlowInner {
    state: FlowState,
    completion: Option<oneshot::Sender<bool>>,
}

/// Parts shared between the flow and its exchange task.
struct FlowShared {
    inner: Mutex<FlowInner>,
    exchanger: Box<dyn TokenExchanger>,
    store: Box<dyn TokenStore>,
    host: Box<dyn FlowHost>,
}

impl FlowShared {
    async fn exchange_and_store(&self, code: AuthorizationCode) -> bool {
        match self.exchanger.exchange(code).await {
            Ok(token) => match self.store.save(token).await {
                Ok(()) => true,
                Err(e) => {
                    warning!("{}", e);
                    false
                }
            },
            Err(e) => {
                warning!("Token exchange failed: {}", e);
                false
            }
        }
    }

    /// Terminal transition. Only the first call has an effect.
    async fn complete(&self, success: bool) -> bool {
        let mut inner = self.inner.lock().await;
        if let FlowState::Completed(previous) = inner.state {
            return previous;
        }

        inner.state = FlowState::Completed(success);
        self.host.pop_to_root();
        if let Some(tx) = inner.completion.take() {
            // the receiver may be gone if the caller gave up waiting
            let _ = tx.send(success);
        }
        success
    }
}

pub struct AuthExchangeFlow {
    shared: Arc<FlowShared>,
}

impl AuthExchangeFlow {
    /// Creates a flow in `AwaitingRedirect` together with the receiver that
    /// resolves once with the outcome of the exchange.
    pub fn new(
        exchanger: Box<dyn TokenExchanger>,
        store: Box<dyn TokenStore>,
        host: Box<dyn FlowHost>,
    ) -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        let shared = FlowShared {
            inner: Mutex::new(FlowInner {
                state: FlowState::AwaitingRedirect,
                completion: Some(tx),
            }),
            exchanger,
            store,
            host,
        };
        (
            Self {
                shared: Arc::new(shared),
            },
            rx,
        )
    }

    pub async fn state(&self) -> FlowState {
        self.shared.inner.lock().await.state
    }

    /// Handles one navigation of the sign-in browser.
    ///
    /// The exchange runs on its own task. Dropping the returned future (e.g.
    /// the browser disconnects mid-request) does not stop it, so the flow
    /// still reaches `Completed` and the completion receiver still fires.
    pub async fn on_navigation(&self, url: &str) -> NavigationOutcome {
        let code = {
            let mut inner = self.shared.inner.lock().await;
            if inner.state != FlowState::AwaitingRedirect {
                return NavigationOutcome::Ignored;
            }

            let Some(code) = extract_code(url) else {
                return NavigationOutcome::Continue;
            };

            inner.state = FlowState::CodeExtracted;
            self.shared.host.hide_browser();
            inner.state = FlowState::Exchanging;
            code
        };

        // lock is released while the request is in flight
        let shared = Arc::clone(&self.shared);
        let exchange = tokio::spawn(async move {
            let success = shared.exchange_and_store(code).await;
            shared.complete(success).await
        });

        let success = match exchange.await {
            Ok(success) => success,
            Err(e) => {
                warning!("Token exchange task failed: {}", e);
                self.shared.complete(false).await
            }
        };

        NavigationOutcome::Completed(success)
    }
}

/// Returns the value of the first `code` query parameter, if any.
///
/// Other parameters are ignored and an empty value does not count.
pub fn extract_code(url: &str) -> Option<AuthorizationCode> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == CODE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .map(AuthorizationCode::new)
}
