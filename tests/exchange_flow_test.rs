use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use sporlfeed::{
    spotify::exchange::{
        AuthExchangeError, AuthExchangeFlow, AuthorizationCode, FlowHost, FlowState,
        NavigationOutcome, TokenExchanger, TokenStore, extract_code,
    },
    types::Token,
};
use tokio::sync::oneshot::error::TryRecvError;

const REDIRECT: &str = "http://127.0.0.1:8888/callback";

fn token(access: &str) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: "refresh".to_string(),
        scope: "user-read-private".to_string(),
        expires_in: 3600,
        obtained_at: 1_000,
    }
}

/// Records every code it is asked to exchange.
#[derive(Default)]
struct FakeExchanger {
    codes: Arc<Mutex<Vec<String>>>,
    fail: bool,
    delay: Duration,
}

#[async_trait]
impl TokenExchanger for FakeExchanger {
    async fn exchange(&self, code: AuthorizationCode) -> Result<Token, AuthExchangeError> {
        self.codes.lock().unwrap().push(code.into_secret());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(AuthExchangeError::Rejected {
                status: StatusCode::BAD_REQUEST,
                body: "invalid_grant".to_string(),
            });
        }
        Ok(token("access"))
    }
}

#[derive(Default)]
struct MemoryStore {
    tokens: Arc<Mutex<Vec<Token>>>,
    fail: bool,
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn save(&self, token: Token) -> Result<(), AuthExchangeError> {
        if self.fail {
            return Err(AuthExchangeError::Store("disk full".to_string()));
        }
        self.tokens.lock().unwrap().push(token);
        Ok(())
    }
}

#[derive(Default)]
struct FakeHost {
    hidden: Arc<AtomicUsize>,
    popped: Arc<AtomicUsize>,
}

impl FlowHost for FakeHost {
    fn hide_browser(&self) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
    }

    fn pop_to_root(&self) {
        self.popped.fetch_add(1, Ordering::SeqCst);
    }
}

struct Recorder {
    codes: Arc<Mutex<Vec<String>>>,
    tokens: Arc<Mutex<Vec<Token>>>,
    hidden: Arc<AtomicUsize>,
    popped: Arc<AtomicUsize>,
}

fn flow_with(
    exchanger: FakeExchanger,
    store: MemoryStore,
) -> (
    AuthExchangeFlow,
    tokio::sync::oneshot::Receiver<bool>,
    Recorder,
) {
    let host = FakeHost::default();
    let recorder = Recorder {
        codes: Arc::clone(&exchanger.codes),
        tokens: Arc::clone(&store.tokens),
        hidden: Arc::clone(&host.hidden),
        popped: Arc::clone(&host.popped),
    };
    let (flow, completion) =
        AuthExchangeFlow::new(Box::new(exchanger), Box::new(store), Box::new(host));
    (flow, completion, recorder)
}

#[tokio::test]
async fn test_navigation_without_code_never_exchanges() {
    let (flow, mut completion, recorder) =
        flow_with(FakeExchanger::default(), MemoryStore::default());

    for url in [
        "https://accounts.spotify.com/authorize?client_id=abc&response_type=code",
        "https://accounts.spotify.com/login",
        "http://127.0.0.1:8888/callback?state=xyz",
        "http://127.0.0.1:8888/callback?codes=1&scode=2&code_verifier=3",
        "http://127.0.0.1:8888/callback?code=",
        "not a url",
    ] {
        assert_eq!(flow.on_navigation(url).await, NavigationOutcome::Continue);
    }

    assert!(recorder.codes.lock().unwrap().is_empty());
    assert_eq!(flow.state().await, FlowState::AwaitingRedirect);
    assert_eq!(recorder.hidden.load(Ordering::SeqCst), 0);
    assert!(matches!(completion.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_code_is_exchanged_once_and_stored() {
    let (flow, completion, recorder) = flow_with(FakeExchanger::default(), MemoryStore::default());

    let outcome = flow
        .on_navigation(&format!("{}?state=xyz&code=abc123", REDIRECT))
        .await;

    assert_eq!(outcome, NavigationOutcome::Completed(true));
    assert_eq!(*recorder.codes.lock().unwrap(), vec!["abc123".to_string()]);
    assert_eq!(*recorder.tokens.lock().unwrap(), vec![token("access")]);
    assert_eq!(recorder.hidden.load(Ordering::SeqCst), 1);
    assert_eq!(recorder.popped.load(Ordering::SeqCst), 1);
    assert_eq!(flow.state().await, FlowState::Completed(true));
    assert_eq!(completion.await, Ok(true));
}

#[tokio::test]
async fn test_later_redirects_are_ignored() {
    let (flow, completion, recorder) = flow_with(FakeExchanger::default(), MemoryStore::default());

    let first = flow.on_navigation(&format!("{}?code=abc123", REDIRECT)).await;
    let second = flow.on_navigation(&format!("{}?code=def456", REDIRECT)).await;
    let third = flow.on_navigation(REDIRECT).await;

    assert_eq!(first, NavigationOutcome::Completed(true));
    assert_eq!(second, NavigationOutcome::Ignored);
    assert_eq!(third, NavigationOutcome::Ignored);
    assert_eq!(*recorder.codes.lock().unwrap(), vec!["abc123".to_string()]);
    assert_eq!(recorder.tokens.lock().unwrap().len(), 1);
    assert_eq!(recorder.popped.load(Ordering::SeqCst), 1);
    assert_eq!(completion.await, Ok(true));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_redirects_exchange_once() {
    let exchanger = FakeExchanger {
        delay: Duration::from_secs(1),
        ..Default::default()
    };
    let (flow, completion, recorder) = flow_with(exchanger, MemoryStore::default());
    let flow = Arc::new(flow);

    let a = tokio::spawn({
        let flow = Arc::clone(&flow);
        async move { flow.on_navigation(&format!("{}?code=abc123", REDIRECT)).await }
    });
    let b = tokio::spawn({
        let flow = Arc::clone(&flow);
        async move { flow.on_navigation(&format!("{}?code=abc123", REDIRECT)).await }
    });

    let outcomes = [a.await.unwrap(), b.await.unwrap()];

    let completed = outcomes
        .iter()
        .filter(|o| **o == NavigationOutcome::Completed(true))
        .count();
    let ignored = outcomes
        .iter()
        .filter(|o| **o == NavigationOutcome::Ignored)
        .count();
    assert_eq!(completed, 1);
    assert_eq!(ignored, 1);
    assert_eq!(recorder.codes.lock().unwrap().len(), 1);
    assert_eq!(completion.await, Ok(true));
}

#[tokio::test(start_paused = true)]
async fn test_dropped_navigation_still_completes_flow() {
    let exchanger = FakeExchanger {
        delay: Duration::from_secs(2),
        ..Default::default()
    };
    let (flow, completion, recorder) = flow_with(exchanger, MemoryStore::default());

    // The handler gives up while the exchange is in flight
    let abandoned = tokio::time::timeout(
        Duration::from_millis(500),
        flow.on_navigation(&format!("{}?code=abc123", REDIRECT)),
    )
    .await;
    assert!(abandoned.is_err());

    let notified = tokio::time::timeout(Duration::from_secs(60), completion)
        .await
        .expect("completion must fire after the handler was dropped");
    assert_eq!(notified, Ok(true));

    assert_eq!(flow.state().await, FlowState::Completed(true));
    assert_eq!(recorder.tokens.lock().unwrap().len(), 1);
    assert_eq!(recorder.popped.load(Ordering::SeqCst), 1);

    let later = flow.on_navigation(&format!("{}?code=abc123", REDIRECT)).await;
    assert_eq!(later, NavigationOutcome::Ignored);
    assert_eq!(recorder.codes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_exchange_completes_without_retry() {
    let exchanger = FakeExchanger {
        fail: true,
        ..Default::default()
    };
    let (flow, completion, recorder) = flow_with(exchanger, MemoryStore::default());

    let outcome = flow.on_navigation(&format!("{}?code=abc123", REDIRECT)).await;
    assert_eq!(outcome, NavigationOutcome::Completed(false));
    assert_eq!(completion.await, Ok(false));

    // A fresh code after the failure does not start another exchange
    let retry = flow.on_navigation(&format!("{}?code=def456", REDIRECT)).await;
    assert_eq!(retry, NavigationOutcome::Ignored);

    assert_eq!(recorder.codes.lock().unwrap().len(), 1);
    assert!(recorder.tokens.lock().unwrap().is_empty());
    assert_eq!(recorder.popped.load(Ordering::SeqCst), 1);
    assert_eq!(flow.state().await, FlowState::Completed(false));
}

#[tokio::test]
async fn test_store_failure_reports_failure() {
    let store = MemoryStore {
        fail: true,
        ..Default::default()
    };
    let (flow, completion, _recorder) = flow_with(FakeExchanger::default(), store);

    let outcome = flow.on_navigation(&format!("{}?code=abc123", REDIRECT)).await;

    assert_eq!(outcome, NavigationOutcome::Completed(false));
    assert_eq!(completion.await, Ok(false));
}

#[tokio::test]
async fn test_dropped_receiver_does_not_break_completion() {
    let (flow, completion, recorder) = flow_with(FakeExchanger::default(), MemoryStore::default());
    drop(completion);

    let outcome = flow.on_navigation(&format!("{}?code=abc123", REDIRECT)).await;

    assert_eq!(outcome, NavigationOutcome::Completed(true));
    assert_eq!(recorder.tokens.lock().unwrap().len(), 1);
}

#[test]
fn test_extract_code() {
    let code = extract_code("http://127.0.0.1:8888/callback?state=s&code=abc123");
    assert_eq!(code.map(AuthorizationCode::into_secret), Some("abc123".to_string()));

    // Percent-encoded values are decoded
    let code = extract_code("http://127.0.0.1:8888/callback?code=a%2Bb");
    assert_eq!(code.map(AuthorizationCode::into_secret), Some("a+b".to_string()));

    // Only the exact parameter name matches
    assert!(extract_code("http://127.0.0.1:8888/callback?auth_code=abc").is_none());
    assert!(extract_code("http://127.0.0.1:8888/callback?CODE=abc").is_none());
    assert!(extract_code("http://127.0.0.1:8888/callback?code=").is_none());
    assert!(extract_code("no url at all").is_none());
}

#[test]
fn test_authorization_code_debug_is_redacted() {
    let code = AuthorizationCode::new("super-secret");
    assert!(!format!("{:?}", code).contains("super-secret"));
}
