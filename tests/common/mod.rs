use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use dataportal_auth::auth::PasswordEncoder;
use dataportal_auth::auth::password::Argon2Encoder;
use dataportal_auth::cache::CodeCache;
use dataportal_auth::config::{Config, TokenLifetimes};
use dataportal_auth::db::{MemoryUserStore, UserStore};
use dataportal_auth::email::MailTransport;
use dataportal_auth::error::AppError;
use dataportal_auth::models::User;
use dataportal_auth::state::{AppState, SharedState};

pub const EMAIL: &str = "student@hanyang.ac.kr";
pub const PASSWORD: &str = "password123";

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Captures outgoing mail instead of delivering it. Can be switched to fail.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail: Mutex<bool>,
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(
        &self,
        _from: &str,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if *self.fail.lock().unwrap() {
            return Err(AppError::Mail("relay unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

/// A running test server backed by in-memory stores.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// The value currently cached for `email` (signup code or temporary password).
    pub async fn cached_code(&self, email: &str) -> Option<String> {
        self.state.codes.get(email).await.unwrap()
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn login(&self, email: &str, password: &str, auto_login: bool) -> (Value, StatusCode) {
        self.post_json(
            "/api/v1/auth/login",
            &json!({ "email": email, "password": password, "auto_login": auto_login }),
        )
        .await
    }

    /// Log in as the seeded user, return the access token.
    pub async fn access_token(&self) -> String {
        let (body, status) = self.login(EMAIL, PASSWORD, false).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn reissue(&self, refresh_token: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/auth/reissue"))
            .header("cookie", format!("refresh_token={refresh_token}"))
            .send()
            .await
            .expect("reissue request failed")
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("post request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("put request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        jwt_secret: "test-jwt-secret-that-is-long-enough".to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        log_level: "warn".to_string(),
        mail_from: "portal@hanyang.ac.kr".to_string(),
        code_ttl: Duration::from_secs(300),
        tokens: TokenLifetimes::default(),
        smtp: None,
    }
}

/// Spawn a test app with one registered user (`EMAIL` / `PASSWORD`).
pub async fn spawn_app() -> TestApp {
    let users = Arc::new(MemoryUserStore::new());
    let hash = Argon2Encoder::new().unwrap().encode(PASSWORD).unwrap();
    users.insert(User::new(EMAIL, hash)).await.unwrap();

    let mailer = Arc::new(RecordingMailer::default());
    let state: SharedState = Arc::new(
        AppState::assemble(test_config(), users as Arc<dyn UserStore>, mailer.clone())
            .expect("Failed to assemble state"),
    );

    let app = dataportal_auth::build_app(state.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        state,
        mailer,
    }
}
