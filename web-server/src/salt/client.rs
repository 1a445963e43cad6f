// web-server/src/salt/client.rs
use async_trait::async_trait;
use common::SaltApiConfig;
use reqwest::{header, Method};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

use super::{demo, first_return, Command, SaltApi, UpstreamError};

const AUTH_HEADER: &str = "X-Auth-Token";

/// reqwest-backed salt-api client holding one process-wide session token
pub struct SaltClient {
    http: reqwest::Client,
    base: Url,
    username: String,
    password: String,
    eauth: String,
    demo_mode: bool,
    session: RwLock<Option<String>>,
}

impl SaltClient {
    pub fn new(config: &SaltApiConfig) -> Result<Self, UpstreamError> {
        let base = Url::parse(&config.url).map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", config.url, e)))?;
        if base.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(config.url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base,
            username: config.user.clone(),
            password: config.password.clone(),
            eauth: config.eauth.clone(),
            demo_mode: config.demo_mode,
            session: RwLock::new(None),
        })
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    fn url(&self, path: &str) -> Result<Url, UpstreamError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::InvalidUrl(self.base.to_string()))?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Authenticate against `/login` and remember the session token
    pub async fn login(&self) -> Result<String, UpstreamError> {
        let response = self
            .http
            .post(self.url("/login")?)
            .header(header::ACCEPT, "application/json")
            .json(&json!({
                "username": self.username,
                "password": self.password,
                "eauth": self.eauth,
            }))
            .send()
            .await
            .map_err(|e| UpstreamError::Login(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Login(format!("{}: {}", status.as_u16(), body)));
        }

        let body: Value = response.json().await?;
        let token = first_return(&body)
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| UpstreamError::Decode("login response carries no token".to_string()))?
            .to_string();

        tracing::info!("Authenticated with Salt API at {}", self.base);
        *self.session.write().await = Some(token.clone());
        Ok(token)
    }

    /// Held token, logging in first when there is none. Two callers racing
    /// here may both log in; the last token written wins.
    async fn session_token(&self) -> Result<String, UpstreamError> {
        if let Some(token) = self.session.read().await.as_ref() {
            return Ok(token.clone());
        }

        match self.login().await {
            Ok(token) => Ok(token),
            Err(e) if self.demo_mode => {
                tracing::warn!("Salt API login failed ({}), demo mode uses a placeholder session", e);
                *self.session.write().await = Some(demo::DEMO_SESSION_TOKEN.to_string());
                Ok(demo::DEMO_SESSION_TOKEN.to_string())
            }
            Err(e) => Err(e),
        }
    }

    async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Option<&Value>,
        token: &str,
    ) -> Result<Value, UpstreamError> {
        let mut request = self
            .http
            .request(method.clone(), self.url(path)?)
            .header(AUTH_HEADER, token)
            .header(header::ACCEPT, "application/json");

        if let Some(payload) = payload {
            request = request.json(payload);
        }

        tracing::debug!("Salt API {} {}", method, path);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Salt API {} {} returned {}", method, path, status);
            return Err(UpstreamError::Status { status: status.as_u16(), body });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SaltApi for SaltClient {
    async fn call(&self, method: Method, path: &str, payload: Option<Value>) -> Result<Value, UpstreamError> {
        let token = self.session_token().await?;

        match self.send(method.clone(), path, payload.as_ref(), &token).await {
            // the session expired on the master: log in again and retry once
            Err(e) if e.is_unauthorized() => {
                tracing::info!("Salt API session rejected, logging in again");
                self.clear_session().await;
                let token = self.session_token().await?;
                self.send(method, path, payload.as_ref(), &token).await
            }
            outcome => outcome,
        }
    }

    async fn run(&self, command: Command) -> Result<Value, UpstreamError> {
        let verb = command.verb();
        let request = command.request()?;

        match self.call(request.method, &request.path, request.payload).await {
            Err(e) if self.demo_mode => {
                tracing::warn!("Salt API {} failed ({}), serving demo data", verb, e);
                Ok(demo::sample(verb))
            }
            outcome => outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> SaltClient {
        SaltClient::new(&SaltApiConfig {
            url: url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_url_joining() {
        let salt = client("http://salt.example:8000");
        assert_eq!(salt.url("/").unwrap().as_str(), "http://salt.example:8000/");
        assert_eq!(salt.url("/minions/web-1").unwrap().as_str(), "http://salt.example:8000/minions/web-1");

        let prefixed = client("http://salt.example/api/");
        assert_eq!(prefixed.url("/login").unwrap().as_str(), "http://salt.example/api/login");
    }

    #[test]
    fn test_rejects_unusable_url() {
        assert!(matches!(
            SaltClient::new(&SaltApiConfig { url: "not a url".to_string(), ..Default::default() }),
            Err(UpstreamError::InvalidUrl(_))
        ));
        assert!(matches!(
            SaltClient::new(&SaltApiConfig { url: "mailto:ops@example.com".to_string(), ..Default::default() }),
            Err(UpstreamError::InvalidUrl(_))
        ));
    }
}
