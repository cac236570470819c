//! Authentication against the admin API: form-encoded login, bearer
//! tokens persisted in the local store, and optimistic JWT expiry checks.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::logging::{log, obj, v_str, Domain, Level};
use crate::store::{LocalStore, KEY_TOKEN, KEY_USER, KEY_USER_ROLE};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// HTTP side of authentication. Login is form-encoded per the API's
/// OAuth2 password flow; everything after rides the bearer token.
pub struct AuthClient {
    client: Client,
    base: Url,
}

impl AuthClient {
    pub fn new(base: &str, timeout_secs: u64) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid api base url: {}", base))?;
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let url = self.base.join("auth/login")?;
        let resp = self
            .client
            .post(url)
            .form(&login_form(email, password))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("login failed: {}", resp.status()));
        }
        let token: TokenResponse = resp.json().await?;
        Ok(token.access_token)
    }

    pub async fn me(&self, token: &str) -> Result<User> {
        let url = self.base.join("auth/me")?;
        let resp = self.client.get(url).bearer_auth(token).send().await?;
        if !resp.status().is_success() {
            return Err(anyhow!("profile fetch failed: {}", resp.status()));
        }
        Ok(resp.json().await?)
    }
}

/// The OAuth2 password-flow form body; the server keys the credential
/// fields as `email` and `password`.
fn login_form<'a>(email: &'a str, password: &'a str) -> [(&'static str, &'a str); 2] {
    [("email", email), ("password", password)]
}

/// Lookup of the user behind a bearer token. Seam for session
/// revalidation so it can run against a canned double in tests.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn lookup(&self, token: &str) -> Result<User>;
}

#[async_trait]
impl UserLookup for AuthClient {
    async fn lookup(&self, token: &str) -> Result<User> {
        self.me(token).await
    }
}

/// Decode the JWT payload and compare `exp` against now. Any token that
/// cannot be decoded counts as expired; a token without `exp` never
/// expires. No signature verification happens here, the server is the
/// authority.
pub fn is_token_expired(token: &str) -> bool {
    let Some(payload) = token.split('.').nth(1) else {
        return true;
    };
    let Ok(raw) = URL_SAFE_NO_PAD.decode(payload) else {
        return true;
    };
    let Ok(claims) = serde_json::from_slice::<Value>(&raw) else {
        return true;
    };
    match claims.get("exp").and_then(Value::as_i64) {
        Some(exp) => exp <= Utc::now().timestamp(),
        None => false,
    }
}

/// Session state over the local store. Login persists token and user;
/// logout clears both. A stored-but-expired token reads as logged out.
pub struct AuthSession {
    store: LocalStore,
}

impl AuthSession {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub async fn login(
        &mut self,
        client: &AuthClient,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let token = client.login(email, password).await?;
        let user = client.me(&token).await?;
        self.store.set(KEY_TOKEN, &token)?;
        self.store.set_json(KEY_USER, &user)?;
        self.store.set(KEY_USER_ROLE, &user.role)?;
        log(
            Level::Info,
            Domain::Auth,
            "login",
            obj(&[("user", v_str(&user.email)), ("role", v_str(&user.role))]),
        );
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.store.remove(KEY_TOKEN)?;
        self.store.remove(KEY_USER)?;
        self.store.remove(KEY_USER_ROLE)?;
        log(Level::Info, Domain::Auth, "logout", obj(&[]));
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(KEY_TOKEN).ok().flatten()
    }

    pub fn current_user(&self) -> Option<User> {
        self.store.get_json(KEY_USER).ok().flatten()
    }

    pub fn is_authenticated(&self) -> bool {
        match self.token() {
            Some(token) => !is_token_expired(&token),
            None => false,
        }
    }

    /// Role check: admins pass every check, everyone else needs an exact
    /// match.
    pub fn has_role(&self, role: &str) -> bool {
        match self.current_user() {
            Some(user) => user.role == "admin" || user.role == role,
            None => false,
        }
    }

    /// Revalidate the session: an expired token drops it outright; a live
    /// token re-fetches the user so disabled accounts and role changes
    /// take effect, logging out if the lookup fails.
    pub async fn refresh_auth(&mut self, client: &dyn UserLookup) -> Result<bool> {
        let Some(token) = self.token() else {
            return Ok(false);
        };
        if is_token_expired(&token) {
            self.logout()?;
            return Ok(false);
        }
        match client.lookup(&token).await {
            Ok(user) => {
                self.store.set_json(KEY_USER, &user)?;
                self.store.set(KEY_USER_ROLE, &user.role)?;
                Ok(true)
            }
            Err(err) => {
                log(
                    Level::Warn,
                    Domain::Auth,
                    "revalidation_failed",
                    obj(&[("msg", v_str(&err.to_string()))]),
                );
                self.logout()?;
                Ok(false)
            }
        }
    }

    pub fn store_mut(&mut self) -> &mut LocalStore {
        &mut self.store
    }
}
