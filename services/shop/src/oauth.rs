//! Social identity providers: Kakao and Firebase
//!
//! Both flows end in the same place: a verified [`SocialProfile`] that the
//! auth handlers map to a local user via (provider, provider id). Any
//! round-trip or parse failure is reported as SOCIAL_LOGIN_FAILED.

use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, RedirectUrl, TokenResponse,
    TokenUrl, basic::BasicClient,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::error::{ApiError, ErrorCode};
use crate::models::Provider;

const KAKAO_AUTH_URL: &str = "https://kauth.kakao.com/oauth/authorize";
const KAKAO_TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";
const KAKAO_USER_URL: &str = "https://kapi.kakao.com/v2/user/me";
const FIREBASE_LOOKUP_URL: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

/// A verified identity assertion from an external provider
#[derive(Debug, Clone)]
pub struct SocialProfile {
    pub provider: Provider,
    pub provider_id: String,
    pub email: String,
    pub nickname: String,
}

/// Kakao OAuth configuration
#[derive(Debug, Clone)]
pub struct KakaoConfig {
    pub rest_api_key: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
}

impl KakaoConfig {
    /// Create a new KakaoConfig from environment variables
    ///
    /// # Environment Variables
    /// - `KAKAO_REST_API_KEY`: Kakao REST API key (client id)
    /// - `KAKAO_CLIENT_SECRET`: optional client secret
    /// - `KAKAO_REDIRECT_URI`: registered redirect URI
    pub fn from_env() -> anyhow::Result<Self> {
        let rest_api_key = std::env::var("KAKAO_REST_API_KEY")
            .map_err(|_| anyhow::anyhow!("KAKAO_REST_API_KEY environment variable not set"))?;
        let client_secret = std::env::var("KAKAO_CLIENT_SECRET").ok();
        let redirect_uri = std::env::var("KAKAO_REDIRECT_URI")
            .map_err(|_| anyhow::anyhow!("KAKAO_REDIRECT_URI environment variable not set"))?;

        Ok(Self {
            rest_api_key,
            client_secret,
            redirect_uri,
        })
    }
}

#[derive(Debug, Deserialize)]
struct KakaoProfile {
    nickname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KakaoAccount {
    profile: Option<KakaoProfile>,
}

#[derive(Debug, Deserialize)]
struct KakaoUser {
    id: i64,
    kakao_account: Option<KakaoAccount>,
}

/// Kakao OAuth client
#[derive(Clone)]
pub struct KakaoClient {
    client: BasicClient,
    http: reqwest::Client,
}

impl KakaoClient {
    pub fn new(config: KakaoConfig) -> anyhow::Result<Self> {
        // Kakao rejects HTTP basic auth; credentials go in the form body
        let client = BasicClient::new(
            ClientId::new(config.rest_api_key),
            config.client_secret.map(ClientSecret::new),
            AuthUrl::new(KAKAO_AUTH_URL.to_string())?,
            Some(TokenUrl::new(KAKAO_TOKEN_URL.to_string())?),
        )
        .set_redirect_uri(RedirectUrl::new(config.redirect_uri)?)
        .set_auth_type(AuthType::RequestBody);

        Ok(Self {
            client,
            http: reqwest::Client::new(),
        })
    }

    /// Exchange the authorization code and fetch the verified Kakao profile
    pub async fn fetch_profile(&self, code: &str) -> Result<SocialProfile, ApiError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(oauth2::reqwest::async_http_client)
            .await
            .map_err(|e| {
                error!("Kakao code exchange failed: {}", e);
                ApiError::new(ErrorCode::SocialLoginFailed)
            })?;

        let response = self
            .http
            .get(KAKAO_USER_URL)
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .map_err(|e| {
                error!("Kakao userinfo request failed: {}", e);
                ApiError::new(ErrorCode::SocialLoginFailed)
            })?;

        if !response.status().is_success() {
            error!("Kakao userinfo returned {}", response.status());
            return Err(ApiError::new(ErrorCode::SocialLoginFailed));
        }

        let kakao_user: KakaoUser = response.json().await.map_err(|e| {
            error!("Kakao userinfo parse failed: {}", e);
            ApiError::new(ErrorCode::SocialLoginFailed)
        })?;

        let kakao_id = kakao_user.id.to_string();
        let nickname = kakao_user
            .kakao_account
            .and_then(|a| a.profile)
            .and_then(|p| p.nickname)
            .unwrap_or_else(|| format!("kakao_{}", kakao_id));

        info!("Kakao login verified for provider id {}", kakao_id);

        Ok(SocialProfile {
            provider: Provider::Kakao,
            // Kakao does not always share an email; a synthetic one keeps
            // the email uniqueness invariant intact
            email: format!("kakao_{}@kakao.local", kakao_id),
            provider_id: kakao_id,
            nickname,
        })
    }
}

/// Firebase configuration
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub web_api_key: String,
}

impl FirebaseConfig {
    /// Create a new FirebaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `FIREBASE_WEB_API_KEY`: Identity Toolkit web API key
    pub fn from_env() -> anyhow::Result<Self> {
        let web_api_key = std::env::var("FIREBASE_WEB_API_KEY")
            .map_err(|_| anyhow::anyhow!("FIREBASE_WEB_API_KEY environment variable not set"))?;
        Ok(Self { web_api_key })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirebaseUser {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirebaseLookupResponse {
    users: Option<Vec<FirebaseUser>>,
}

/// Firebase ID-token verifier backed by the Identity Toolkit REST API
#[derive(Clone)]
pub struct FirebaseClient {
    config: FirebaseConfig,
    http: reqwest::Client,
}

impl FirebaseClient {
    pub fn new(config: FirebaseConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Verify a Firebase ID token and return the verified profile
    pub async fn fetch_profile(&self, id_token: &str) -> Result<SocialProfile, ApiError> {
        let response = self
            .http
            .post(format!(
                "{}?key={}",
                FIREBASE_LOOKUP_URL, self.config.web_api_key
            ))
            .json(&serde_json::json!({ "idToken": id_token }))
            .send()
            .await
            .map_err(|e| {
                error!("Firebase lookup request failed: {}", e);
                ApiError::new(ErrorCode::SocialLoginFailed)
            })?;

        if !response.status().is_success() {
            error!("Firebase lookup returned {}", response.status());
            return Err(ApiError::new(ErrorCode::SocialLoginFailed));
        }

        let lookup: FirebaseLookupResponse = response.json().await.map_err(|e| {
            error!("Firebase lookup parse failed: {}", e);
            ApiError::new(ErrorCode::SocialLoginFailed)
        })?;

        let user = lookup
            .users
            .and_then(|mut users| if users.is_empty() { None } else { Some(users.remove(0)) })
            .ok_or_else(|| ApiError::new(ErrorCode::SocialLoginFailed))?;

        let Some(email) = user.email else {
            error!("Firebase token has no email");
            return Err(ApiError::new(ErrorCode::SocialLoginFailed));
        };

        let nickname = user
            .display_name
            .unwrap_or_else(|| format!("firebase_{}", user.local_id));

        info!("Firebase login verified for uid {}", user.local_id);

        Ok(SocialProfile {
            provider: Provider::Firebase,
            provider_id: user.local_id,
            email,
            nickname,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kakao_user_parse() {
        let body = r#"{
            "id": 123456789,
            "kakao_account": { "profile": { "nickname": "wizard" } }
        }"#;
        let user: KakaoUser = serde_json::from_str(body).unwrap();
        assert_eq!(user.id, 123456789);
        assert_eq!(
            user.kakao_account.unwrap().profile.unwrap().nickname,
            Some("wizard".to_string())
        );
    }

    #[test]
    fn test_kakao_user_parse_without_profile() {
        let body = r#"{ "id": 42 }"#;
        let user: KakaoUser = serde_json::from_str(body).unwrap();
        assert_eq!(user.id, 42);
        assert!(user.kakao_account.is_none());
    }

    #[test]
    fn test_firebase_lookup_parse() {
        let body = r#"{
            "users": [
                { "localId": "uid-1", "email": "a@b.c", "displayName": "Alice" }
            ]
        }"#;
        let lookup: FirebaseLookupResponse = serde_json::from_str(body).unwrap();
        let user = &lookup.users.unwrap()[0];
        assert_eq!(user.local_id, "uid-1");
        assert_eq!(user.email.as_deref(), Some("a@b.c"));
    }
}
