//! HTTP access to the V-Song backend.
//!
//! [`Backend`] is the seam every view fetches through; [`HttpBackend`] is the real
//! implementation. Each call issues exactly one GET and resolves to either a decoded
//! value or an [`ApiError`]. There is no retry, backoff or client-side timeout.

use crate::api_client::ApiError;
use crate::configuration::ApiSettings;
use crate::foundation::models::{
    GenderFilter, MainPageData, SearchParams, SearchResultSet, SessionIdentity, Song,
    VtuberDetail,
};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Backend: Send + Sync {
    /// Chart sidebar data from the site-relative `/api/main`.
    async fn fetch_charts(&self) -> Result<MainPageData, ApiError>;

    /// Landing page sections filtered by gender.
    async fn fetch_main(&self, gender: GenderFilter) -> Result<MainPageData, ApiError>;

    async fn search(&self, params: &SearchParams) -> Result<SearchResultSet, ApiError>;

    async fn vtuber_details(&self, channel_id: &str) -> Result<VtuberDetail, ApiError>;

    async fn vtuber_songs(&self, channel_id: &str) -> Result<Vec<Song>, ApiError>;

    /// The logged-in identity, or `None` when the backend answers 2xx without one.
    async fn user_info(&self) -> Result<Option<SessionIdentity>, ApiError>;

    async fn logout(&self) -> Result<(), ApiError>;
}

pub struct HttpBackend {
    client: Client,
    settings: ApiSettings,
}

impl HttpBackend {
    /// Builds a client with a cookie jar, so credentials set by the backend are sent
    /// back on later calls. A configured `session_cookie` seeds the jar for both bases.
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .cookie_provider(Arc::new(session_jar(&settings)))
            .build()?;

        Ok(Self { client, settings })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_base_url.trim_end_matches('/'), path)
    }

    /// Appends each segment to the API base, percent-encoding it as a single segment.
    fn api_segments_url(&self, segments: &[&str]) -> Result<String, ApiError> {
        let base = &self.settings.api_base_url;
        let mut url = Url::parse(base).map_err(|e| ApiError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: base.clone(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }

    fn site_url(&self, path: &str) -> String {
        format!("{}{}", self.settings.site_base_url.trim_end_matches('/'), path)
    }

    /// Sends a GET and returns the body of a 2xx response.
    async fn get_text(&self, url: &str, params: &[(&str, String)]) -> Result<String, ApiError> {
        debug!(url, ?params, "GET");
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::status(status, url));
        }

        Ok(response.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let body = self.get_text(url, params).await?;
        decode_required(url, &body)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_charts(&self) -> Result<MainPageData, ApiError> {
        self.get_json(&self.site_url("/api/main"), &[]).await
    }

    async fn fetch_main(&self, gender: GenderFilter) -> Result<MainPageData, ApiError> {
        let params = [("gender", gender.as_query_value().to_string())];
        self.get_json(&self.api_url("/main"), &params).await
    }

    async fn search(&self, params: &SearchParams) -> Result<SearchResultSet, ApiError> {
        let pairs = params.to_query_pairs();
        self.get_json(&self.api_url("/api/v1/vtubers/search"), &pairs)
            .await
    }

    async fn vtuber_details(&self, channel_id: &str) -> Result<VtuberDetail, ApiError> {
        let url = self.api_segments_url(&["api", "v1", "vtubers", channel_id, "details"])?;
        let mut detail: VtuberDetail = self.get_json(&url, &[]).await?;
        if detail.channel_id.is_empty() {
            detail.channel_id = channel_id.to_string();
        }
        Ok(detail)
    }

    async fn vtuber_songs(&self, channel_id: &str) -> Result<Vec<Song>, ApiError> {
        let url = self.api_segments_url(&["api", "v1", "vtubers", channel_id, "songs"])?;
        self.get_json(&url, &[]).await
    }

    async fn user_info(&self) -> Result<Option<SessionIdentity>, ApiError> {
        let url = self.site_url("/api/login/userinfo");
        let body = self.get_text(&url, &[]).await?;
        decode_optional(&body)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.get_text(&self.site_url("/api/logout"), &[]).await?;
        Ok(())
    }
}

/// A jar holding the configured session cookie for the API and site origins.
///
/// `session_cookie` is a `Cookie` header value, so each `name=value` pair is added
/// on its own.
fn session_jar(settings: &ApiSettings) -> Jar {
    let jar = Jar::default();
    let Some(cookie) = settings.session_cookie.as_deref() else {
        return jar;
    };

    for base in [&settings.api_base_url, &settings.site_base_url] {
        match Url::parse(base) {
            Ok(url) => {
                for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
                    jar.add_cookie_str(pair, &url);
                }
            }
            Err(e) => warn!(base = %base, %e, "not attaching session_cookie"),
        }
    }
    jar
}

/// Decodes a body that must carry a payload.
fn decode_required<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::EmptyBody {
            url: url.to_string(),
        });
    }
    Ok(serde_json::from_str(body)?)
}

/// Decodes a body where an empty string or `null` means "nothing".
fn decode_optional<T: DeserializeOwned>(body: &str) -> Result<Option<T>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str::<Option<T>>(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> HttpBackend {
        HttpBackend::new(ApiSettings::new("http://api.test/", "http://site.test")).unwrap()
    }

    #[test]
    fn test_urls_join_bases() {
        let backend = backend();
        assert_eq!(backend.api_url("/main"), "http://api.test/main");
        assert_eq!(
            backend.site_url("/api/login/userinfo"),
            "http://site.test/api/login/userinfo"
        );
    }

    #[test]
    fn test_channel_id_is_one_path_segment() {
        let backend = backend();
        assert_eq!(
            backend
                .api_segments_url(&["api", "v1", "vtubers", "a?x=1", "details"])
                .unwrap(),
            "http://api.test/api/v1/vtubers/a%3Fx=1/details"
        );
        assert_eq!(
            backend
                .api_segments_url(&["api", "v1", "vtubers", "a/b", "songs"])
                .unwrap(),
            "http://api.test/api/v1/vtubers/a%2Fb/songs"
        );
    }

    #[test]
    fn test_session_cookie_seeds_jar() {
        use reqwest::cookie::CookieStore;

        let mut settings = ApiSettings::new("http://api.test", "http://site.test");
        settings.session_cookie = Some("SESSION=abc; theme=dark".to_string());
        let jar = session_jar(&settings);

        for base in ["http://api.test/main", "http://site.test/api/main"] {
            let header = jar.cookies(&Url::parse(base).unwrap()).unwrap();
            let header = header.to_str().unwrap();
            assert!(header.contains("SESSION=abc"));
            assert!(header.contains("theme=dark"));
        }
    }

    #[test]
    fn test_no_session_cookie_leaves_jar_empty() {
        let jar = session_jar(&ApiSettings::new("http://api.test", "http://site.test"));
        use reqwest::cookie::CookieStore;
        assert!(jar
            .cookies(&Url::parse("http://api.test/main").unwrap())
            .is_none());
    }

    #[test]
    fn test_invalid_session_cookie_is_ignored() {
        let mut settings = ApiSettings::new("http://api.test", "http://site.test");
        settings.session_cookie = Some("bad\nvalue".to_string());
        assert!(HttpBackend::new(settings).is_ok());
    }

    #[test]
    fn test_decode_required_rejects_empty_body() {
        let result: Result<Vec<Song>, _> = decode_required("http://api.test/songs", "  ");
        assert!(matches!(result, Err(ApiError::EmptyBody { .. })));

        let songs: Vec<Song> = decode_required("http://api.test/songs", "[]").unwrap();
        assert!(songs.is_empty());
    }

    #[test]
    fn test_decode_optional_identity() {
        let none: Option<SessionIdentity> = decode_optional("").unwrap();
        assert!(none.is_none());

        let none: Option<SessionIdentity> = decode_optional("null").unwrap();
        assert!(none.is_none());

        let some: Option<SessionIdentity> = decode_optional(
            r#"{"name": "Alice", "picture": "https://example.com/a.png", "email": "a@example.com"}"#,
        )
        .unwrap();
        assert_eq!(some.unwrap().name, "Alice");

        let broken: Result<Option<SessionIdentity>, _> = decode_optional("{");
        assert!(matches!(broken, Err(ApiError::Decode(_))));
    }
}
