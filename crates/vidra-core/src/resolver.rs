//! URL resolution for hosted media
//!
//! Turns a [`VideoOptions`] into a fetch-ready URL. Public videos resolve
//! to their derived URL without touching the network. Private videos need a
//! session token, exchanged once per resolver and appended as a query
//! parameter to every URL handed out afterwards.

use crate::{Error, MediaKind, Result, VideoOptions};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Body returned by the session token exchange endpoint
#[derive(Debug, Deserialize)]
struct SessionTokenBody {
    session_token: String,
}

/// Resolves media URLs for one [`VideoOptions`] value.
///
/// The controller builds a new resolver for every options assignment, so the
/// cached session token never outlives the options it was issued for.
#[derive(Debug)]
pub struct UrlResolver {
    options: VideoOptions,
    client: Client,
    session_token: OnceCell<String>,
}

impl UrlResolver {
    /// Create a resolver using the given HTTP client
    pub fn new(options: VideoOptions, client: Client) -> Self {
        Self {
            options,
            client,
            session_token: OnceCell::new(),
        }
    }

    /// Options this resolver was built for
    pub fn options(&self) -> &VideoOptions {
        &self.options
    }

    /// Session token, if one has been exchanged already
    pub fn cached_session_token(&self) -> Option<&str> {
        self.session_token.get().map(String::as_str)
    }

    /// Resolve the URL for a media kind.
    ///
    /// Concurrent calls made before the token is cached share a single
    /// exchange request. A failed exchange is not cached; the next call
    /// tries again.
    #[instrument(skip(self), fields(video_id = %self.options.video_id))]
    pub async fn resolve(&self, kind: MediaKind) -> Result<Url> {
        let base = self.options.url_for(kind)?.ok_or_else(|| {
            Error::InvalidUrl(format!(
                "no {} source for {} video {}",
                kind, self.options.video_type, self.options.video_id
            ))
        })?;

        if !self.options.is_private() {
            debug!(url = %base, "Resolved public URL");
            return Ok(base);
        }

        let token = self.session_token().await?;
        let url = append_token(base, &self.options.endpoints.token_param, token);
        debug!(%kind, "Resolved private URL");
        Ok(url)
    }

    async fn session_token(&self) -> Result<&str> {
        let token = self
            .session_token
            .get_or_try_init(|| self.fetch_session_token())
            .await?;
        Ok(token.as_str())
    }

    async fn fetch_session_token(&self) -> Result<String> {
        let url = self
            .options
            .session_token_url()?
            .ok_or_else(|| Error::InvalidUrl("public video has no session endpoint".into()))?;

        info!(url = %url, "Exchanging session token");

        let token = exchange(&self.client, url).await.map_err(|e| {
            warn!(error = %e, "Session token exchange failed");
            Error::session_token(e)
        })?;

        Ok(token)
    }
}

async fn exchange(client: &Client, url: Url) -> Result<String> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Server {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await?;
    let parsed: SessionTokenBody =
        serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))?;

    Ok(parsed.session_token)
}

/// Append the session token as a query parameter
pub fn append_token(mut url: Url, param: &str, token: &str) -> Url {
    url.query_pairs_mut().append_pair(param, token);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn private_options(server: &MockServer) -> VideoOptions {
        VideoOptions::vod("vi1")
            .with_token("tok")
            .with_endpoints(Endpoints::single_host(server.uri()))
    }

    #[test]
    fn test_append_token() {
        let url = Url::parse("https://example.com/a.m3u8").unwrap();
        assert_eq!(
            append_token(url, "avh", "s1").as_str(),
            "https://example.com/a.m3u8?avh=s1"
        );

        let url = Url::parse("https://example.com/a.m3u8?x=1").unwrap();
        assert_eq!(
            append_token(url, "avh", "s1").as_str(),
            "https://example.com/a.m3u8?x=1&avh=s1"
        );
    }

    #[tokio::test]
    async fn test_public_video_skips_network() {
        let resolver = UrlResolver::new(VideoOptions::vod("vi1"), Client::new());
        let url = resolver.resolve(MediaKind::AdaptiveManifest).await.unwrap();

        assert_eq!(url.as_str(), "https://vod.api.video/vod/vi1/hls/manifest.m3u8");
        assert!(resolver.cached_session_token().is_none());
    }

    #[tokio::test]
    async fn test_private_video_fetches_token_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vod/vi1/token/tok/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session_token": "sess"})))
            .expect(1)
            .mount(&server)
            .await;

        let resolver = UrlResolver::new(private_options(&server), Client::new());

        let manifest = resolver.resolve(MediaKind::AdaptiveManifest).await.unwrap();
        assert_eq!(
            manifest.as_str(),
            format!("{}/vod/vi1/token/tok/hls/manifest.m3u8?avh=sess", server.uri())
        );

        let mp4 = resolver.resolve(MediaKind::Progressive).await.unwrap();
        assert!(mp4.as_str().ends_with("/mp4/source.mp4?avh=sess"));
        assert_eq!(resolver.cached_session_token(), Some("sess"));
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let resolver = UrlResolver::new(private_options(&server), Client::new());
        let err = resolver.resolve(MediaKind::AdaptiveManifest).await.unwrap_err();

        match err {
            Error::SessionToken(cause) => assert!(matches!(*cause, Error::Server { status: 403 })),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(resolver.cached_session_token().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_session_host_is_transport_error() {
        let options = VideoOptions::vod("vi1")
            .with_token("tok")
            .with_endpoints(Endpoints::single_host("http://127.0.0.1:9"));
        let resolver = UrlResolver::new(options, Client::new());

        let err = resolver.resolve(MediaKind::AdaptiveManifest).await.unwrap_err();

        match err {
            Error::SessionToken(cause) => assert!(matches!(*cause, Error::Transport(_))),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_exchange_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vod/vi1/token/tok/session"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let resolver = UrlResolver::new(private_options(&server), Client::new());

        for _ in 0..2 {
            let err = resolver.resolve(MediaKind::AdaptiveManifest).await.unwrap_err();
            match err {
                Error::SessionToken(cause) => {
                    assert!(matches!(*cause, Error::Server { status: 503 }))
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
        assert!(resolver.cached_session_token().is_none());
    }

    #[tokio::test]
    async fn test_missing_token_field_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "nope"})))
            .mount(&server)
            .await;

        let resolver = UrlResolver::new(private_options(&server), Client::new());
        let err = resolver.resolve(MediaKind::Thumbnail).await.unwrap_err();

        match err {
            Error::SessionToken(cause) => assert!(matches!(*cause, Error::Decode(_))),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_live_has_no_progressive_source() {
        let resolver = UrlResolver::new(VideoOptions::live("li1"), Client::new());
        let err = resolver.resolve(MediaKind::Progressive).await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
