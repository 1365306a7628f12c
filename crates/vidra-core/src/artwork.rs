//! Thumbnail artwork for the now-playing surface

use crate::{Error, Result};
use async_trait::async_trait;
use image::RgbaImage;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

/// Decoded poster image
#[derive(Debug, Clone)]
pub struct Artwork {
    pub width: u32,
    pub height: u32,
    pub image: RgbaImage,
}

/// Decode raw image bytes (JPEG, PNG, ...) into artwork
pub fn decode_artwork(bytes: &[u8]) -> Result<Artwork> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| Error::ThumbnailDecodeFailed(e.to_string()))?;
    let image = decoded.to_rgba8();

    Ok(Artwork {
        width: image.width(),
        height: image.height(),
        image,
    })
}

/// Fetches and decodes artwork
#[async_trait]
pub trait ArtworkLoader: Send + Sync {
    async fn load(&self, url: &Url) -> Result<Artwork>;
}

/// Artwork loader over HTTP
#[derive(Debug, Clone)]
pub struct HttpArtworkLoader {
    client: Client,
}

impl HttpArtworkLoader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtworkLoader for HttpArtworkLoader {
    #[instrument(skip(self, url), fields(url = %url))]
    async fn load(&self, url: &Url) -> Result<Artwork> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Server {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), "Artwork fetched");

        decode_artwork(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([155, 48, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let artwork = decode_artwork(&png_bytes(4, 3)).unwrap();
        assert_eq!((artwork.width, artwork.height), (4, 3));
    }

    #[test]
    fn test_garbage_is_decode_failure() {
        let err = decode_artwork(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::ThumbnailDecodeFailed(_)));
    }

    #[tokio::test]
    async fn test_http_loader() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vod/vi1/thumbnail.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(8, 8)))
            .mount(&server)
            .await;

        let loader = HttpArtworkLoader::new(Client::new());
        let url = Url::parse(&format!("{}/vod/vi1/thumbnail.jpg", server.uri())).unwrap();
        let artwork = loader.load(&url).await.unwrap();

        assert_eq!(artwork.width, 8);
    }
}
