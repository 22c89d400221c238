//! Resolves Telegram file ids to download URLs through the Bot API `getFile` method.

use async_trait::async_trait;
use media_fetcher::{FetchError, LocatorResolver};
use reqwest::Url;
use teloxide::prelude::*;
use teloxide::types::FileId;
use teloxide::RequestError;
use tracing::{debug, instrument};

/// Download URL for a file path returned by `getFile`: `{api_url}/file/bot{token}/{path}`.
pub fn download_url(api_url: &Url, token: &str, file_path: &str) -> Result<Url, FetchError> {
    api_url
        .join(&format!("file/bot{}/{}", token, file_path))
        .map_err(|e| FetchError::InvalidUrl(format!("file path {}: {}", file_path, e)))
}

/// Error text that never carries the request URL (it embeds the bot token).
fn describe(err: &RequestError) -> String {
    match err {
        RequestError::Network(_) => "network error while calling getFile".to_string(),
        other => other.to_string(),
    }
}

/// [`LocatorResolver`] backed by a teloxide bot.
#[derive(Clone)]
pub struct TelegramFileResolver {
    bot: teloxide::Bot,
}

impl TelegramFileResolver {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl LocatorResolver for TelegramFileResolver {
    #[instrument(skip(self))]
    async fn resolve(&self, file_id: &str) -> Result<Url, FetchError> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(|e| FetchError::Resolve {
                file_id: file_id.to_string(),
                reason: describe(&e),
            })?;
        debug!(file_path = %file.path, size = file.meta.size, "step: file id resolved");
        download_url(&self.bot.api_url(), self.bot.token(), &file.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_default_api() {
        let api = Url::parse("https://api.telegram.org").unwrap();
        let url = download_url(&api, "123:abc", "photos/file_1.jpg").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.telegram.org/file/bot123:abc/photos/file_1.jpg"
        );
    }

    #[test]
    fn test_download_url_local_server() {
        let api = Url::parse("http://127.0.0.1:8081/").unwrap();
        let url = download_url(&api, "t", "voice/file_9.oga").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8081/file/bott/voice/file_9.oga");
    }

    /// **Test: getFile result is turned into a download URL against the configured API server.**
    ///
    /// **Setup:** mockito answers `getFile` for token `123:abc`.
    /// **Expected:** URL points at `{server}/file/bot123:abc/{file_path}`.
    #[tokio::test]
    async fn test_resolve_calls_get_file() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                mockito::Matcher::Regex(r"(?i)^/bot123:abc/getfile$".to_string()),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"ok":true,"result":{"file_id":"AgAD","file_unique_id":"u","file_size":3,"file_path":"documents/file_3.pdf"}}"#,
            )
            .create_async()
            .await;
        let api = Url::parse(&server.url()).unwrap();
        let resolver = TelegramFileResolver::new(teloxide::Bot::new("123:abc").set_api_url(api));

        let url = resolver.resolve("AgAD").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            url.as_str(),
            format!("{}/file/bot123:abc/documents/file_3.pdf", server.url())
        );
    }
}
