//! `reqwest`-backed [`StatsSource`].

use std::time::Duration;

use reqwest::{Client, Url};
use tracing::debug;

use crate::provider::{FetchError, StatsSource};

/// Live HTTP source against the public stats API.
#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    http: Client,
    base_url: Url,
}

impl HttpStatsSource {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| FetchError::Config(format!("invalid base url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::Config(format!(
                "base url '{base_url}' cannot carry a path"
            )));
        }
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Config(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/v2/player/{name}/stats`, with `name` percent-encoded as one segment.
    pub fn player_url(&self, username: &str) -> Result<Url, FetchError> {
        self.url_with_segments(&["v2", "player", username, "stats"])
    }

    pub fn guild_url(&self, guild: &str) -> Result<Url, FetchError> {
        let mut url = self.url_with_segments(&["public_api.php"])?;
        url.query_pairs_mut()
            .append_pair("action", "guildStats")
            .append_pair("command", guild);
        Ok(url)
    }

    pub fn online_url(&self) -> Result<Url, FetchError> {
        let mut url = self.url_with_segments(&["public_api.php"])?;
        url.query_pairs_mut().append_pair("action", "onlinePlayers");
        Ok(url)
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                FetchError::Config(format!("base url '{}' cannot carry a path", self.base_url))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        debug!(url = %url, "fetching");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }
        Ok(body.to_vec())
    }
}

#[async_trait::async_trait]
impl StatsSource for HttpStatsSource {
    fn source_name(&self) -> &'static str {
        "http"
    }

    async fn player_stats(&self, username: &str) -> Result<Vec<u8>, FetchError> {
        self.get(self.player_url(username)?).await
    }

    async fn guild_stats(&self, guild: &str) -> Result<Vec<u8>, FetchError> {
        self.get(self.guild_url(guild)?).await
    }

    async fn online_players(&self) -> Result<Vec<u8>, FetchError> {
        self.get(self.online_url()?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base: &str) -> HttpStatsSource {
        HttpStatsSource::new(base, Duration::from_secs(5), "gw-test").unwrap()
    }

    #[test]
    fn player_url_encodes_name_as_one_segment() {
        let s = source("https://api.wynncraft.com/");
        assert_eq!(
            s.player_url("Salted").unwrap().as_str(),
            "https://api.wynncraft.com/v2/player/Salted/stats"
        );
        assert_eq!(
            s.player_url("a/b c").unwrap().as_str(),
            "https://api.wynncraft.com/v2/player/a%2Fb%20c/stats"
        );
    }

    #[test]
    fn guild_url_form_encodes_the_guild_name() {
        let s = source("https://api.wynncraft.com");
        assert_eq!(
            s.guild_url("Sins of Seedia").unwrap().as_str(),
            "https://api.wynncraft.com/public_api.php?action=guildStats&command=Sins+of+Seedia"
        );
    }

    #[test]
    fn online_url_keeps_base_path_prefix() {
        let s = source("http://127.0.0.1:9000/proxy");
        assert_eq!(
            s.online_url().unwrap().as_str(),
            "http://127.0.0.1:9000/proxy/public_api.php?action=onlinePlayers"
        );
    }

    #[test]
    fn rejects_unparsable_base_url() {
        let err = HttpStatsSource::new("not a url", Duration::from_secs(1), "x").unwrap_err();
        assert!(matches!(err, FetchError::Config(_)));
    }
}
