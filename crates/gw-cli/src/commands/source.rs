//! File-backed [`StatsSource`] for offline runs.
//!
//! Each endpoint maps to at most one file. Asking for an endpoint with no
//! file configured is a config error, not a 404.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gw_ingest::{FetchError, StatsSource};

#[derive(Debug, Clone, Default)]
pub struct FileSource {
    player: Option<PathBuf>,
    guild: Option<PathBuf>,
    online: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, path: PathBuf) -> Self {
        self.player = Some(path);
        self
    }

    pub fn with_guild(mut self, path: PathBuf) -> Self {
        self.guild = Some(path);
        self
    }

    pub fn with_online(mut self, path: PathBuf) -> Self {
        self.online = Some(path);
        self
    }
}

async fn read(path: Option<&Path>, what: &str) -> Result<Vec<u8>, FetchError> {
    let path = path.ok_or_else(|| FetchError::Config(format!("no file given for {what}")))?;
    tokio::fs::read(path)
        .await
        .map_err(|e| FetchError::Transport(format!("{}: {e}", path.display())))
}

#[async_trait]
impl StatsSource for FileSource {
    fn source_name(&self) -> &'static str {
        "file"
    }

    async fn player_stats(&self, _username: &str) -> Result<Vec<u8>, FetchError> {
        read(self.player.as_deref(), "player stats").await
    }

    async fn guild_stats(&self, _guild: &str) -> Result<Vec<u8>, FetchError> {
        read(self.guild.as_deref(), "guild stats").await
    }

    async fn online_players(&self) -> Result<Vec<u8>, FetchError> {
        read(self.online.as_deref(), "online players").await
    }
}
