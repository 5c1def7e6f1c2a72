//! 歌曲目录 - 业务能力层
//!
//! 歌曲列表来源：
//! 1. 内存缓存（有效期内直接返回）
//! 2. 远程 JSON（配置了 `songs_url` 时）
//! 3. 本地 JSON 兜底文件
//!
//! 远程请求失败不会报错，只记录警告后改用本地文件。

use std::time::Duration;

use chrono::{DateTime, Local};
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::models::Song;

/// 远程请求超时
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// 缓存状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStatus {
    pub cached: bool,
    pub cached_at: Option<DateTime<Local>>,
    pub expires_at: Option<DateTime<Local>>,
}

#[derive(Debug)]
struct CacheEntry {
    songs: Vec<Song>,
    cached_at: DateTime<Local>,
    expires_at: DateTime<Local>,
    valid_until: Instant,
}

/// 歌曲目录
pub struct SongCatalog {
    client: reqwest::Client,
    config: CatalogConfig,
    cache: Mutex<Option<CacheEntry>>,
}

impl SongCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            config,
            cache: Mutex::new(None),
        }
    }

    /// 加载歌曲列表
    pub async fn load_songs(&self) -> Result<Vec<Song>, CatalogError> {
        if self.config.enable_cache {
            if let Some(songs) = self.cached_songs().await {
                debug!("使用缓存的歌曲列表 ({} 首)", songs.len());
                return Ok(songs);
            }
        }

        if let Some(url) = &self.config.songs_url {
            match self.fetch_remote(url).await {
                Ok(songs) => {
                    info!("✓ 从远程加载 {} 首歌曲", songs.len());
                    self.store(&songs).await;
                    return Ok(songs);
                }
                Err(e) => {
                    warn!("⚠️ 远程歌曲列表加载失败，改用本地文件: {}", e);
                }
            }
        }

        let songs = load_local(&self.config.local_path).await?;
        info!("✓ 从本地文件加载 {} 首歌曲", songs.len());
        self.store(&songs).await;
        Ok(songs)
    }

    /// 清空缓存，下次加载强制刷新
    pub async fn clear_cache(&self) {
        *self.cache.lock().await = None;
    }

    pub async fn cache_status(&self) -> CacheStatus {
        match self.cache.lock().await.as_ref() {
            Some(entry) => CacheStatus {
                cached: true,
                cached_at: Some(entry.cached_at),
                expires_at: Some(entry.expires_at),
            },
            None => CacheStatus {
                cached: false,
                cached_at: None,
                expires_at: None,
            },
        }
    }

    async fn cached_songs(&self) -> Option<Vec<Song>> {
        let cache = self.cache.lock().await;
        cache
            .as_ref()
            .filter(|entry| Instant::now() < entry.valid_until)
            .map(|entry| entry.songs.clone())
    }

    async fn store(&self, songs: &[Song]) {
        if !self.config.enable_cache {
            return;
        }
        let ttl = self.config.cache_ttl();
        let cached_at = Local::now();
        let expires_at = cached_at
            + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero());
        *self.cache.lock().await = Some(CacheEntry {
            songs: songs.to_vec(),
            cached_at,
            expires_at,
            valid_until: Instant::now() + ttl,
        });
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<Song>, CatalogError> {
        debug!("请求远程歌曲列表: {}", url);

        let response = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|source| CatalogError::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let data: JsonValue = response
            .json()
            .await
            .map_err(|source| CatalogError::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        parse_songs(data)
    }
}

/// 从本地 JSON 文件读取歌曲列表
pub async fn load_local(path: &str) -> Result<Vec<Song>, CatalogError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::LocalFallbackFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    let data: JsonValue =
        serde_json::from_str(&content).map_err(|e| CatalogError::LocalFallbackFailed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    parse_songs(data)
}

/// 校验并解析歌曲列表
///
/// 顶层必须是数组；每项需要非空的 `id`、`title` 和数组类型的 `lyrics`，
/// 不合格的项被跳过。一首合法的都没有时报错。
pub fn parse_songs(data: JsonValue) -> Result<Vec<Song>, CatalogError> {
    let JsonValue::Array(items) = data else {
        return Err(CatalogError::NotAnArray);
    };
    let total = items.len();

    let songs: Vec<Song> = items
        .into_iter()
        .filter(has_required_fields)
        .filter_map(|item| serde_json::from_value::<Song>(item).ok())
        .collect();

    if songs.is_empty() {
        return Err(CatalogError::NoValidSongs);
    }
    if songs.len() < total {
        warn!("跳过 {} 条格式不正确的歌曲", total - songs.len());
    }
    Ok(songs)
}

fn has_required_fields(item: &JsonValue) -> bool {
    let non_empty = |key: &str| {
        item.get(key)
            .and_then(JsonValue::as_str)
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    };
    non_empty("id") && non_empty("title") && item.get("lyrics").map(JsonValue::is_array).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_songs(value: &JsonValue) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    fn catalog_for(path: &str, url: Option<&str>, enable_cache: bool) -> SongCatalog {
        SongCatalog::new(CatalogConfig {
            songs_url: url.map(str::to_string),
            local_path: path.to_string(),
            cache_ttl_secs: 300,
            enable_cache,
        })
    }

    fn sample() -> JsonValue {
        json!([
            {"id": "1", "title": "Amazing Grace", "artist": "John Newton", "lyrics": ["a", "", "b"]},
            {"id": "2", "title": "Be Thou My Vision", "lyrics": ["c"]}
        ])
    }

    #[test]
    fn parse_skips_invalid_entries() {
        let songs = parse_songs(json!([
            {"id": "1", "title": "ok", "lyrics": ["x"]},
            {"id": "", "title": "no id", "lyrics": ["x"]},
            {"id": "3", "title": "no lyrics"},
            {"id": "4", "title": "bad lyrics", "lyrics": "x"},
            {"id": "5", "lyrics": ["x"]}
        ]))
        .unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "ok");
    }

    #[test]
    fn parse_rejects_non_array_and_empty() {
        assert!(matches!(
            parse_songs(json!({"songs": []})),
            Err(CatalogError::NotAnArray)
        ));
        assert!(matches!(
            parse_songs(json!([{"title": "x"}])),
            Err(CatalogError::NoValidSongs)
        ));
    }

    #[tokio::test]
    async fn loads_local_file_without_url() {
        let file = write_songs(&sample());
        let catalog = catalog_for(file.path().to_str().unwrap(), None, true);

        let songs = catalog.load_songs().await.unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[1].artist, None);

        let status = catalog.cache_status().await;
        assert!(status.cached);
        assert!(status.expires_at.unwrap() > status.cached_at.unwrap());
    }

    #[tokio::test]
    async fn unreachable_remote_falls_back_to_local() {
        let file = write_songs(&sample());
        let catalog = catalog_for(
            file.path().to_str().unwrap(),
            Some("http://127.0.0.1:9/songs.json"),
            false,
        );

        let songs = catalog.load_songs().await.unwrap();
        assert_eq!(songs.len(), 2);
        assert!(!catalog.cache_status().await.cached);
    }

    #[tokio::test]
    async fn cache_serves_until_cleared() {
        let file = write_songs(&sample());
        let path = file.path().to_str().unwrap().to_string();
        let catalog = catalog_for(&path, None, true);

        assert_eq!(catalog.load_songs().await.unwrap().len(), 2);

        std::fs::write(&path, json!([{"id": "9", "title": "new", "lyrics": []}]).to_string())
            .unwrap();
        assert_eq!(catalog.load_songs().await.unwrap().len(), 2);

        catalog.clear_cache().await;
        let songs = catalog.load_songs().await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "new");
    }

    #[tokio::test(start_paused = true)]
    async fn cache_expires_after_ttl() {
        let file = write_songs(&sample());
        let path = file.path().to_str().unwrap().to_string();
        let catalog = catalog_for(&path, None, true);

        catalog.load_songs().await.unwrap();
        std::fs::write(&path, json!([{"id": "9", "title": "new", "lyrics": []}]).to_string())
            .unwrap();

        tokio::time::advance(Duration::from_secs(301)).await;
        assert_eq!(catalog.load_songs().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_local_file_is_an_error() {
        let catalog = catalog_for("/nonexistent/songs.json", None, true);
        assert!(matches!(
            catalog.load_songs().await,
            Err(CatalogError::LocalFallbackFailed { .. })
        ));
    }
}
