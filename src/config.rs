//! 程序配置
//!
//! 默认值 → TOML 文件（可选，路径来自 `LYRIC_SLIDES_CONFIG`）→ 环境变量，后者覆盖前者。

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{AppResult, ConfigError};
use crate::models::{PageDimensions, SegmentBounds, StyleOptions};

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 每页最少行数
    pub min_lines_per_slide: usize,
    /// 每页最多行数
    pub max_lines_per_slide: usize,
    /// 是否先创建标题页
    pub include_title: bool,
    /// 背景色（不设置则沿用当前页面背景）
    pub background_color: Option<String>,
    /// 文字颜色
    pub text_color: Option<String>,
    /// 要生成的歌曲（按标题/歌手搜索，取第一个匹配）
    pub song_query: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    pub rate_limit: RateLimitConfig,
    pub catalog: CatalogConfig,
    pub host: SimulatedHostConfig,
}

/// 页面创建限流配置
///
/// 宿主的真实窗口并未完整公开，以下默认值偏保守：每个窗口只允许 1 次创建。
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RateLimitConfig {
    /// 窗口内允许的最大创建次数
    pub max_creations_per_window: usize,
    /// 滑动窗口宽度（毫秒）
    pub window_ms: u64,
    /// 两次创建之间的最小间隔（毫秒）
    pub min_spacing_ms: u64,
    /// 安全余量（毫秒），吸收客户端与服务端的时钟/延迟偏差
    pub safety_buffer_ms: u64,
}

/// 歌曲目录配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 远程歌曲列表地址（不设置则只使用本地文件）
    pub songs_url: Option<String>,
    /// 本地兜底文件
    pub local_path: String,
    /// 缓存有效期（秒）
    pub cache_ttl_secs: u64,
    /// 是否启用缓存
    pub enable_cache: bool,
}

/// 模拟宿主配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulatedHostConfig {
    /// 设计最多允许的页面数
    pub page_quota: usize,
    pub page_width: f64,
    pub page_height: f64,
    /// 当前页面背景色
    pub background_color: Option<String>,
    /// 服务端窗口内允许的最大创建次数
    pub server_max_per_window: usize,
    /// 服务端窗口宽度（毫秒）
    pub server_window_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_lines_per_slide: 3,
            max_lines_per_slide: 4,
            include_title: true,
            background_color: None,
            text_color: None,
            song_query: None,
            verbose_logging: false,
            rate_limit: RateLimitConfig::default(),
            catalog: CatalogConfig::default(),
            host: SimulatedHostConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_creations_per_window: 1,
            window_ms: 3000,
            min_spacing_ms: 2000,
            safety_buffer_ms: 200,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            songs_url: None,
            local_path: "data/songs.json".to_string(),
            cache_ttl_secs: 5 * 60,
            enable_cache: true,
        }
    }
}

impl Default for SimulatedHostConfig {
    fn default() -> Self {
        Self {
            page_quota: 100,
            page_width: 1920.0,
            page_height: 1080.0,
            background_color: None,
            server_max_per_window: 3,
            server_window_ms: 1000,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn min_spacing(&self) -> Duration {
        Duration::from_millis(self.min_spacing_ms)
    }

    pub fn safety_buffer(&self) -> Duration {
        Duration::from_millis(self.safety_buffer_ms)
    }
}

impl CatalogConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl SimulatedHostConfig {
    pub fn dimensions(&self) -> PageDimensions {
        PageDimensions {
            width: self.page_width,
            height: self.page_height,
        }
    }

    pub fn server_window(&self) -> Duration {
        Duration::from_millis(self.server_window_ms)
    }
}

impl Config {
    /// 读取配置：`LYRIC_SLIDES_CONFIG` 指向的 TOML 文件（可选）+ 环境变量
    pub fn load() -> Result<Self> {
        let config = match std::env::var("LYRIC_SLIDES_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?.with_env()?,
            Err(_) => Self::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 只从环境变量读取（未设置的字段使用默认值）
    pub fn from_env() -> Result<Self> {
        Ok(Self::default().with_env()?)
    }

    /// 从 TOML 文件读取，缺省字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env(self) -> AppResult<Self> {
        let d = self;
        Ok(Self {
            min_lines_per_slide: env_parse("MIN_LINES_PER_SLIDE", d.min_lines_per_slide)?,
            max_lines_per_slide: env_parse("MAX_LINES_PER_SLIDE", d.max_lines_per_slide)?,
            include_title: env_parse("INCLUDE_TITLE", d.include_title)?,
            background_color: env_opt("BACKGROUND_COLOR").or(d.background_color),
            text_color: env_opt("TEXT_COLOR").or(d.text_color),
            song_query: env_opt("SONG_QUERY").or(d.song_query),
            verbose_logging: env_parse("VERBOSE_LOGGING", d.verbose_logging)?,
            rate_limit: RateLimitConfig {
                max_creations_per_window: env_parse(
                    "RATE_LIMIT_MAX_PER_WINDOW",
                    d.rate_limit.max_creations_per_window,
                )?,
                window_ms: env_parse("RATE_LIMIT_WINDOW_MS", d.rate_limit.window_ms)?,
                min_spacing_ms: env_parse("RATE_LIMIT_MIN_SPACING_MS", d.rate_limit.min_spacing_ms)?,
                safety_buffer_ms: env_parse(
                    "RATE_LIMIT_SAFETY_BUFFER_MS",
                    d.rate_limit.safety_buffer_ms,
                )?,
            },
            catalog: CatalogConfig {
                songs_url: env_opt("SONGS_URL").or(d.catalog.songs_url),
                local_path: env_opt("SONGS_LOCAL_PATH").unwrap_or(d.catalog.local_path),
                cache_ttl_secs: env_parse("SONGS_CACHE_TTL_SECS", d.catalog.cache_ttl_secs)?,
                enable_cache: env_parse("SONGS_ENABLE_CACHE", d.catalog.enable_cache)?,
            },
            host: SimulatedHostConfig {
                page_quota: env_parse("HOST_PAGE_QUOTA", d.host.page_quota)?,
                page_width: env_parse("HOST_PAGE_WIDTH", d.host.page_width)?,
                page_height: env_parse("HOST_PAGE_HEIGHT", d.host.page_height)?,
                background_color: env_opt("HOST_BACKGROUND_COLOR").or(d.host.background_color),
                server_max_per_window: env_parse(
                    "HOST_SERVER_MAX_PER_WINDOW",
                    d.host.server_max_per_window,
                )?,
                server_window_ms: env_parse("HOST_SERVER_WINDOW_MS", d.host.server_window_ms)?,
            },
        })
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.segment_bounds()?;
        self.style().validate()?;
        if self.rate_limit.max_creations_per_window == 0 {
            return Err(ConfigError::ZeroCeiling);
        }
        Ok(())
    }

    pub fn segment_bounds(&self) -> Result<SegmentBounds, ConfigError> {
        SegmentBounds::new(self.min_lines_per_slide, self.max_lines_per_slide)
    }

    pub fn style(&self) -> StyleOptions {
        StyleOptions {
            background_color: self.background_color.clone(),
            text_color: self.text_color.clone(),
        }
    }
}

fn env_opt(var_name: &str) -> Option<String> {
    std::env::var(var_name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(var_name: &str, default: T) -> Result<T, ConfigError> {
    match env_opt(var_name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            }),
        None => Ok(default),
    }
}
