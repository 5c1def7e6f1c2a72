//! 错误类型
//!
//! 分为三类：
//! - `ConfigError` - 配置/参数校验失败
//! - `CatalogError` - 歌曲目录加载失败
//! - `AppError` - 应用层汇总，包装以上两类及 TOML 解析错误
//!
//! 宿主（设计应用）返回的错误定义在 `infrastructure::host::HostError`，
//! 它是批量创建流程的输入，不会越过编排层向外传播。

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 歌曲目录错误
    #[error("歌曲目录错误: {0}")]
    Catalog(#[from] CatalogError),
    /// TOML 解析错误
    #[error("TOML解析失败: {0}")]
    Toml(#[from] toml::de::Error),
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 每页最少行数必须 ≥ 1
    #[error("每页最少行数必须大于等于 1 (当前: {min})")]
    MinLinesTooSmall { min: usize },

    /// 最多行数小于最少行数
    #[error("每页最多行数 {max} 不能小于最少行数 {min}")]
    MaxBelowMin { min: usize, max: usize },

    /// 颜色格式不是 #RRGGBB
    #[error("颜色 '{value}' 格式无效，应为 #RRGGBB")]
    InvalidColor { value: String },

    /// 限流窗口内允许的创建次数必须 ≥ 1
    #[error("限流窗口内允许的创建次数必须大于等于 1")]
    ZeroCeiling,

    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

/// 歌曲目录错误
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 网络请求失败
    #[error("请求歌曲列表失败 ({url}): {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务端返回非 2xx
    #[error("请求歌曲列表失败 ({url}): HTTP {status}")]
    BadStatus { url: String, status: u16 },

    /// 顶层不是数组
    #[error("歌曲数据格式无效: 应为数组")]
    NotAnArray,

    /// 过滤后没有合法歌曲
    #[error("响应中没有合法的歌曲")]
    NoValidSongs,

    /// 本地兜底文件读取失败
    #[error("加载本地歌曲文件失败 ({path}): {reason}")]
    LocalFallbackFailed { path: String, reason: String },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
