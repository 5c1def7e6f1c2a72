//! 宿主设计应用接口 - 基础设施层
//!
//! `DesignHost` 是批量创建流程访问宿主的唯一入口，只暴露能力：
//! 创建页面、读取页面尺寸、读取当前背景色。
//! 宿主禁止并发创建页面，调用方保证同一时间只有一个 `create_page` 在执行。

use futures::future::BoxFuture;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::models::{PageDimensions, PageSpec};

/// 宿主返回的错误
///
/// 封闭枚举，编排层按变体决定：配额满直接终止、限流重试一次、其他直接终止。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// 设计中已无法再添加页面
    #[error("页面数量已达上限")]
    QuotaExceeded,
    /// 请求过于频繁
    #[error("请求过于频繁")]
    RateLimited,
    /// 其他错误（原样保留宿主消息）
    #[error("{0}")]
    Other(String),
}

impl HostError {
    /// 从宿主错误码分类
    pub fn from_code(code: &str, message: Option<&str>) -> Self {
        match code {
            "quota_exceeded" => HostError::QuotaExceeded,
            "rate_limited" => HostError::RateLimited,
            _ => HostError::Other(
                message
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| code.to_string()),
            ),
        }
    }

    /// 从宿主原始响应分类
    ///
    /// 结构化错误形如 `{"code": "...", "message": "..."}`；
    /// 不符合这个形状的响应整体作为 `Other` 的消息。
    pub fn from_response(response: &JsonValue) -> Self {
        match response.get("code").and_then(JsonValue::as_str) {
            Some(code) => {
                let message = response.get("message").and_then(JsonValue::as_str);
                Self::from_code(code, message)
            }
            None => HostError::Other(match response {
                JsonValue::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }
}

/// 宿主能力
pub trait DesignHost: Send + Sync {
    /// 创建一个页面。限流重试时会以完全相同的参数再调用一次。
    fn create_page<'a>(&'a self, spec: &'a PageSpec) -> BoxFuture<'a, Result<(), HostError>>;

    /// 默认页面尺寸，不可用时返回 `None`
    fn page_dimensions(&self) -> BoxFuture<'_, Option<PageDimensions>>;

    /// 当前页面的纯色背景（`#RRGGBB`），尽力而为
    fn current_background_color(&self) -> BoxFuture<'_, Result<Option<String>, HostError>>;
}
