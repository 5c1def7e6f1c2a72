//! 批量创建结果

use serde::Serialize;

/// 一次批量创建的最终结果
///
/// - `total_count` 在请求了标题页时包含标题页
/// - `created_count` 等于宿主确认创建的页面数，部分失败时同样准确
/// - 只要有页面创建成功，中途失败也视为 `success`（部分成功），
///   此时 `error` 给出原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub success: bool,
    pub created_count: usize,
    pub total_count: usize,
    pub error: Option<String>,
}

impl BatchResult {
    /// 全部创建成功
    pub fn completed(total_count: usize) -> Self {
        Self {
            success: true,
            created_count: total_count,
            total_count,
            error: None,
        }
    }

    /// 在创建任何页面之前失败
    pub fn precondition_failed(total_count: usize, error: impl Into<String>) -> Self {
        Self {
            success: false,
            created_count: 0,
            total_count,
            error: Some(error.into()),
        }
    }

    /// 中途失败，保留已创建数量
    pub fn aborted(created_count: usize, total_count: usize, error: impl Into<String>) -> Self {
        Self {
            success: created_count > 0,
            created_count,
            total_count,
            error: Some(error.into()),
        }
    }

    /// 是否所有页面都已创建
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.created_count == self.total_count
    }
}
