//! 批量创建器 - 编排层
//!
//! ## 职责
//!
//! 把一组分好的歌词页（以及可选的标题页）逐个创建到宿主中：
//!
//! 1. **前置检查**：歌词页为空、页面尺寸不可用、已有批次在进行，均在创建前失败
//! 2. **样式确定**：未指定背景色时尽力读取当前页面背景色
//! 3. **顺序创建**：标题页 → 歌词页 1..N，每个单元都经过限流器
//! 4. **结果汇总**：任何结局都收敛为 `BatchResult`，保留已创建数量
//!
//! 已创建的页面不会回滚。

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::RateLimitConfig;
use crate::infrastructure::DesignHost;
use crate::models::{BatchResult, SlideBatchSpec, StyleOptions};
use crate::services::{PageLayout, RateLimiter, ResolvedStyle};
use crate::workflow::{CreationUnit, Progress, ProgressSink, UnitFlow};

pub const EMPTY_SLIDES_MESSAGE: &str = "这首歌没有可显示的歌词。";
pub const NO_DIMENSIONS_MESSAGE: &str = "无法获取页面尺寸，当前设计可能不支持添加页面。";
pub const BUSY_MESSAGE: &str = "已有一批页面正在创建，请等待完成后再试。";

/// 批量创建器
///
/// 持有宿主和限流器。限流器放在 `Mutex` 里，一次批量创建在整个过程中持有它，
/// 同时发起的第二次批量创建会立即得到"忙碌"结果。
pub struct BatchCreator<H: DesignHost + ?Sized> {
    host: Arc<H>,
    limiter: Mutex<RateLimiter>,
}

impl<H: DesignHost + ?Sized> BatchCreator<H> {
    pub fn new(host: Arc<H>, rate_limit: &RateLimitConfig) -> Self {
        Self {
            host,
            limiter: Mutex::new(RateLimiter::new(rate_limit)),
        }
    }

    /// 是否有批次正在进行
    pub fn is_busy(&self) -> bool {
        self.limiter.try_lock().is_err()
    }

    /// 批量创建页面
    ///
    /// 不返回 `Err`，所有结局（包括部分成功）都在 `BatchResult` 中。
    pub async fn create_batch(
        &self,
        spec: &SlideBatchSpec,
        style: &StyleOptions,
        on_progress: Option<ProgressSink<'_>>,
    ) -> BatchResult {
        let total = spec.total_count();

        let Ok(mut limiter) = self.limiter.try_lock() else {
            warn!("[批次] ⚠️ 已有批次在进行，拒绝本次请求");
            return BatchResult::precondition_failed(total, BUSY_MESSAGE);
        };

        if spec.slides.is_empty() {
            warn!("[批次] ⚠️ 没有歌词页可创建");
            return BatchResult::precondition_failed(total, EMPTY_SLIDES_MESSAGE);
        }

        let Some(dimensions) = self.host.page_dimensions().await else {
            error!("[批次] ❌ 页面尺寸不可用");
            return BatchResult::precondition_failed(total, NO_DIMENSIONS_MESSAGE);
        };

        let layout = PageLayout::new(dimensions, self.resolve_style(style).await);
        limiter.reset();

        info!(
            "[批次] 🚀 开始创建 {} 页（标题页: {}，歌词页: {}）",
            total,
            if spec.title.is_some() { "是" } else { "否" },
            spec.slides.len()
        );

        let flow = UnitFlow::new(&*self.host, layout);
        let mut progress = Progress::new(total, on_progress);

        for unit in CreationUnit::sequence(spec) {
            if let Err(failure) = flow.run(&unit, &mut limiter, &mut progress).await {
                let created = progress.created();
                error!(
                    "[批次] ❌ {} 创建失败，已创建 {}/{}: {}",
                    unit, created, total, failure
                );
                return BatchResult::aborted(created, total, failure.message(created, total));
            }
        }

        info!("[批次] ✅ 全部 {} 页创建完成", total);
        BatchResult::completed(total)
    }

    /// 确定页面颜色，读取当前背景色失败只记录警告
    async fn resolve_style(&self, style: &StyleOptions) -> ResolvedStyle {
        let current = if style.background_color.is_some() {
            None
        } else {
            match self.host.current_background_color().await {
                Ok(color) => color,
                Err(e) => {
                    warn!("[批次] ⚠️ 无法读取当前背景色，使用默认值: {}", e);
                    None
                }
            }
        };
        ResolvedStyle::resolve(style, current)
    }
}
