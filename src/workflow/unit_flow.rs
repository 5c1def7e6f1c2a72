//! 单元创建流程 - 流程层
//!
//! 定义"一个页面"的完整创建流程：
//!
//! 1. 询问限流器需要等待多久；需要等待时先上报进度，再等待
//! 2. 调用宿主创建页面
//! 3. 按 `HostError` 分类：配额满 / 其他错误直接失败，限流则退避后重试一次
//!
//! 标题页和歌词页走同一条路径、同一个重试策略。

use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::infrastructure::{DesignHost, HostError};
use crate::models::PageSpec;
use crate::services::{PageLayout, RateLimiter};
use crate::utils::logging::truncate_text;
use crate::workflow::creation_unit::CreationUnit;
use crate::workflow::progress::Progress;

/// 单元创建失败的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitFailure {
    /// 设计中已无法再添加页面（首次或重试时）
    QuotaExceeded,
    /// 限流重试后仍然失败
    RetryExhausted(HostError),
    /// 其他宿主错误，不重试
    Fatal(String),
}

impl UnitFailure {
    /// 面向用户的提示，已创建数量 > 0 时说明部分成功
    pub fn message(&self, created: usize, total: usize) -> String {
        let partial = |tail: &str| format!("已创建 {} / {} 页。{}", created, total, tail);
        match self {
            UnitFailure::QuotaExceeded if created > 0 => {
                partial("无法再添加更多页面，请删除部分页面后重试。")
            }
            UnitFailure::QuotaExceeded => "无法再添加更多页面，请删除部分页面后重试。".to_string(),
            UnitFailure::RetryExhausted(_) if created > 0 => {
                partial("添加页面过于频繁，请稍后继续。")
            }
            UnitFailure::RetryExhausted(_) => "添加页面过于频繁，请稍后重试。".to_string(),
            UnitFailure::Fatal(message) if created > 0 => partial(message),
            UnitFailure::Fatal(message) => message.clone(),
        }
    }
}

impl Display for UnitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitFailure::QuotaExceeded => write!(f, "配额已满"),
            UnitFailure::RetryExhausted(e) => write!(f, "重试后仍失败: {}", e),
            UnitFailure::Fatal(message) => write!(f, "{}", message),
        }
    }
}

/// 单元创建流程
///
/// - 不持有限流器和进度，由批量创建器逐个传入
/// - 同一时间只有一个 `create_page` 调用
pub struct UnitFlow<'h, H: DesignHost + ?Sized> {
    host: &'h H,
    layout: PageLayout,
}

impl<'h, H: DesignHost + ?Sized> UnitFlow<'h, H> {
    pub fn new(host: &'h H, layout: PageLayout) -> Self {
        Self { host, layout }
    }

    /// 创建一个单元
    pub async fn run(
        &self,
        unit: &CreationUnit<'_>,
        limiter: &mut RateLimiter,
        progress: &mut Progress<'_>,
    ) -> Result<(), UnitFailure> {
        let page = unit.page(&self.layout);
        debug!("{} 📄 {}", unit, truncate_text(&page.content.plaintext(), 40));

        let delay = limiter.delay_before_next_creation();
        if !delay.is_zero() {
            progress.announce_next();
            info!("{} ⏳ 等待 {} ms 后创建", unit, delay.as_millis());
            tokio::time::sleep(delay).await;
        }

        match self.host.create_page(&page).await {
            Ok(()) => {
                self.confirm(unit, limiter, progress);
                Ok(())
            }
            Err(HostError::QuotaExceeded) => {
                warn!("{} ❌ 页面数量已达上限", unit);
                Err(UnitFailure::QuotaExceeded)
            }
            Err(HostError::RateLimited) => self.retry(unit, &page, limiter, progress).await,
            Err(HostError::Other(message)) => {
                warn!("{} ❌ 宿主错误: {}", unit, message);
                Err(UnitFailure::Fatal(message))
            }
        }
    }

    /// 限流后的唯一一次重试
    async fn retry(
        &self,
        unit: &CreationUnit<'_>,
        page: &PageSpec,
        limiter: &mut RateLimiter,
        progress: &mut Progress<'_>,
    ) -> Result<(), UnitFailure> {
        let backoff = limiter.retry_backoff();
        warn!(
            "{} ⚠️ 被宿主限流，{} ms 后重试一次",
            unit,
            backoff.as_millis()
        );
        tokio::time::sleep(backoff).await;
        limiter.reset();

        match self.host.create_page(page).await {
            Ok(()) => {
                info!("{} 🔁 重试成功", unit);
                self.confirm(unit, limiter, progress);
                Ok(())
            }
            Err(HostError::QuotaExceeded) => {
                warn!("{} ❌ 重试时页面数量已达上限", unit);
                Err(UnitFailure::QuotaExceeded)
            }
            Err(e) => {
                warn!("{} ❌ 重试失败: {}", unit, e);
                Err(UnitFailure::RetryExhausted(e))
            }
        }
    }

    fn confirm(&self, unit: &CreationUnit<'_>, limiter: &mut RateLimiter, progress: &mut Progress<'_>) {
        limiter.record_creation();
        progress.record_created();
        info!(
            "{} ✓ 已创建 ({}/{})，窗口内 {} 次",
            unit,
            progress.created(),
            progress.total(),
            limiter.in_window()
        );
    }
}
