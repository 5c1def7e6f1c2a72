//! 模拟宿主 - 基础设施层
//!
//! 在进程内实现 `DesignHost`：页面配额、服务端滑动窗口限流、
//! 可选的调用耗时，以及按调用顺序注入的失败。
//! 命令行试运行和测试都用它代替真实的设计应用。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tokio::time::Instant;
use tracing::debug;

use crate::config::SimulatedHostConfig;
use crate::infrastructure::host::{DesignHost, HostError};
use crate::models::{PageDimensions, PageSpec};

#[derive(Debug, Default)]
struct HostState {
    pages: Vec<PageSpec>,
    /// 服务端视角的最近创建时间
    recent: VecDeque<Instant>,
    /// 每次调用的脚本：`Some(err)` 强制失败，`None` 按正常规则处理
    script: VecDeque<Option<HostError>>,
    attempts: Vec<(Instant, String)>,
}

/// 模拟宿主
pub struct SimulatedHost {
    page_quota: usize,
    server_max_per_window: usize,
    server_window: Duration,
    dimensions: Option<PageDimensions>,
    background: Result<Option<String>, HostError>,
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    state: Mutex<HostState>,
}

impl SimulatedHost {
    pub fn new(config: &SimulatedHostConfig) -> Self {
        Self {
            page_quota: config.page_quota,
            server_max_per_window: config.server_max_per_window.max(1),
            server_window: config.server_window(),
            dimensions: Some(config.dimensions()),
            background: Ok(config.background_color.clone()),
            latency: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            state: Mutex::new(HostState::default()),
        }
    }

    /// 页面尺寸不可用
    pub fn without_dimensions(mut self) -> Self {
        self.dimensions = None;
        self
    }

    /// 读取背景色时报错
    pub fn with_background_error(mut self, error: HostError) -> Self {
        self.background = Err(error);
        self
    }

    /// 每次创建调用的耗时
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// 按调用顺序注入结果
    pub fn with_script(self, script: impl IntoIterator<Item = Option<HostError>>) -> Self {
        self.lock().script = script.into_iter().collect();
        self
    }

    /// 已创建的页面
    pub fn pages(&self) -> Vec<PageSpec> {
        self.lock().pages.clone()
    }

    /// 所有创建调用（含失败）的页面标题
    pub fn attempted_titles(&self) -> Vec<String> {
        self.lock().attempts.iter().map(|(_, t)| t.clone()).collect()
    }

    /// 所有创建调用的开始时间
    pub fn attempt_times(&self) -> Vec<Instant> {
        self.lock().attempts.iter().map(|(at, _)| *at).collect()
    }

    pub fn call_count(&self) -> usize {
        self.lock().attempts.len()
    }

    /// 观察到的最大并发创建数
    pub fn max_concurrent_calls(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn create(&self, spec: &PageSpec) -> Result<(), HostError> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let started = Instant::now();
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let result = self.apply(started, spec);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn apply(&self, started: Instant, spec: &PageSpec) -> Result<(), HostError> {
        let now = Instant::now();
        let mut state = self.lock();
        state.attempts.push((started, spec.title.clone()));

        if let Some(Some(error)) = state.script.pop_front() {
            debug!("[模拟宿主] 注入失败: {} ({})", error, spec.title);
            return Err(error);
        }

        let window = self.server_window;
        while let Some(front) = state.recent.front() {
            if now.saturating_duration_since(*front) >= window {
                state.recent.pop_front();
            } else {
                break;
            }
        }
        if state.recent.len() >= self.server_max_per_window {
            debug!("[模拟宿主] 服务端限流: {}", spec.title);
            return Err(HostError::RateLimited);
        }
        if state.pages.len() >= self.page_quota {
            debug!("[模拟宿主] 配额已满: {}", spec.title);
            return Err(HostError::QuotaExceeded);
        }

        state.pages.push(spec.clone());
        state.recent.push_back(now);
        debug!("[模拟宿主] 已创建: {} (共 {} 页)", spec.title, state.pages.len());
        Ok(())
    }
}

impl DesignHost for SimulatedHost {
    fn create_page<'a>(&'a self, spec: &'a PageSpec) -> BoxFuture<'a, Result<(), HostError>> {
        self.create(spec).boxed()
    }

    fn page_dimensions(&self) -> BoxFuture<'_, Option<PageDimensions>> {
        let dimensions = self.dimensions;
        async move { dimensions }.boxed()
    }

    fn current_background_color(&self) -> BoxFuture<'_, Result<Option<String>, HostError>> {
        let background = self.background.clone();
        async move { background }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RichContent, TextPosition};

    fn spec(title: &str) -> PageSpec {
        PageSpec {
            title: title.to_string(),
            content: RichContent::default(),
            position: TextPosition {
                top: 0.0,
                left: 0.0,
                width: 100.0,
            },
            background_color: "#FFFFFF".into(),
            text_color: "#000000".into(),
        }
    }

    fn config(quota: usize, max: usize, window_ms: u64) -> SimulatedHostConfig {
        SimulatedHostConfig {
            page_quota: quota,
            server_max_per_window: max,
            server_window_ms: window_ms,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn enforces_server_window() {
        let host = SimulatedHost::new(&config(10, 1, 1000));
        assert_eq!(host.create_page(&spec("1")).await, Ok(()));
        assert_eq!(host.create_page(&spec("2")).await, Err(HostError::RateLimited));

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert_eq!(host.create_page(&spec("2")).await, Ok(()));
        assert_eq!(host.pages().len(), 2);
        assert_eq!(host.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_calls_are_counted() {
        let host = SimulatedHost::new(&config(10, 10, 1000)).with_latency(Duration::from_millis(5));
        let (a, b) = (spec("1"), spec("2"));

        let (first, second) = tokio::join!(host.create_page(&a), host.create_page(&b));
        assert_eq!(first, Ok(()));
        assert_eq!(second, Ok(()));
        assert_eq!(host.max_concurrent_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_calls_never_overlap() {
        let host = SimulatedHost::new(&config(10, 10, 1000)).with_latency(Duration::from_millis(5));
        assert_eq!(host.create_page(&spec("1")).await, Ok(()));
        assert_eq!(host.create_page(&spec("2")).await, Ok(()));
        assert_eq!(host.max_concurrent_calls(), 1);
    }

    #[tokio::test]
    async fn enforces_page_quota() {
        let host = SimulatedHost::new(&config(1, 10, 1000));
        assert_eq!(host.create_page(&spec("1")).await, Ok(()));
        assert_eq!(host.create_page(&spec("2")).await, Err(HostError::QuotaExceeded));
    }

    #[test]
    fn script_is_applied_in_call_order() {
        let host = SimulatedHost::new(&config(10, 10, 1000))
            .with_script([None, Some(HostError::Other("boom".into()))]);

        tokio_test::block_on(async {
            assert_eq!(host.create_page(&spec("1")).await, Ok(()));
            assert_eq!(
                host.create_page(&spec("2")).await,
                Err(HostError::Other("boom".into()))
            );
            assert_eq!(host.create_page(&spec("3")).await, Ok(()));
        });
        assert_eq!(host.attempted_titles(), vec!["1", "2", "3"]);
        assert_eq!(host.pages().len(), 2);
    }

    #[tokio::test]
    async fn dimensions_and_background() {
        let host = SimulatedHost::new(&SimulatedHostConfig::default());
        assert!(host.page_dimensions().await.is_some());
        assert_eq!(host.current_background_color().await, Ok(None));

        let host = SimulatedHost::new(&SimulatedHostConfig::default())
            .without_dimensions()
            .with_background_error(HostError::Other("no session".into()));
        assert!(host.page_dimensions().await.is_none());
        assert!(host.current_background_color().await.is_err());
    }
}
