//! 页面创建限流器 - 业务能力层
//!
//! 滑动窗口准入控制：记录最近的创建时间戳，计算下一次创建前需要等待多久。
//! 限流器本身不等待，等待由调用方（批量创建流程）完成。
//!
//! 时钟使用 `tokio::time::Instant`，测试中可以通过暂停 tokio 时钟精确控制。

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::config::RateLimitConfig;

/// 滑动窗口限流器
///
/// 每个批量创建流程持有一个实例，批次开始时 `reset()`。
#[derive(Debug)]
pub struct RateLimiter {
    max_per_window: usize,
    window: Duration,
    min_spacing: Duration,
    safety_buffer: Duration,
    /// 最近的创建完成时间，按时间先后排列
    recent: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_per_window: config.max_creations_per_window.max(1),
            window: config.window(),
            min_spacing: config.min_spacing(),
            safety_buffer: config.safety_buffer(),
            recent: VecDeque::with_capacity(config.max_creations_per_window.max(1) + 1),
        }
    }

    /// 下一次创建前需要等待的时长（基于当前时间）
    pub fn delay_before_next_creation(&self) -> Duration {
        self.delay_at(Instant::now())
    }

    /// 下一次创建前需要等待的时长（基于给定时间），不修改状态
    pub fn delay_at(&self, now: Instant) -> Duration {
        let live: Vec<Instant> = self
            .recent
            .iter()
            .copied()
            .filter(|ts| !self.is_expired(*ts, now))
            .collect();

        debug!(
            "[限流] 计算等待时间，窗口内创建次数: {}/{}",
            live.len(),
            self.max_per_window
        );

        if live.len() < self.max_per_window {
            let Some(last) = live.last() else {
                return Duration::ZERO;
            };
            let since_last = now.saturating_duration_since(*last);
            if since_last < self.min_spacing {
                let delay = self.min_spacing - since_last;
                debug!(
                    "[限流] 距上次创建 {}ms，不足最小间隔 {}ms，需要等待 {}ms",
                    since_last.as_millis(),
                    self.min_spacing.as_millis(),
                    delay.as_millis()
                );
                return delay;
            }
            return Duration::ZERO;
        }

        // 已达上限：等到窗口内最早的一次过期，再加安全余量
        let oldest = live[0];
        let since_oldest = now.saturating_duration_since(oldest);
        let wait = self.window.saturating_sub(since_oldest) + self.safety_buffer;
        let delay = wait.max(self.min_spacing);
        debug!(
            "[限流] 已达上限，距最早一次 {}ms，窗口 {}ms，等待 {}ms",
            since_oldest.as_millis(),
            self.window.as_millis(),
            delay.as_millis()
        );
        delay
    }

    /// 记录一次创建（必须在宿主确认创建成功之后调用）
    pub fn record_creation(&mut self) {
        self.record_at(Instant::now());
    }

    pub fn record_at(&mut self, now: Instant) {
        self.purge(now);
        self.recent.push_back(now);
        debug!("[限流] 记录创建，窗口内共 {} 次", self.recent.len());
    }

    /// 清空所有记录
    pub fn reset(&mut self) {
        if !self.recent.is_empty() {
            debug!("[限流] 重置，丢弃 {} 条记录", self.recent.len());
        }
        self.recent.clear();
    }

    /// 被宿主限流后重试前的固定等待：整个窗口 + 两倍安全余量
    pub fn retry_backoff(&self) -> Duration {
        self.window + self.safety_buffer * 2
    }

    /// 给定时间点窗口内的创建次数
    pub fn in_window_at(&self, now: Instant) -> usize {
        self.recent
            .iter()
            .filter(|ts| !self.is_expired(**ts, now))
            .count()
    }

    pub fn in_window(&self) -> usize {
        self.in_window_at(Instant::now())
    }

    fn is_expired(&self, ts: Instant, now: Instant) -> bool {
        now.saturating_duration_since(ts) >= self.window
    }

    fn purge(&mut self, now: Instant) {
        while let Some(front) = self.recent.front() {
            if self.is_expired(*front, now) {
                self.recent.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: usize, window: u64, spacing: u64, buffer: u64) -> RateLimitConfig {
        RateLimitConfig {
            max_creations_per_window: max,
            window_ms: window,
            min_spacing_ms: spacing,
            safety_buffer_ms: buffer,
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn no_delay_after_reset() {
        let mut limiter = RateLimiter::new(&RateLimitConfig::default());
        let t0 = Instant::now();
        limiter.record_at(t0);
        assert!(limiter.delay_at(t0) > Duration::ZERO);

        limiter.reset();
        assert_eq!(limiter.delay_at(t0), Duration::ZERO);
        assert_eq!(limiter.in_window_at(t0), 0);
    }

    #[test]
    fn fresh_limiter_has_no_delay() {
        let limiter = RateLimiter::new(&RateLimitConfig::default());
        assert_eq!(limiter.delay_before_next_creation(), Duration::ZERO);
    }

    #[test]
    fn below_ceiling_only_min_spacing_applies() {
        let mut limiter = RateLimiter::new(&config(3, 1000, 400, 50));
        let t0 = Instant::now();
        limiter.record_at(t0);

        assert_eq!(limiter.delay_at(t0 + ms(100)), ms(300));
        assert_eq!(limiter.delay_at(t0 + ms(400)), Duration::ZERO);
        assert_eq!(limiter.delay_at(t0 + ms(900)), Duration::ZERO);
    }

    #[test]
    fn at_ceiling_waits_for_oldest_to_expire() {
        let mut limiter = RateLimiter::new(&config(2, 1000, 100, 50));
        let t0 = Instant::now();
        limiter.record_at(t0);
        limiter.record_at(t0 + ms(300));

        // 1000 - 400 + 50
        assert_eq!(limiter.delay_at(t0 + ms(400)), ms(650));
        // 最早一次过期后只剩最小间隔约束
        assert_eq!(limiter.delay_at(t0 + ms(1000)), Duration::ZERO);
    }

    #[test]
    fn at_ceiling_delay_is_floored_at_min_spacing() {
        let mut limiter = RateLimiter::new(&config(1, 1000, 800, 0));
        let t0 = Instant::now();
        limiter.record_at(t0);

        // 窗口剩余 100ms，但最小间隔是 800ms
        assert_eq!(limiter.delay_at(t0 + ms(900)), ms(800));
    }

    #[test]
    fn default_policy_delays() {
        let mut limiter = RateLimiter::new(&RateLimitConfig::default());
        let t0 = Instant::now();
        limiter.record_at(t0);

        // 上限 1：3000 - 0 + 200
        assert_eq!(limiter.delay_at(t0), ms(3200));
        assert_eq!(limiter.delay_at(t0 + ms(1000)), ms(2200));
        // 超过窗口后记录过期
        assert_eq!(limiter.delay_at(t0 + ms(3000)), Duration::ZERO);
        assert_eq!(limiter.retry_backoff(), ms(3400));
    }

    #[test]
    fn record_purges_expired_entries() {
        let mut limiter = RateLimiter::new(&config(5, 1000, 0, 0));
        let t0 = Instant::now();
        limiter.record_at(t0);
        limiter.record_at(t0 + ms(200));
        limiter.record_at(t0 + ms(1100));

        assert_eq!(limiter.recent.len(), 2);
        assert_eq!(limiter.in_window_at(t0 + ms(1100)), 2);
        assert_eq!(limiter.in_window_at(t0 + ms(1250)), 1);
    }

    #[test]
    fn honoring_delays_never_exceeds_ceiling() {
        for (max, window, spacing, buffer) in [
            (1, 3000, 2000, 200),
            (3, 1000, 0, 0),
            (3, 1000, 100, 20),
            (5, 2500, 50, 0),
            (2, 500, 600, 10),
        ] {
            let mut limiter = RateLimiter::new(&config(max, window, spacing, buffer));
            let mut now = Instant::now();
            let mut created = Vec::new();

            for step in 0..50u64 {
                now += limiter.delay_at(now);
                limiter.record_at(now);
                created.push(now);
                // 模拟调用本身的耗时
                now += ms(step % 7 * 13);
            }

            for i in 0..created.len().saturating_sub(max) {
                let span = created[i + max].duration_since(created[i]);
                assert!(
                    span >= ms(window),
                    "max={} window={} span={:?}",
                    max,
                    window,
                    span
                );
            }
        }
    }
}
