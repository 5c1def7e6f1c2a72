//! 进度上报
//!
//! 记录已创建数量，并把 `(current, total)` 转发给调用方的回调。
//! `current` 保证不递减；同一个值可能上报两次（等待前一次，创建成功后一次）。

/// 进度回调
pub type ProgressSink<'p> = &'p mut (dyn FnMut(usize, usize) + Send);

pub struct Progress<'p> {
    sink: Option<ProgressSink<'p>>,
    created: usize,
    total: usize,
    last_reported: usize,
}

impl<'p> Progress<'p> {
    pub fn new(total: usize, sink: Option<ProgressSink<'p>>) -> Self {
        Self {
            sink,
            created: 0,
            total,
            last_reported: 0,
        }
    }

    /// 已确认创建的数量
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// 即将创建下一个页面（在限流等待之前调用）
    pub fn announce_next(&mut self) {
        self.report((self.created + 1).min(self.total));
    }

    /// 一个页面创建成功
    pub fn record_created(&mut self) {
        self.created += 1;
        self.report(self.created);
    }

    fn report(&mut self, current: usize) {
        let current = current.max(self.last_reported);
        self.last_reported = current;
        if let Some(sink) = self.sink.as_mut() {
            sink(current, self.total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_are_non_decreasing() {
        let mut seen = Vec::new();
        let mut sink = |current: usize, total: usize| seen.push((current, total));
        {
            let mut progress = Progress::new(3, Some(&mut sink));
            progress.announce_next();
            progress.record_created();
            progress.record_created();
            progress.announce_next();
            progress.record_created();
            assert_eq!(progress.created(), 3);
        }
        assert_eq!(seen, vec![(1, 3), (1, 3), (2, 3), (3, 3), (3, 3)]);
    }

    #[test]
    fn works_without_sink() {
        let mut progress = Progress::new(2, None);
        progress.announce_next();
        progress.record_created();
        assert_eq!(progress.created(), 1);
        assert_eq!(progress.total(), 2);
    }
}
