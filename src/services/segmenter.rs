//! 歌词分页 - 业务能力层
//!
//! 纯函数：把歌词行切分成若干页，不访问宿主、不含随机性。

use crate::models::{SegmentBounds, Slide};

/// 按每页行数上下限切分歌词
///
/// 规则：
/// 1. 先去掉空行（只含空白的行也算空行）
/// 2. 去掉后为空 → 返回空列表
/// 3. 行数 `<= min` → 全部放在一页（短歌不拆）
/// 4. 否则依次放入当前页；当前页已有 `>= min` 行且再加一行会超过 `max` 时，
///    当前页结束，该行作为新一页的第一行
/// 5. 最后一页不足 `min` 行也保留，任何一行都不会被丢弃
pub fn segment<S: AsRef<str>>(lines: &[S], bounds: SegmentBounds) -> Vec<Slide> {
    let filtered: Vec<String> = lines
        .iter()
        .map(AsRef::as_ref)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    if filtered.is_empty() {
        return Vec::new();
    }

    if filtered.len() <= bounds.min() {
        return vec![Slide::new(filtered)];
    }

    let mut slides = Vec::new();
    let mut current: Vec<String> = Vec::with_capacity(bounds.max());

    for line in filtered {
        if current.len() >= bounds.min() && current.len() + 1 > bounds.max() {
            slides.push(Slide::new(std::mem::take(&mut current)));
        }
        current.push(line);
    }

    if !current.is_empty() {
        slides.push(Slide::new(current));
    }

    slides
}
