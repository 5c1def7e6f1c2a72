//! 幻灯片相关数据模型

use crate::error::ConfigError;
use crate::models::song::{valid_artist, Song};

/// 一页幻灯片：连续、有序、非空的歌词行（不含空行）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    lines: Vec<String>,
}

impl Slide {
    pub(crate) fn new(lines: Vec<String>) -> Self {
        debug_assert!(!lines.is_empty());
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// 每页行数上下限，保证 `1 <= min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBounds {
    min: usize,
    max: usize,
}

impl SegmentBounds {
    pub fn new(min: usize, max: usize) -> Result<Self, ConfigError> {
        if min < 1 {
            return Err(ConfigError::MinLinesTooSmall { min });
        }
        if max < min {
            return Err(ConfigError::MaxBelowMin { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Default for SegmentBounds {
    fn default() -> Self {
        Self { min: 3, max: 4 }
    }
}

/// 标题页：歌名 + 可选歌手
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleUnit {
    pub title: String,
    pub artist: Option<String>,
}

impl TitleUnit {
    pub fn new(title: impl Into<String>, artist: Option<String>) -> Self {
        Self {
            title: title.into(),
            artist,
        }
    }

    pub fn from_song(song: &Song) -> Self {
        Self::new(song.title.clone(), song.artist.clone())
    }

    /// 有效的歌手名（空白视为没有）
    pub fn valid_artist(&self) -> Option<&str> {
        valid_artist(self.artist.as_deref())
    }
}

/// 一次批量创建的输入：有序的歌词页 + 可选标题页
///
/// 标题页不计入 `slides`，但计入批量结果的 `total_count`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideBatchSpec {
    pub slides: Vec<Slide>,
    pub title: Option<TitleUnit>,
}

impl SlideBatchSpec {
    pub fn new(slides: Vec<Slide>, title: Option<TitleUnit>) -> Self {
        Self { slides, title }
    }

    /// 需要创建的页面总数（含标题页）
    pub fn total_count(&self) -> usize {
        self.slides.len() + usize::from(self.title.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_reject_zero_min() {
        assert_eq!(
            SegmentBounds::new(0, 3),
            Err(ConfigError::MinLinesTooSmall { min: 0 })
        );
    }

    #[test]
    fn bounds_reject_max_below_min() {
        assert_eq!(
            SegmentBounds::new(4, 3),
            Err(ConfigError::MaxBelowMin { min: 4, max: 3 })
        );
        assert!(SegmentBounds::new(3, 3).is_ok());
    }

    #[test]
    fn total_count_includes_title() {
        let slides = vec![Slide::new(vec!["a".into()]), Slide::new(vec!["b".into()])];
        let with_title = SlideBatchSpec::new(slides.clone(), Some(TitleUnit::new("T", None)));
        let without_title = SlideBatchSpec::new(slides, None);
        assert_eq!(with_title.total_count(), 3);
        assert_eq!(without_title.total_count(), 2);
    }
}
