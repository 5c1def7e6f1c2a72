//! 创建单元
//!
//! 一次批量创建由若干单元组成：可选的标题页在最前，随后是按顺序排列的歌词页。

use std::fmt::Display;

use crate::models::{PageSpec, Slide, SlideBatchSpec, TitleUnit};
use crate::services::PageLayout;

/// 需要创建的一个页面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationUnit<'a> {
    /// 标题页
    Title(&'a TitleUnit),
    /// 歌词页，`index` 从 0 开始
    Lyric { index: usize, slide: &'a Slide },
}

impl<'a> CreationUnit<'a> {
    /// 按创建顺序列出所有单元：标题页（如有）→ 歌词页 0..N-1
    pub fn sequence(spec: &'a SlideBatchSpec) -> Vec<CreationUnit<'a>> {
        spec.title
            .iter()
            .map(CreationUnit::Title)
            .chain(
                spec.slides
                    .iter()
                    .enumerate()
                    .map(|(index, slide)| CreationUnit::Lyric { index, slide }),
            )
            .collect()
    }

    /// 生成创建参数
    pub fn page(&self, layout: &PageLayout) -> PageSpec {
        match self {
            CreationUnit::Title(title) => layout.title_page(title),
            CreationUnit::Lyric { index, slide } => layout.lyric_page(slide, *index),
        }
    }

    pub fn is_title(&self) -> bool {
        matches!(self, CreationUnit::Title(_))
    }
}

impl Display for CreationUnit<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreationUnit::Title(_) => write!(f, "[标题]"),
            CreationUnit::Lyric { index, .. } => write!(f, "[歌词 {}]", index + 1),
        }
    }
}
