//! 页面排版 - 业务能力层
//!
//! 只负责把标题/歌词转换成 `PageSpec`：文字内容、字号、位置。
//! 排版只保证文字不被页面边缘截断，不做更复杂的版式。

use crate::models::{
    PageDimensions, PageSpec, RichContent, Slide, StyleOptions, TextAlign, TextPosition, TextRun,
    TitleUnit,
};

/// 歌词字号
pub const FONT_SIZE: f64 = 48.0;
/// 标题页歌名字号
pub const TITLE_FONT_SIZE: f64 = 80.0;
/// 行高倍数
pub const LINE_HEIGHT: f64 = 1.4;
/// 上下留白占页面高度的比例
pub const VERTICAL_PADDING_RATIO: f64 = 0.1;
/// 左右留白占页面宽度的比例
pub const HORIZONTAL_PADDING_RATIO: f64 = 0.1;
/// 文字整体相对居中位置上移的比例
pub const CENTER_OFFSET_RATIO: f64 = 0.05;

/// 解析后的页面样式（颜色已确定）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub background_color: String,
    pub text_color: String,
}

impl ResolvedStyle {
    /// 用户未指定背景色时依次使用当前页面背景色、默认白色
    pub fn resolve(style: &StyleOptions, current_background: Option<String>) -> Self {
        let background_color = style
            .background_color
            .clone()
            .or(current_background)
            .unwrap_or_else(|| style.background_or_default().to_string());
        Self {
            background_color,
            text_color: style.text_or_default().to_string(),
        }
    }
}

/// 页面排版器
#[derive(Debug, Clone)]
pub struct PageLayout {
    dimensions: PageDimensions,
    style: ResolvedStyle,
}

impl PageLayout {
    pub fn new(dimensions: PageDimensions, style: ResolvedStyle) -> Self {
        Self { dimensions, style }
    }

    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    /// 标题页：加粗歌名，可选歌手名（中间空一行）
    pub fn title_page(&self, title: &TitleUnit) -> PageSpec {
        let mut runs = vec![self.run(&title.title, TITLE_FONT_SIZE, true)];
        let mut text_height = TITLE_FONT_SIZE * LINE_HEIGHT;

        if let Some(artist) = title.valid_artist() {
            runs.push(self.run("", FONT_SIZE, false));
            runs.push(self.run(artist, FONT_SIZE, false));
            text_height += FONT_SIZE * LINE_HEIGHT * 1.5;
        }

        PageSpec {
            title: format!("标题: {}", title.title),
            content: RichContent { runs },
            position: self.position(text_height),
            background_color: self.style.background_color.clone(),
            text_color: self.style.text_color.clone(),
        }
    }

    /// 歌词页：每行一个居中段落；`index` 从 0 开始
    pub fn lyric_page(&self, slide: &Slide, index: usize) -> PageSpec {
        let runs = slide
            .lines()
            .iter()
            .map(|line| self.run(line, FONT_SIZE, false))
            .collect();
        let text_height = slide.len() as f64 * FONT_SIZE * LINE_HEIGHT;

        PageSpec {
            title: format!("歌词 {}", index + 1),
            content: RichContent { runs },
            position: self.position(text_height),
            background_color: self.style.background_color.clone(),
            text_color: self.style.text_color.clone(),
        }
    }

    fn run(&self, text: &str, font_size: f64, bold: bool) -> TextRun {
        TextRun {
            text: text.to_string(),
            font_size,
            bold,
            align: TextAlign::Center,
            color: self.style.text_color.clone(),
        }
    }

    /// 水平居中；垂直方向略高于居中，且不低于上留白、不超出下留白
    fn position(&self, text_height: f64) -> TextPosition {
        let PageDimensions { width, height } = self.dimensions;

        let horizontal_padding = width * HORIZONTAL_PADDING_RATIO;
        let text_width = width - horizontal_padding * 2.0;
        let left = (width - text_width) / 2.0;

        let vertical_padding = height * VERTICAL_PADDING_RATIO;
        let max_top = height - text_height - vertical_padding;
        let centered_top = (height - text_height) / 2.0 - height * CENTER_OFFSET_RATIO;
        let top = vertical_padding.max(centered_top.min(max_top));

        TextPosition {
            top,
            left,
            width: text_width,
        }
    }
}
