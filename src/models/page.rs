//! 页面创建参数
//!
//! `PageSpec` 是传给宿主 `create_page` 的完整参数，重试时原样复用。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 默认背景色（白）
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";
/// 默认文字颜色（黑）
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// 页面尺寸
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    pub width: f64,
    pub height: f64,
}

/// 文字对齐方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Start,
    Center,
    End,
}

/// 一段带格式的文字
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub font_size: f64,
    pub bold: bool,
    pub align: TextAlign,
    pub color: String,
}

/// 富文本内容：按顺序排列的若干段落
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RichContent {
    pub runs: Vec<TextRun>,
}

impl RichContent {
    /// 纯文本（段落之间以换行连接）
    pub fn plaintext(&self) -> String {
        self.runs
            .iter()
            .map(|run| run.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 文本框位置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPosition {
    pub top: f64,
    pub left: f64,
    pub width: f64,
}

/// 创建单个页面的参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub title: String,
    pub content: RichContent,
    pub position: TextPosition,
    pub background_color: String,
    pub text_color: String,
}

/// 样式选项，未设置的颜色使用默认值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOptions {
    pub background_color: Option<String>,
    pub text_color: Option<String>,
}

impl StyleOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for color in [&self.background_color, &self.text_color].into_iter().flatten() {
            validate_hex_color(color)?;
        }
        Ok(())
    }

    pub fn background_or_default(&self) -> &str {
        self.background_color
            .as_deref()
            .unwrap_or(DEFAULT_BACKGROUND_COLOR)
    }

    pub fn text_or_default(&self) -> &str {
        self.text_color.as_deref().unwrap_or(DEFAULT_TEXT_COLOR)
    }
}

/// 校验 `#RRGGBB` 格式
pub fn validate_hex_color(value: &str) -> Result<(), ConfigError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidColor {
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_validation() {
        assert!(validate_hex_color("#FF6B35").is_ok());
        assert!(validate_hex_color("#ff6b35").is_ok());
        assert!(validate_hex_color("FF6B35").is_err());
        assert!(validate_hex_color("#FF6B3").is_err());
        assert!(validate_hex_color("#GG6B35").is_err());
    }

    #[test]
    fn style_defaults() {
        let style = StyleOptions::default();
        assert_eq!(style.background_or_default(), DEFAULT_BACKGROUND_COLOR);
        assert_eq!(style.text_or_default(), DEFAULT_TEXT_COLOR);
        assert!(style.validate().is_ok());

        let bad = StyleOptions {
            background_color: Some("red".into()),
            text_color: None,
        };
        assert!(bad.validate().is_err());
    }
}
