/// 日志工具模块
///
/// 初始化 tracing 订阅者，并提供日志格式化和输出的辅助函数
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{BatchResult, Song};

/// 初始化日志
///
/// `RUST_LOG` 优先；未设置时默认 `info`，`verbose` 为真时为 `debug`。
/// 重复调用不会报错。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 歌词幻灯片生成");
    info!(
        "📐 每页行数: {}-{}，标题页: {}",
        config.min_lines_per_slide,
        config.max_lines_per_slide,
        if config.include_title { "是" } else { "否" }
    );
    info!(
        "⏱️ 限流: 每 {} ms 最多 {} 次，最小间隔 {} ms",
        config.rate_limit.window_ms,
        config.rate_limit.max_creations_per_window,
        config.rate_limit.min_spacing_ms
    );
    info!("{}", "=".repeat(60));
}

/// 记录歌曲目录
pub fn log_catalog(songs: &[Song]) {
    info!("✓ 找到 {} 首歌曲", songs.len());
    for (i, song) in songs.iter().enumerate() {
        info!("  {}. {}", i + 1, song.display_name());
    }
}

/// 记录批次开始信息
pub fn log_batch_start(song: &Song, slides: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("🎵 {}", song.display_name());
    info!("📄 歌词页: {}，共需创建: {} 页", slides, total);
    info!("{}", "=".repeat(60));
}

/// 面向用户的结果摘要
///
/// 部分成功的错误消息本身已包含"已创建 k / n 页"。
pub fn summary(result: &BatchResult) -> String {
    match &result.error {
        None => format!("已添加 {} 页", result.created_count),
        Some(error) => error.clone(),
    }
}

/// 打印最终统计信息
pub fn print_final_stats(song: &Song, result: &BatchResult) {
    info!("\n{}", "=".repeat(60));
    info!("📊 创建完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🎵 歌曲: {}", song.display_name());
    info!("✅ 已创建: {}/{}", result.created_count, result.total_count);
    if result.is_complete() {
        info!("💬 {}", summary(result));
    } else {
        warn!("💬 {}", summary(result));
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
