//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、创建歌曲目录、宿主和批量创建器
//! 2. **选择歌曲**：按 `song_query` 在目录中取第一个匹配
//! 3. **分页**：按配置的行数范围切分歌词
//! 4. **批量创建**：调用 `BatchCreator`，把进度写入日志
//! 5. **统计输出**：打印结果摘要
//!
//! 命令行版本的宿主是 `SimulatedHost`，运行结果相当于一次试运行。

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::SimulatedHost;
use crate::models::{filter_songs, BatchResult, SlideBatchSpec, Song, TitleUnit};
use crate::orchestrator::batch_creator::BatchCreator;
use crate::services::{segment, SongCatalog};
use crate::utils::logging::{log_batch_start, log_catalog, log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    catalog: SongCatalog,
    host: Arc<SimulatedHost>,
    creator: BatchCreator<SimulatedHost>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置无效")?;
        log_startup(&config);

        let catalog = SongCatalog::new(config.catalog.clone());
        let host = Arc::new(SimulatedHost::new(&config.host));
        let creator = BatchCreator::new(host.clone(), &config.rate_limit);

        Ok(Self {
            config,
            catalog,
            host,
            creator,
        })
    }

    /// 运行应用主逻辑
    ///
    /// 没有设置 `song_query` 时只列出目录，返回 `None`。
    pub async fn run(&self) -> Result<Option<BatchResult>> {
        info!("\n📁 正在加载歌曲目录...");
        let songs = self.load_catalog().await.context("加载歌曲目录失败")?;
        log_catalog(&songs);

        let Some(query) = self.config.song_query.as_deref() else {
            warn!("⚠️ 未设置 SONG_QUERY，只列出歌曲目录");
            return Ok(None);
        };

        let Some(song) = filter_songs(&songs, query).into_iter().next() else {
            bail!("没有找到匹配的歌曲: {}", query);
        };

        let result = self.create_song_slides(song).await?;
        Ok(Some(result))
    }

    /// 读取歌曲目录（缓存 → 远程 → 本地）
    pub async fn load_catalog(&self) -> AppResult<Vec<Song>> {
        Ok(self.catalog.load_songs().await?)
    }

    /// 为一首歌创建全部页面
    pub async fn create_song_slides(&self, song: &Song) -> Result<BatchResult> {
        let bounds = self.config.segment_bounds()?;
        let slides = segment(&song.lyrics, bounds);
        let title = self
            .config
            .include_title
            .then(|| TitleUnit::from_song(song));
        let spec = SlideBatchSpec::new(slides, title);

        log_batch_start(song, spec.slides.len(), spec.total_count());

        let mut on_progress = |current: usize, total: usize| {
            info!("[进度] 添加页面: {}/{}", current, total);
        };
        let result = self
            .creator
            .create_batch(&spec, &self.config.style(), Some(&mut on_progress))
            .await;

        print_final_stats(song, &result);
        Ok(result)
    }

    /// 宿主中已创建的页面数
    pub fn created_pages(&self) -> usize {
        self.host.pages().len()
    }
}
