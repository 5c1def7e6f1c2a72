//! # Lyric Slides
//!
//! 把一首歌的歌词切分成若干页，在宿主设计应用中逐页创建幻灯片。
//! 宿主有严格的接口限流和页面配额，批量创建需要限流、重试并汇总部分成功。
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 宿主能力，只暴露接口
//! - `DesignHost` - 创建页面、读取页面尺寸、读取当前背景色
//! - `SimulatedHost` - 进程内模拟宿主（配额、服务端限流、注入失败）
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `segment` - 歌词分页
//! - `RateLimiter` - 滑动窗口限流
//! - `PageLayout` - 页面排版
//! - `SongCatalog` - 歌曲目录（远程 / 缓存 / 本地兜底）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个页面"的创建流程
//! - `CreationUnit` - 标题页或歌词页
//! - `UnitFlow` - 限流等待 → 创建 → 限流重试一次
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_creator` - 批量创建，前置检查与结果汇总
//! - `orchestrator/app` - 应用入口
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{DesignHost, HostError, SimulatedHost};
pub use models::{BatchResult, SlideBatchSpec, StyleOptions};
pub use orchestrator::{App, BatchCreator};
pub use services::{segment, RateLimiter};
pub use workflow::{CreationUnit, UnitFailure, UnitFlow};
