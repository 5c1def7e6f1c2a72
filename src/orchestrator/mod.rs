//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 加载歌曲目录、选择歌曲、分页
//! - 输出最终统计信息
//!
//! ### `batch_creator` - 批量创建器
//! - 前置检查（歌词为空、页面尺寸、忙碌）
//! - 持有限流器，按顺序创建标题页和歌词页
//! - 汇总部分成功结果
//!
//! ## 层次关系
//!
//! ```text
//! app (一首歌)
//!     ↓
//! batch_creator (Vec<CreationUnit>)
//!     ↓
//! workflow::UnitFlow (单个页面)
//!     ↓
//! services (能力层：segment / rate_limiter / layout / song_catalog)
//!     ↓
//! infrastructure (基础设施：DesignHost)
//! ```

pub mod app;
pub mod batch_creator;

pub use app::App;
pub use batch_creator::BatchCreator;
