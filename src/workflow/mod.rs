//! 流程层（Workflow Layer）
//!
//! 定义"一个页面"的创建流程：限流等待 → 创建 → 分类错误 → 必要时重试一次。
//! 批量创建器逐个单元调用这里的流程。

pub mod creation_unit;
pub mod progress;
pub mod unit_flow;

pub use creation_unit::CreationUnit;
pub use progress::{Progress, ProgressSink};
pub use unit_flow::{UnitFailure, UnitFlow};
