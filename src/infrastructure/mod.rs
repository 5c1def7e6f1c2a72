//! 基础设施层
//!
//! 持有宿主资源，只暴露能力，不认识歌曲和幻灯片流程。

pub mod host;
pub mod simulated_host;

pub use host::{DesignHost, HostError};
pub use simulated_host::SimulatedHost;
