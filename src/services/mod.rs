pub mod layout;
pub mod rate_limiter;
pub mod segmenter;
pub mod song_catalog;

pub use layout::{PageLayout, ResolvedStyle};
pub use rate_limiter::RateLimiter;
pub use segmenter::segment;
pub use song_catalog::{CacheStatus, SongCatalog};
