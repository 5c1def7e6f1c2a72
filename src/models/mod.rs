pub mod batch_result;
pub mod page;
pub mod slide;
pub mod song;

pub use batch_result::BatchResult;
pub use page::{
    validate_hex_color, PageDimensions, PageSpec, RichContent, StyleOptions, TextAlign,
    TextPosition, TextRun, DEFAULT_BACKGROUND_COLOR, DEFAULT_TEXT_COLOR,
};
pub use slide::{SegmentBounds, Slide, SlideBatchSpec, TitleUnit};
pub use song::{filter_songs, Song};
