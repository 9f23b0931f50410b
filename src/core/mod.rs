pub mod aligner;
pub mod etl;
pub mod extract;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod roster;

pub use crate::domain::model::{AlignedRecord, Alignment, RawColumnSet, TransformResult};
pub use crate::domain::ports::{ConfigProvider, PageFetcher, Pipeline, Storage};
pub use crate::utils::error::Result;
