#![allow(clippy::missing_docs_in_private_items)]

pub mod fetcher;
pub mod pipeline;
pub mod report;
pub mod sampler;

pub use fetcher::{HttpFetcher, IndexFetcher};
pub use pipeline::{QueryRequest, XrefPipeline};
pub use report::{ExampleReport, QueryOutcome};
