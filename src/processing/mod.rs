//! Summarization pipeline: chunking, two-phase generation, and output cleanup.
//!
//! The cleanup passes are plain functions over `&str` so they can be reused and tested in
//! isolation; [`pipeline::clean_summary`] chains them in the order the service applies them.

pub mod chunking;
pub mod dedupe;
pub mod pipeline;
pub mod repeats;
pub mod sanitize;
pub mod script;
mod service;
mod text;
pub mod types;

pub use pipeline::{PipelineOutput, SummaryPipeline, clean_summary};
pub use service::{SummaryApi, SummaryService};
pub use types::{
    ChunkingError, PipelineSettings, SummarizeError, SummaryLength, SummaryOutcome, SummaryRequest,
};
