//! Document ingestion for ragcell.
//!
//! The pipeline takes already-decoded text (file parsing happens outside,
//! in the file-reader collaborator), chunks it, optionally embeds the
//! chunks, and appends them to the tenant's store. Failures are reported
//! structurally in the returned [`IngestOutcome`], never as `Err`: the
//! outer surface treats ingest problems as data, not exceptions.

mod pipeline;

pub use pipeline::{IngestMode, IngestPipeline};
