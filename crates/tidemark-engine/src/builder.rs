use crate::ids::{IdGenerator, IncrementalIdGenerator};
use crate::model::StreamContent;
use crate::{pipeline, raw};

/// Rebuilds the full document model from the complete buffer.
///
/// Every build re-derives the model from scratch; nothing survives between
/// calls, so the same buffer always yields the same model, ids included. The
/// buffer is only read, never mutated.
#[derive(Debug, Clone, Default)]
pub struct StreamContentBuilder {
    pub buffer: String,
}

impl StreamContentBuilder {
    pub fn new(buffer: impl Into<String>) -> Self {
        Self {
            buffer: buffer.into(),
        }
    }

    pub fn build(&self) -> StreamContent {
        let raw = raw::split(&self.buffer);
        let mut ids = IncrementalIdGenerator::new();
        let content = pipeline::promote_markdown(&raw, ids.nested());
        let content = pipeline::extract_options(content, ids.nested());
        let content = pipeline::extract_inputs(content, ids.nested());
        let content = pipeline::promote_questions(content, ids.nested());
        pipeline::promote_widgets(content, ids.nested())
    }
}
