use super::blocks::{Block, BlockKind, parse_blocks};

/// A run of prose blocks, with an optional collapsed rendering.
///
/// Equality is defined on the two raw strings only; the block lists are
/// derived data.
#[derive(Debug, Clone)]
pub struct MarkdownEntry {
    pub blocks: Vec<Block>,
    pub raw_content: String,
    pub collapsed: Option<Vec<Block>>,
    pub raw_collapsed: Option<String>,
}

impl MarkdownEntry {
    pub fn collapsible(&self) -> bool {
        self.collapsed.is_some()
    }
}

impl PartialEq for MarkdownEntry {
    fn eq(&self, other: &Self) -> bool {
        self.raw_content == other.raw_content && self.raw_collapsed == other.raw_collapsed
    }
}

impl Eq for MarkdownEntry {}

/// Accumulates prose blocks between tables and flushes them as entries.
#[derive(Debug, Default)]
pub struct EntryBuilder {
    pub blocks: Vec<Block>,
}

impl EntryBuilder {
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Drops trailing partial table-row text: a final paragraph containing a
    /// `|` is the start of a table that never materialized.
    pub fn cleanup(&mut self) {
        while let Some(block) = self.blocks.last() {
            let partial = matches!(&block.kind, BlockKind::Paragraph { text } if text.contains('|'));
            if !partial {
                break;
            }
            self.blocks.pop();
        }
    }

    pub fn build(&self) -> Option<MarkdownEntry> {
        if self.blocks.is_empty() {
            return None;
        }
        let raw_content = render(&self.blocks);
        let candidate = collapse(&self.blocks);
        // collapsing is only worth surfacing when it saves real space
        let (collapsed, raw_collapsed) =
            if raw_content.chars().count() > candidate.chars().count() + 20 {
                (Some(parse_blocks(&candidate)), Some(candidate))
            } else {
                (None, None)
            };
        Some(MarkdownEntry {
            blocks: self.blocks.clone(),
            raw_content,
            collapsed,
            raw_collapsed,
        })
    }

    pub fn build_and_clear(&mut self) -> Option<MarkdownEntry> {
        let entry = self.build();
        self.blocks.clear();
        entry
    }
}

fn render(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| block.raw.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Truncates each run of body blocks after its first paragraph, keeping
/// heading runs whole, and marks shortened runs with a ` ..` suffix.
fn collapse(blocks: &[Block]) -> String {
    let mut sections: Vec<String> = Vec::new();
    let mut index = 0;
    while index < blocks.len() {
        let heading_run = blocks[index].is_heading();
        let mut end = index;
        while end < blocks.len() && blocks[end].is_heading() == heading_run {
            end += 1;
        }
        let run = &blocks[index..end];
        let mut kept = 0;
        for block in run {
            kept += 1;
            if matches!(block.kind, BlockKind::Paragraph { .. }) {
                break;
            }
        }
        let mut rendered = render(&run[..kept]);
        if kept < run.len() {
            rendered.push_str(" ..");
        }
        sections.push(rendered);
        index = end;
    }
    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn builder(source: &str) -> EntryBuilder {
        EntryBuilder {
            blocks: parse_blocks(source),
        }
    }

    #[test]
    fn test_short_entries_do_not_collapse() {
        let entry = builder("Just a line.").build().unwrap();
        assert_eq!(entry.raw_content, "Just a line.");
        assert!(!entry.collapsible());
        assert_eq!(entry.raw_collapsed, None);
    }

    #[test]
    fn test_collapse_truncates_after_first_paragraph() {
        let entry = builder(
            "# Report\n\nSummary line.\n\nA much longer follow-up paragraph with plenty of detail \
             that the collapsed rendering is allowed to drop entirely.",
        )
        .build()
        .unwrap();
        assert!(entry.collapsible());
        assert_eq!(
            entry.raw_collapsed.as_deref(),
            Some("# Report\nSummary line. ..")
        );
    }

    #[test]
    fn test_collapse_keeps_heading_runs_whole() {
        let entry = builder(
            "# One\n\n## Two\n\nBody paragraph here.\n\nAnd another very long trailing paragraph \
             that only exists to make collapsing worthwhile for this entry.",
        )
        .build()
        .unwrap();
        assert_eq!(
            entry.raw_collapsed.as_deref(),
            Some("# One\n\n## Two\nBody paragraph here. ..")
        );
    }

    #[test]
    fn test_cleanup_drops_trailing_partial_rows() {
        let mut builder = builder("Intro.\n\n| Name | Val");
        builder.cleanup();
        let entry = builder.build().unwrap();
        assert_eq!(entry.raw_content, "Intro.");
    }

    #[test]
    fn test_cleanup_can_empty_the_builder() {
        let mut builder = builder("| Name | Val");
        builder.cleanup();
        assert!(builder.build().is_none());
    }

    #[test]
    fn test_equality_is_on_raw_strings() {
        let a = builder("Same text.").build().unwrap();
        let mut b = builder("Same text.").build().unwrap();
        b.blocks.clear();
        assert_eq!(a, b);
    }
}
