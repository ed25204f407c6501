use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// One top-level markdown block, keeping its raw source slice.
///
/// The raw slice is the source of truth for re-rendering; equality of
/// rendered content is always defined on raw strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// A heading with its plain-text content.
    Heading { text: String },
    /// A paragraph with its plain-text content.
    Paragraph { text: String },
    /// A table split into heading cells and body rows of cells.
    Table {
        headings: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Anything else (lists, code fences, quotes, rules, html).
    Other,
}

impl Block {
    pub fn is_heading(&self) -> bool {
        matches!(self.kind, BlockKind::Heading { .. })
    }
}

#[derive(Debug)]
struct OpenBlock {
    kind: OpenKind,
    start: usize,
}

#[derive(Debug)]
enum OpenKind {
    Heading {
        text: String,
    },
    Paragraph {
        text: String,
    },
    Table {
        headings: Vec<String>,
        rows: Vec<Vec<String>>,
        cells: Vec<String>,
    },
    Other,
}

impl OpenKind {
    fn open(tag: &Tag) -> Self {
        match tag {
            Tag::Heading { .. } => OpenKind::Heading {
                text: String::new(),
            },
            Tag::Paragraph => OpenKind::Paragraph {
                text: String::new(),
            },
            Tag::Table(_) => OpenKind::Table {
                headings: Vec::new(),
                rows: Vec::new(),
                cells: Vec::new(),
            },
            _ => OpenKind::Other,
        }
    }

    fn close_inner(&mut self, end: &TagEnd) {
        if let OpenKind::Table {
            headings,
            rows,
            cells,
        } = self
        {
            match end {
                TagEnd::TableHead => *headings = std::mem::take(cells),
                TagEnd::TableRow => rows.push(std::mem::take(cells)),
                _ => {}
            }
        }
    }

    fn push_text(&mut self, piece: &str) {
        match self {
            OpenKind::Heading { text } | OpenKind::Paragraph { text } => text.push_str(piece),
            _ => {}
        }
    }
}

impl OpenBlock {
    fn into_block(self, raw: String) -> Block {
        let kind = match self.kind {
            OpenKind::Heading { text } => BlockKind::Heading {
                text: text.trim().to_string(),
            },
            OpenKind::Paragraph { text } => BlockKind::Paragraph { text },
            OpenKind::Table { headings, rows, .. } => BlockKind::Table { headings, rows },
            OpenKind::Other => BlockKind::Other,
        };
        Block { kind, raw }
    }
}

/// Parses a markdown string into its sequence of top-level blocks.
pub fn parse_blocks(source: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut open: Option<OpenBlock> = None;
    let mut depth = 0usize;

    for (event, range) in Parser::new_ext(source, Options::ENABLE_TABLES).into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    open = Some(OpenBlock {
                        kind: OpenKind::open(&tag),
                        start: range.start,
                    });
                } else if matches!(tag, Tag::TableCell) {
                    if let Some(OpenBlock {
                        kind: OpenKind::Table { cells, .. },
                        ..
                    }) = open.as_mut()
                    {
                        cells.push(clean_cell(&source[range.clone()]));
                    }
                }
                depth += 1;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(block) = open.take() {
                        let raw = source[block.start..range.end].trim_end().to_string();
                        blocks.push(block.into_block(raw));
                    }
                } else if let Some(block) = open.as_mut() {
                    block.kind.close_inner(&end);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(block) = open.as_mut() {
                    block.kind.push_text(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(block) = open.as_mut() {
                    block.kind.push_text(" ");
                }
            }
            Event::Rule => {
                if depth == 0 {
                    blocks.push(Block {
                        kind: BlockKind::Other,
                        raw: source[range.clone()].trim_end().to_string(),
                    });
                }
            }
            _ => {}
        }
    }

    blocks
}

fn clean_cell(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('|')
        .trim_end_matches('|')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_and_headings() {
        let blocks = parse_blocks("# Title\n\nFirst paragraph.\n\nSecond one.");
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0].kind,
            BlockKind::Heading {
                text: "Title".to_string()
            }
        );
        assert_eq!(blocks[0].raw, "# Title");
        assert_eq!(
            blocks[1].kind,
            BlockKind::Paragraph {
                text: "First paragraph.".to_string()
            }
        );
        assert_eq!(blocks[2].raw, "Second one.");
    }

    #[test]
    fn test_table_cells_by_position() {
        let blocks = parse_blocks("| Name | Value |\n| --- | --- |\n| Bob | 7 |\n| Ann | 9 |");
        assert_eq!(blocks.len(), 1);
        let BlockKind::Table { headings, rows } = &blocks[0].kind else {
            panic!("expected a table block");
        };
        assert_eq!(headings, &["Name".to_string(), "Value".to_string()]);
        assert_eq!(
            rows,
            &[
                vec!["Bob".to_string(), "7".to_string()],
                vec!["Ann".to_string(), "9".to_string()],
            ]
        );
    }

    #[test]
    fn test_header_only_table_has_no_rows() {
        let blocks = parse_blocks("| Name | Value |\n| --- | --- |");
        let BlockKind::Table { headings, rows } = &blocks[0].kind else {
            panic!("expected a table block");
        };
        assert_eq!(headings.len(), 2);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_partial_table_line_is_a_paragraph() {
        // without a delimiter line this is ordinary prose
        let blocks = parse_blocks("Intro.\n\n| Name | Val");
        assert_eq!(blocks.len(), 2);
        let BlockKind::Paragraph { text } = &blocks[1].kind else {
            panic!("expected a paragraph block");
        };
        assert!(text.contains('|'));
    }

    #[test]
    fn test_other_blocks_keep_raw_source() {
        let blocks = parse_blocks("- one\n- two\n\n```\ncode\n```");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::Other);
        assert_eq!(blocks[0].raw, "- one\n- two");
        assert_eq!(blocks[1].kind, BlockKind::Other);
    }

    #[test]
    fn test_inline_markup_flattens_to_text() {
        let blocks = parse_blocks("## A *strong* `title`");
        assert_eq!(
            blocks[0].kind,
            BlockKind::Heading {
                text: "A strong title".to_string()
            }
        );
    }

    #[test]
    fn test_empty_source_has_no_blocks() {
        assert!(parse_blocks("").is_empty());
        assert!(parse_blocks("   \n\n  ").is_empty());
    }
}
