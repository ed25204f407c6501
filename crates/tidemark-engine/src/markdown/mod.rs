mod blocks;
mod entry;
mod table;

pub use blocks::{Block, BlockKind, parse_blocks};
pub use entry::{EntryBuilder, MarkdownEntry};
pub use table::{Card, CellContent, MarkdownTable, Row, build_table};
