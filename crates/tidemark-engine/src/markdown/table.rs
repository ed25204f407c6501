use super::blocks::{Block, BlockKind};
use crate::ids::IdGenerator;
use crate::model::Item;

/// A table rendered as cards: one card per body row, one row per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkdownTable {
    pub cards: Vec<Item<Card>>,
    pub max_row_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub rows: Vec<Item<Row>>,
}

/// Pairs a heading cell with the body cell at the same column index.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub title: Option<CellContent>,
    pub value: Option<CellContent>,
}

/// Rendered cell content; equality and hashing are on the rendered string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellContent {
    raw: String,
}

impl CellContent {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// Builds a table from a table block; any other block kind is not a table.
///
/// A table with a heading row and no body rows still yields one card pairing
/// each heading with an empty value, so the header always renders.
pub fn build_table<G: IdGenerator>(block: &Block, mut ids: G) -> Option<MarkdownTable> {
    let BlockKind::Table { headings, rows } = &block.kind else {
        return None;
    };
    let mut table = MarkdownTable {
        cards: Vec::new(),
        max_row_count: headings.len(),
    };
    for cells in rows {
        let mut card = Card { rows: Vec::new() };
        for (index, cell) in cells.iter().enumerate() {
            let row = Row {
                title: headings.get(index).map(|h| CellContent::new(h.clone())),
                value: Some(CellContent::new(cell.clone())),
            };
            card.rows.push(Item::new(&mut ids, row));
        }
        table.cards.push(Item::new(&mut ids, card));
    }
    if table.cards.is_empty() {
        let mut card = Card { rows: Vec::new() };
        for heading in headings {
            let row = Row {
                title: Some(CellContent::new(heading.clone())),
                value: Some(CellContent::new("")),
            };
            card.rows.push(Item::new(&mut ids, row));
        }
        table.cards.push(Item::new(&mut ids, card));
    }
    Some(table)
}
