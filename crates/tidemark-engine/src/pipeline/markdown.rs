use crate::ids::IdGenerator;
use crate::markdown::{EntryBuilder, build_table, parse_blocks};
use crate::model::{Item, ItemValue, StreamContent};
use crate::raw::{RawContent, SpanValue};

/// Stage 1: promote raw spans into markdown entries, tables and raw XML items.
///
/// Prose blocks are buffered across consecutive markdown spans and flushed
/// whenever a table or a non-markdown span interrupts them, so runs of prose
/// coalesce into single entries. Error spans surface on the document only
/// once their span is finished; a still-growing tail may yet resolve them.
pub fn promote_markdown<G: IdGenerator>(raw: &RawContent, mut ids: G) -> StreamContent {
    let mut content = StreamContent {
        finished: raw.eom,
        ..StreamContent::default()
    };
    let mut entry = EntryBuilder::default();
    for span in &raw.spans {
        match &span.value {
            SpanValue::Markdown(text) => {
                for block in parse_blocks(text) {
                    match build_table(&block, ids.nested()) {
                        Some(table) => {
                            flush(&mut entry, &mut content, &mut ids);
                            content
                                .items
                                .push(Item::new(&mut ids, ItemValue::MarkdownTable(table)));
                        }
                        None => entry.push(block),
                    }
                }
            }
            SpanValue::Xml(elements) => {
                flush(&mut entry, &mut content, &mut ids);
                content
                    .items
                    .push(Item::new(&mut ids, ItemValue::Xml(elements.clone())));
            }
            SpanValue::Error(error) => {
                if span.finished {
                    content.push_error(error.clone());
                }
            }
        }
    }
    if content.finished {
        entry.cleanup();
    }
    flush(&mut entry, &mut content, &mut ids);
    content
}

fn flush<G: IdGenerator>(entry: &mut EntryBuilder, content: &mut StreamContent, ids: &mut G) {
    if let Some(markdown) = entry.build_and_clear() {
        content
            .items
            .push(Item::new(ids, ItemValue::Markdown(markdown)));
    }
}
