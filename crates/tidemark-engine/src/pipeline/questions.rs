use crate::ids::IdGenerator;
use crate::markdown::{BlockKind, EntryBuilder};
use crate::model::{Item, ItemValue, Question, QuestionGroup, StreamContent};
use crate::raw::xml::XmlElement;

/// Stage 4: promote `SafeQuestion` and `SafeQuestionGroup` elements.
///
/// Adjacent questions merge: a question landing after a group joins it, and
/// two questions in a row become a group. An untitled group landing right
/// after a markdown entry that ends in a heading steals that heading as its
/// title.
pub fn promote_questions<G: IdGenerator>(mut input: StreamContent, mut ids: G) -> StreamContent {
    let items = std::mem::take(&mut input.items);
    let mut content = input;
    for item in items {
        let Item { id, value } = item;
        match value {
            ItemValue::Xml(elements) => {
                let mut rest = Vec::new();
                for element in elements {
                    if let Some(question) = parse_question(&element) {
                        add_question(question, &mut content, &mut ids);
                    } else if let Some(group) = parse_group(&element, &mut ids) {
                        add_group(group, &mut content, &mut ids);
                    } else {
                        rest.push(element);
                    }
                }
                if !rest.is_empty() {
                    content.items.push(Item {
                        id,
                        value: ItemValue::Xml(rest),
                    });
                }
            }
            other => content.items.push(Item { id, value: other }),
        }
    }
    content
}

fn parse_question(element: &XmlElement) -> Option<Question> {
    if element.name.as_deref() != Some("SafeQuestion") || element.text.is_empty() {
        return None;
    }
    Some(Question {
        text: element.text.clone(),
    })
}

fn parse_group<G: IdGenerator>(element: &XmlElement, ids: &mut G) -> Option<QuestionGroup> {
    if element.name.as_deref() != Some("SafeQuestionGroup") {
        return None;
    }
    let title = element.attr("title").map(str::to_string);
    let questions: Vec<Item<Question>> = element
        .children
        .iter()
        .filter_map(parse_question)
        .map(|question| Item::new(ids, question))
        .collect();
    if questions.is_empty() {
        return None;
    }
    Some(QuestionGroup { title, questions })
}

enum Preceding {
    Group,
    Question,
    Other,
}

fn add_question<G: IdGenerator>(question: Question, content: &mut StreamContent, ids: &mut G) {
    let preceding = match content.items.last().map(|item| &item.value) {
        Some(ItemValue::QuestionGroup(_)) => Preceding::Group,
        Some(ItemValue::Question(_)) => Preceding::Question,
        _ => Preceding::Other,
    };
    match preceding {
        Preceding::Group => {
            if let Some(Item {
                value: ItemValue::QuestionGroup(group),
                ..
            }) = content.items.last_mut()
            {
                group.questions.push(Item::new(ids, question));
            }
        }
        Preceding::Question => {
            let Some(Item {
                value: ItemValue::Question(previous),
                ..
            }) = content.items.pop()
            else {
                return;
            };
            let questions = vec![Item::new(ids, previous), Item::new(ids, question)];
            add_group(
                QuestionGroup {
                    title: None,
                    questions,
                },
                content,
                ids,
            );
        }
        Preceding::Other => content
            .items
            .push(Item::new(ids, ItemValue::Question(question))),
    }
}

fn add_group<G: IdGenerator>(mut group: QuestionGroup, content: &mut StreamContent, ids: &mut G) {
    let stolen_title = match (&group.title, content.items.last().map(|item| &item.value)) {
        (None, Some(ItemValue::Markdown(entry))) => {
            entry.blocks.last().and_then(|block| match &block.kind {
                BlockKind::Heading { text } => Some(text.clone()),
                _ => None,
            })
        }
        _ => None,
    };
    let Some(title) = stolen_title else {
        content
            .items
            .push(Item::new(ids, ItemValue::QuestionGroup(group)));
        return;
    };

    // excise the heading that introduces the group
    let Some(ItemValue::Markdown(entry)) = content.items.last().map(|item| &item.value) else {
        return;
    };
    let mut blocks = entry.blocks.clone();
    blocks.pop();
    let rebuilt = EntryBuilder { blocks }.build();
    group.title = Some(title);
    match rebuilt {
        Some(markdown) => {
            content.replace_last_value(ItemValue::Markdown(markdown));
            content
                .items
                .push(Item::new(ids, ItemValue::QuestionGroup(group)));
        }
        // the heading was the whole entry: the group takes its place
        None => content.replace_last_value(ItemValue::QuestionGroup(group)),
    }
}
