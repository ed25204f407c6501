mod input;
mod options;
mod question;
mod widget;

pub use input::{Input, InputContent};
pub use options::{Options, PageControl, PageOptions};
pub use question::{Question, QuestionGroup};
pub use widget::{ContainerWidget, TrendPoint, TrendWidget, Widget};

use std::collections::HashMap;

use crate::error::IdentifiableError;
use crate::ids::IdGenerator;
use crate::markdown::{MarkdownEntry, MarkdownTable};
use crate::raw::xml::XmlElement;

/// A uniquely identified entry in the document model.
///
/// Ids are deterministic functions of traversal order: two builds over the
/// same buffer produce the same ids everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<V> {
    pub id: String,
    pub value: V,
}

impl<V> Item<V> {
    pub fn new<G: IdGenerator>(ids: &mut G, value: V) -> Self {
        Self {
            id: ids.next_id(),
            value,
        }
    }
}

/// Everything a document item can be once the pipeline has run.
///
/// `Xml` items survive only for tags no stage recognizes; consumers can
/// still decide what to do with them.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValue {
    Markdown(MarkdownEntry),
    MarkdownTable(MarkdownTable),
    Question(Question),
    QuestionGroup(QuestionGroup),
    Xml(Vec<XmlElement>),
    Widget(Widget),
    Container(ContainerWidget),
    Input(Input),
}

/// The rebuilt document model for one buffer state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StreamContent {
    pub items: Vec<Item<ItemValue>>,
    /// True once the end-of-message sentinel was seen.
    pub finished: bool,
    /// Errors recorded during the build, deduplicated by id.
    pub errors: Vec<IdentifiableError>,
    pub options: Options,
}

impl StreamContent {
    pub(crate) fn replace_last_value(&mut self, value: ItemValue) {
        if let Some(last) = self.items.last_mut() {
            last.value = value;
        }
    }

    pub(crate) fn push_error(&mut self, error: IdentifiableError) {
        if !self.errors.iter().any(|e| e.id == error.id) {
            self.errors.push(error);
        }
    }

    /// Collects the submitted form: every hidden input's value plus, when a
    /// submitting input is given, the value of the button whose name matches.
    pub fn collect_form_values(&self, submit: Option<&Input>) -> HashMap<String, String> {
        let mut form = HashMap::new();
        for item in &self.items {
            let ItemValue::Input(input) = &item.value else {
                continue;
            };
            let include = match &input.content {
                InputContent::Hidden => true,
                InputContent::Button { .. } => {
                    submit.is_some_and(|submitted| submitted.name == input.name)
                }
                InputContent::Appearance { .. } => false,
            };
            if include && let Some(value) = &input.value {
                form.insert(input.name.clone(), value.clone());
            }
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::ids::IncrementalIdGenerator;

    fn input_item(ids: &mut IncrementalIdGenerator, input: Input) -> Item<ItemValue> {
        Item::new(ids, ItemValue::Input(input))
    }

    #[test]
    fn test_collect_form_values_takes_hidden_and_submitted_button() {
        let mut ids = IncrementalIdGenerator::new();
        let button_y = Input {
            name: "y".to_string(),
            value: Some("go".to_string()),
            content: InputContent::Button {
                label: "Go".to_string(),
            },
        };
        let content = StreamContent {
            items: vec![
                input_item(
                    &mut ids,
                    Input {
                        name: "token".to_string(),
                        value: Some("abc".to_string()),
                        content: InputContent::Hidden,
                    },
                ),
                input_item(
                    &mut ids,
                    Input {
                        name: "x".to_string(),
                        value: Some("no".to_string()),
                        content: InputContent::Button {
                            label: "No".to_string(),
                        },
                    },
                ),
                input_item(&mut ids, button_y.clone()),
            ],
            ..StreamContent::default()
        };

        let form = content.collect_form_values(Some(&button_y));
        assert_eq!(form.len(), 2);
        assert_eq!(form.get("token").map(String::as_str), Some("abc"));
        assert_eq!(form.get("y").map(String::as_str), Some("go"));
        assert!(!form.contains_key("x"));
    }

    #[test]
    fn test_collect_form_values_without_submit_is_hidden_only() {
        let mut ids = IncrementalIdGenerator::new();
        let content = StreamContent {
            items: vec![input_item(
                &mut ids,
                Input {
                    name: "a".to_string(),
                    value: Some("1".to_string()),
                    content: InputContent::Hidden,
                },
            )],
            ..StreamContent::default()
        };
        let form = content.collect_form_values(None);
        assert_eq!(form.len(), 1);
    }

    #[test]
    fn test_push_error_deduplicates_by_id() {
        let mut ids = IncrementalIdGenerator::new();
        let error = IdentifiableError::new(&mut ids, EngineError::Markup("x".into()));
        let mut content = StreamContent::default();
        content.push_error(error.clone());
        content.push_error(error);
        assert_eq!(content.errors.len(), 1);
    }

    #[test]
    fn test_replace_last_value_keeps_the_id() {
        let mut ids = IncrementalIdGenerator::new();
        let mut content = StreamContent {
            items: vec![Item::new(
                &mut ids,
                ItemValue::Question(Question {
                    text: "q".to_string(),
                }),
            )],
            ..StreamContent::default()
        };
        let id = content.items[0].id.clone();
        content.replace_last_value(ItemValue::Question(Question {
            text: "other".to_string(),
        }));
        assert_eq!(content.items[0].id, id);
    }
}
