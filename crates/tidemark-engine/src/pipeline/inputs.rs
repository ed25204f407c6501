use crate::ids::IdGenerator;
use crate::model::{Input, InputContent, Item, ItemValue, StreamContent};
use crate::raw::xml::XmlElement;

/// Stage 3: promote `SafeInput` elements into form inputs.
pub fn extract_inputs<G: IdGenerator>(mut input: StreamContent, mut ids: G) -> StreamContent {
    let items = std::mem::take(&mut input.items);
    let mut content = input;
    for item in items {
        let Item { id, value } = item;
        match value {
            ItemValue::Xml(elements) => {
                let mut rest = Vec::new();
                for element in elements {
                    match parse_input(&element) {
                        Some(parsed) => content
                            .items
                            .push(Item::new(&mut ids, ItemValue::Input(parsed))),
                        None => rest.push(element),
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

fn parse_input(element: &XmlElement) -> Option<Input> {
    if element.name.as_deref() != Some("SafeInput") {
        return None;
    }
    let name = element.attr("name")?;
    let kind = element.attr("type")?;
    let content = match kind {
        "hidden" => InputContent::Hidden,
        "button" => {
            // a button without a label is not pressable yet
            if element.text.is_empty() {
                return None;
            }
            InputContent::Button {
                label: element.text.clone(),
            }
        }
        "appearance" => InputContent::Appearance {
            text: element.text.clone(),
            run_immediately: element
                .attr("runImmediately")
                .is_some_and(|value| value.eq_ignore_ascii_case("true")),
            ready: element.completed,
        },
        _ => return None,
    };
    Some(Input {
        name: name.to_string(),
        value: element.attr("value").map(str::to_string),
        content,
    })
}
