use crate::error::{EngineError, IdentifiableError};
use crate::ids::IdGenerator;
use crate::json::{self, Allow};
use crate::model::{ContainerWidget, Item, ItemValue, StreamContent, TrendWidget, Widget};
use crate::raw::xml::XmlElement;

/// Stage 5: promote `SafeContainer` and `SafeViz` elements into widgets.
///
/// A container's per-child failures become document-level errors without
/// failing the container; a top-level widget decode failure records the
/// error and drops the raw item.
pub fn promote_widgets<G: IdGenerator>(mut input: StreamContent, mut ids: G) -> StreamContent {
    let items = std::mem::take(&mut input.items);
    let mut content = input;
    for item in items {
        let Item { id, value } = item;
        match value {
            ItemValue::Xml(elements) => {
                let mut rest = Vec::new();
                for element in elements {
                    if element.name.as_deref() == Some("SafeContainer") {
                        let mut container = parse_container(&element, &mut ids);
                        for error in container.errors.drain(..) {
                            content.push_error(error);
                        }
                        content
                            .items
                            .push(Item::new(&mut ids, ItemValue::Container(container)));
                    } else {
                        match parse_widget(&element) {
                            Ok(Some(widget)) => content
                                .items
                                .push(Item::new(&mut ids, ItemValue::Widget(widget))),
                            Ok(None) => rest.push(element),
                            Err(error) => {
                                content.push_error(IdentifiableError::new(&mut ids, error));
                            }
                        }
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

fn parse_container<G: IdGenerator>(element: &XmlElement, ids: &mut G) -> ContainerWidget {
    let mut container = ContainerWidget::default();
    for child in &element.children {
        match parse_widget(child) {
            Ok(Some(widget)) => container.widgets.push(Item::new(ids, widget)),
            Ok(None) => {}
            Err(error) => container
                .errors
                .push(IdentifiableError::new(ids, error)),
        }
    }
    container
}

fn parse_widget(element: &XmlElement) -> Result<Option<Widget>, EngineError> {
    if element.name.as_deref() != Some("SafeViz") {
        return Ok(None);
    }
    let Some(name) = element.attr("name") else {
        return Ok(None);
    };
    match name {
        "LIKB" => Ok(Some(Widget::Trend(parse_trend(element)?))),
        _ => Ok(None),
    }
}

/// Decodes the trend payload from the `SafeVizSummary` child. An element
/// still streaming in gets its JSON completed first; one that closed is
/// decoded as-is.
fn parse_trend(element: &XmlElement) -> Result<TrendWidget, EngineError> {
    let Some(summary) = element.child("SafeVizSummary") else {
        return Ok(TrendWidget::default());
    };
    if summary.text.is_empty() {
        return Ok(TrendWidget::default());
    }
    let payload = if summary.completed {
        summary.text.clone()
    } else {
        json::complete(&summary.text, Allow::ALL)
    };
    serde_json::from_str(&payload).map_err(|e| EngineError::WidgetDecode(e.to_string()))
}
