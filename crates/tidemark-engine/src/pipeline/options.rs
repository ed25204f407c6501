use crate::ids::IdGenerator;
use crate::model::{Item, ItemValue, Options, PageControl, StreamContent};
use crate::raw::xml::XmlElement;

/// Stage 2: fold `SafeOption` elements into the page options.
///
/// Recognized options are consumed; unrecognized names or values pass the
/// item through untouched.
pub fn extract_options<G: IdGenerator>(mut input: StreamContent, _ids: G) -> StreamContent {
    let items = std::mem::take(&mut input.items);
    let mut content = input;
    for item in items {
        let Item { id, value } = item;
        match value {
            ItemValue::Xml(elements) => {
                let mut rest = Vec::new();
                for element in elements {
                    if !parse_option(&element, &mut content.options) {
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

fn parse_option(element: &XmlElement, options: &mut Options) -> bool {
    if element.name.as_deref() != Some("SafeOption") {
        return false;
    }
    let (Some(name), Some(value)) = (element.attr("name"), element.attr("value")) else {
        return false;
    };
    match name {
        "page.control" => match PageControl::parse(value) {
            Some(control) => {
                options.page.control = Some(control);
                true
            }
            None => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StreamContentBuilder;

    #[test]
    fn test_page_control_is_consumed() {
        let content =
            StreamContentBuilder::new(r#"<SafeOption name="page.control" value="submit"/>"#)
                .build();
        assert_eq!(content.options.page.control, Some(PageControl::Submit));
        assert!(content.items.is_empty());
    }

    #[test]
    fn test_unknown_option_name_passes_through() {
        let content =
            StreamContentBuilder::new(r#"<SafeOption name="page.theme" value="dark"/>"#).build();
        assert_eq!(content.options.page.control, None);
        assert_eq!(content.items.len(), 1);
        assert!(matches!(content.items[0].value, ItemValue::Xml(_)));
    }

    #[test]
    fn test_unknown_option_value_passes_through() {
        let content =
            StreamContentBuilder::new(r#"<SafeOption name="page.control" value="explode"/>"#)
                .build();
        assert_eq!(content.options.page.control, None);
        assert_eq!(content.items.len(), 1);
    }

    #[test]
    fn test_option_missing_attributes_passes_through() {
        let content = StreamContentBuilder::new(r#"<SafeOption name="page.control"/>"#).build();
        assert_eq!(content.items.len(), 1);
    }
}
