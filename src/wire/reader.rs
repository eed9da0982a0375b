//! Decodes an eBay XML response body into a JSON tree.
//!
//! The tree has the shape the response normalizer expects:
//! - each element becomes an object member named after its local name
//! - repeated sibling elements collapse into an array, in document order
//! - text content is stored under a `value` member
//! - attributes become string members of the element's object
//! - an element with neither children nor text becomes `{}`

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::wire::errors::XmlError;

#[derive(Debug, Default)]
struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let mut frame = Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            ..Self::default()
        };
        for attr in start.attributes() {
            let attr = attr.map_err(parse_error)?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(parse_error)?.into_owned();
            frame.children.insert(key, Value::String(value));
        }
        Ok(frame)
    }

    fn into_node(self) -> (String, Value) {
        let mut children = self.children;
        let text = self.text.trim();
        if !text.is_empty() {
            children.insert("value".to_string(), Value::String(text.to_string()));
        }
        (self.name, Value::Object(children))
    }
}

/// Parses `xml` into a tree keyed by the document's root element.
///
/// # Errors
///
/// Returns [`XmlError::Parse`] for malformed or truncated documents.
///
/// # Example
///
/// ```rust
/// use ebay_trading::wire::parse_document;
/// use serde_json::json;
///
/// let tree = parse_document(
///     "<GetItemResponse><Ack>Success</Ack><Item><ItemID>1</ItemID></Item></GetItemResponse>",
/// )
/// .unwrap();
///
/// assert_eq!(
///     tree,
///     json!({ "GetItemResponse": {
///         "Ack": { "value": "Success" },
///         "Item": { "ItemID": { "value": "1" } }
///     }})
/// );
/// ```
pub fn parse_document(xml: &str) -> Result<Value, XmlError> {
    let mut reader = Reader::from_str(xml);
    let mut stack = vec![Frame::default()];

    loop {
        match reader.read_event().map_err(parse_error)? {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                attach(&mut stack, frame);
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(XmlError::Parse {
                        reason: "closing tag without a matching opening tag".to_string(),
                    });
                }
                if let Some(frame) = stack.pop() {
                    attach(&mut stack, frame);
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(parse_error)?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                let data = data.into_inner();
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(XmlError::Parse {
            reason: "unexpected end of document".to_string(),
        });
    }

    let root = stack.pop().unwrap_or_default();
    Ok(Value::Object(root.children))
}

fn attach(stack: &mut [Frame], frame: Frame) {
    let (name, node) = frame.into_node();
    let Some(parent) = stack.last_mut() else {
        return;
    };

    match parent.children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(node),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, node]);
        }
        None => {
            parent.children.insert(name, node);
        }
    }
}

fn parse_error(error: impl std::fmt::Display) -> XmlError {
    XmlError::Parse {
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repeated_siblings_become_an_array() {
        let tree = parse_document(
            "<R><OrderArray><Order><OrderID>1</OrderID></Order>\
             <Order><OrderID>2</OrderID></Order></OrderArray></R>",
        )
        .unwrap();

        assert_eq!(
            tree["R"]["OrderArray"]["Order"],
            json!([
                { "OrderID": { "value": "1" } },
                { "OrderID": { "value": "2" } }
            ])
        );
    }

    #[test]
    fn test_single_child_stays_an_object() {
        let tree =
            parse_document("<R><OrderArray><Order><OrderID>1</OrderID></Order></OrderArray></R>")
                .unwrap();

        assert_eq!(
            tree["R"]["OrderArray"]["Order"],
            json!({ "OrderID": { "value": "1" } })
        );
    }

    #[test]
    fn test_attributes_and_text_share_the_node() {
        let tree = parse_document(
            r#"<R xmlns="urn:ebay:apis:eBLBaseComponents"><Price currencyID="USD">9.99</Price></R>"#,
        )
        .unwrap();

        assert_eq!(tree["R"]["xmlns"], json!("urn:ebay:apis:eBLBaseComponents"));
        assert_eq!(
            tree["R"]["Price"],
            json!({ "currencyID": "USD", "value": "9.99" })
        );
    }

    #[test]
    fn test_entities_and_cdata_are_decoded() {
        let tree =
            parse_document("<R><A>Salt &amp; Pepper</A><B><![CDATA[<b>bold</b>]]></B></R>").unwrap();

        assert_eq!(tree["R"]["A"]["value"], json!("Salt & Pepper"));
        assert_eq!(tree["R"]["B"]["value"], json!("<b>bold</b>"));
    }

    #[test]
    fn test_empty_elements_become_empty_objects() {
        let tree = parse_document(r#"<?xml version="1.0"?><R><A/><B></B></R>"#).unwrap();
        assert_eq!(tree, json!({ "R": { "A": {}, "B": {} } }));
    }

    #[test]
    fn test_truncated_document_is_an_error() {
        let result = parse_document("<R><A>1</A>");
        assert!(matches!(result, Err(XmlError::Parse { .. })));
    }

    #[test]
    fn test_mismatched_tags_are_an_error() {
        let result = parse_document("<R><A>1</B></R>");
        assert!(matches!(result, Err(XmlError::Parse { .. })));
    }
}
