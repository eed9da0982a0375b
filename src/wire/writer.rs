//! Serializes a field map into an eBay XML request envelope.
//!
//! Mapping rules:
//! - objects become nested elements, in insertion order
//! - arrays repeat the element once per item
//! - `null` becomes an empty element
//! - strings, numbers and booleans become escaped text content

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{Map, Value};

use crate::wire::errors::XmlError;

/// Namespace of every Trading API request element.
pub const NAMESPACE: &str = "urn:ebay:apis:eBLBaseComponents";

/// Writes an XML declaration followed by `<root xmlns="...">` holding `children`.
///
/// # Errors
///
/// Returns [`XmlError::Write`] if the writer rejects an event.
///
/// # Example
///
/// ```rust
/// use ebay_trading::wire::write_document;
/// use serde_json::json;
///
/// let children = json!({ "ItemID": "110" });
/// let xml = write_document("GetItemRequest", children.as_object().unwrap()).unwrap();
/// assert_eq!(
///     xml,
///     r#"<?xml version="1.0" encoding="utf-8"?><GetItemRequest xmlns="urn:ebay:apis:eBLBaseComponents"><ItemID>110</ItemID></GetItemRequest>"#
/// );
/// ```
pub fn write_document(root: &str, children: &Map<String, Value>) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());
    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;

    let mut start = BytesStart::new(root);
    start.push_attribute(("xmlns", NAMESPACE));
    write(&mut writer, Event::Start(start))?;
    for (name, value) in children {
        write_element(&mut writer, name, value)?;
    }
    write(&mut writer, Event::End(BytesEnd::new(root)))?;

    String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write {
        reason: e.to_string(),
    })
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), XmlError> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        Value::Null => write(writer, Event::Empty(BytesStart::new(name))),
        Value::Object(children) => {
            write(writer, Event::Start(BytesStart::new(name)))?;
            for (child, value) in children {
                write_element(writer, child, value)?;
            }
            write(writer, Event::End(BytesEnd::new(name)))
        }
        Value::String(text) => write_text_element(writer, name, text),
        Value::Bool(flag) => write_text_element(writer, name, if *flag { "true" } else { "false" }),
        Value::Number(number) => write_text_element(writer, name, &number.to_string()),
    }
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), XmlError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer.write_event(event).map_err(|e| XmlError::Write {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body_of(xml: &str, root: &str) -> String {
        let open = format!(r#"<{root} xmlns="{NAMESPACE}">"#);
        let start = xml.find(&open).unwrap() + open.len();
        let end = xml.rfind(&format!("</{root}>")).unwrap();
        xml[start..end].to_string()
    }

    #[test]
    fn test_writes_declaration_and_namespaced_root() {
        let xml = write_document("GetStoreRequest", &Map::new()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"<GetStoreRequest xmlns="urn:ebay:apis:eBLBaseComponents">"#));
        assert!(xml.ends_with("</GetStoreRequest>"));
    }

    #[test]
    fn test_nested_objects_keep_insertion_order() {
        let children = json!({
            "RequesterCredentials": { "eBayAuthToken": "abc" },
            "Zeta": 1,
            "Alpha": { "Inner": true }
        });
        let xml = write_document("GetOrdersRequest", children.as_object().unwrap()).unwrap();

        assert_eq!(
            body_of(&xml, "GetOrdersRequest"),
            "<RequesterCredentials><eBayAuthToken>abc</eBayAuthToken></RequesterCredentials>\
             <Zeta>1</Zeta><Alpha><Inner>true</Inner></Alpha>"
        );
    }

    #[test]
    fn test_arrays_repeat_the_element() {
        let children = json!({
            "PictureDetails": { "PictureURL": ["http://a/1.jpg", "http://a/2.jpg"] }
        });
        let xml = write_document("AddItemRequest", children.as_object().unwrap()).unwrap();

        assert_eq!(
            body_of(&xml, "AddItemRequest"),
            "<PictureDetails><PictureURL>http://a/1.jpg</PictureURL>\
             <PictureURL>http://a/2.jpg</PictureURL></PictureDetails>"
        );
    }

    #[test]
    fn test_text_is_escaped_and_null_is_empty() {
        let children = json!({ "Title": "Salt & <Pepper>", "Notes": null });
        let xml = write_document("AddItemRequest", children.as_object().unwrap()).unwrap();

        assert!(xml.contains("<Title>Salt &amp; &lt;Pepper&gt;</Title>"));
        assert!(xml.contains("<Notes/>"));
    }
}
