//! XML encoder
//!
//! Produces an indented document with a `<root>` wrapper. Object keys become
//! element names, array members repeat the element name of their key (or
//! `item` when the array has no key), and null becomes an empty element.

use std::borrow::Cow;
use std::io::Cursor;

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use serde_json::Value;

use super::error::EncodeResult;

const ROOT_ELEMENT: &str = "root";
const ITEM_ELEMENT: &str = "item";
const INDENT_WIDTH: usize = 4;

/// Encode any JSON value as XML
pub fn encode(value: &Value) -> EncodeResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', INDENT_WIDTH);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_node(&mut writer, ROOT_ELEMENT, value)?;

    let mut bytes = writer.into_inner().into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write an object member; arrays repeat the member's element name
fn write_member<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
) -> EncodeResult<()> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_node(writer, name, item)?;
            }
            Ok(())
        }
        other => write_node(writer, name, other),
    }
}

fn write_node<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &Value,
) -> EncodeResult<()> {
    let name = element_name(name);
    match value {
        Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(name.as_str())))?;
        }
        Value::Object(map) => {
            writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
            for (key, child) in map {
                write_member(writer, key, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
        Value::Array(items) => {
            writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
            for item in items {
                write_node(writer, ITEM_ELEMENT, item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            let text = match value {
                Value::String(s) => s.clone(),
                scalar => scalar.to_string(),
            };
            writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
            writer.write_event(Event::Text(BytesText::new(&xml_text(&text))))?;
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
    }
    Ok(())
}

/// Replace characters XML 1.0 does not allow in text with `?`
pub(super) fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if is_xml_char(c) { c } else { '?' })
            .collect(),
    )
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}')
        || c >= '\u{10000}'
}

/// Turn an arbitrary JSON key into a well-formed XML element name
fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let starts_ok = name
        .chars()
        .next()
        .map(|c| c.is_alphabetic() || c == '_')
        .unwrap_or(false);
    if !starts_ok || name.to_ascii_lowercase().starts_with("xml") {
        name.insert(0, '_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;
    use serde_json::{json, Map};

    /// Minimal reader used to check the encoder output: leaf text becomes a
    /// string and repeated child names become arrays.
    fn decode(xml: &str) -> Value {
        #[derive(Default)]
        struct Node {
            name: String,
            text: String,
            children: Vec<Node>,
        }

        fn to_value(node: &Node) -> Value {
            if node.children.is_empty() {
                return Value::String(node.text.clone());
            }
            let mut map = Map::new();
            for child in &node.children {
                let value = to_value(child);
                match map.get_mut(&child.name) {
                    Some(Value::Array(items)) => items.push(value),
                    Some(existing) => {
                        let first = existing.take();
                        *existing = Value::Array(vec![first, value]);
                    }
                    None => {
                        map.insert(child.name.clone(), value);
                    }
                }
            }
            Value::Object(map)
        }

        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut stack: Vec<Node> = Vec::new();
        let mut root = None;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(tag) => stack.push(Node {
                    name: String::from_utf8_lossy(tag.name().as_ref()).into_owned(),
                    ..Default::default()
                }),
                Event::Empty(tag) => {
                    let node = Node {
                        name: String::from_utf8_lossy(tag.name().as_ref()).into_owned(),
                        ..Default::default()
                    };
                    stack.last_mut().unwrap().children.push(node);
                }
                Event::Text(text) => {
                    stack.last_mut().unwrap().text.push_str(&text.unescape().unwrap());
                }
                Event::End(_) => {
                    let node = stack.pop().unwrap();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        to_value(&root.unwrap())
    }

    #[test]
    fn test_encode_nested_object() {
        let bytes = encode(&json!({"a": 1, "b": {"c": "x"}})).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("\n    <a>1</a>"));
        assert!(text.contains("\n        <c>x</c>"));
        assert!(text.ends_with("</root>\n"));
    }

    #[test]
    fn test_round_trip_through_reader() {
        let value = json!({
            "title": "Fish & <Chips>",
            "author": {"first": "Ada", "last": "Lovelace"},
            "tags": ["one", "two"]
        });
        let text = String::from_utf8(encode(&value).unwrap()).unwrap();
        assert_eq!(decode(&text), value);
    }

    #[test]
    fn test_top_level_array_uses_item() {
        let text = String::from_utf8(encode(&json!([{"n": "1"}, {"n": "2"}])).unwrap()).unwrap();
        assert_eq!(
            decode(&text),
            json!({"item": [{"n": "1"}, {"n": "2"}]})
        );
    }

    #[test]
    fn test_null_is_empty_element() {
        let text = String::from_utf8(encode(&json!({"gone": null})).unwrap()).unwrap();
        assert!(text.contains("<gone/>"));
    }

    #[test]
    fn test_control_characters_are_replaced() {
        let text = String::from_utf8(encode(&json!({"a": "x\u{1}y\u{fffe}", "b": "tab\tok"})).unwrap())
            .unwrap();
        assert!(text.contains("<a>x?y?</a>"));
        assert!(text.contains("<b>tab\tok</b>"));
        assert_eq!(decode(&text), json!({"a": "x?y?", "b": "tab\tok"}));
    }

    #[test]
    fn test_xml_text() {
        assert!(matches!(xml_text("plain é 😀"), Cow::Borrowed("plain é 😀")));
        assert_eq!(xml_text("a\u{0}b\u{1f}c"), "a?b?c");
    }

    #[test]
    fn test_element_name_sanitizing() {
        assert_eq!(element_name("first name"), "first_name");
        assert_eq!(element_name("1st"), "_1st");
        assert_eq!(element_name(""), "_");
        assert_eq!(element_name("xmlns"), "_xmlns");
        assert_eq!(element_name("ok-name.v2"), "ok-name.v2");
    }
}
