//! XML rendering of JSON payloads.
//!
//! Layout:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <results>
//!   <count type="integer">2</count>
//!   <results type="array">
//!     <result>
//!       <bill_id>hr1-113</bill_id>
//!       <sponsor_id nil="true"/>
//!     </result>
//!   </results>
//! </results>
//! ```
//!
//! Keys become element names verbatim. Array children take the singular of
//! the array's name.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;

use crate::error::{RestError, RestResult};

/// Document root element name.
pub const ROOT_ELEMENT: &str = "results";

/// Renders a JSON value as an XML document under `root`.
pub fn to_xml_string(value: &Value, root: &str) -> RestResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    write_element(&mut writer, root, value)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> RestResult<()> {
    let mut start = BytesStart::new(name);
    match value {
        Value::Null => {
            start.push_attribute(("nil", "true"));
            return emit(writer, Event::Empty(start));
        }
        Value::Object(map) => {
            if map.is_empty() {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
            for (key, child) in map {
                write_element(writer, key, child)?;
            }
        }
        Value::Array(items) => {
            start.push_attribute(("type", "array"));
            if items.is_empty() {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
            let child_name = singularize(name);
            for item in items {
                write_element(writer, &child_name, item)?;
            }
        }
        Value::Bool(b) => {
            start.push_attribute(("type", "boolean"));
            return write_text(writer, start, name, if *b { "true" } else { "false" });
        }
        Value::Number(n) => {
            let kind = if n.is_f64() { "float" } else { "integer" };
            start.push_attribute(("type", kind));
            return write_text(writer, start, name, &n.to_string());
        }
        Value::String(s) => {
            return write_text(writer, start, name, s);
        }
    }
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn write_text(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    name: &str,
    text: &str,
) -> RestResult<()> {
    emit(writer, Event::Start(start))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> RestResult<()> {
    writer.write_event(event).map_err(xml_error)
}

fn xml_error(err: impl std::fmt::Display) -> RestError {
    RestError::InternalError {
        message: format!("Failed to serialize to XML: {}", err),
    }
}

/// Returns the singular form used for array children.
///
/// Covers the regular English plurals that appear in collection and field
/// names; anything else is returned unchanged.
pub fn singularize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    for suffix in ["sses", "shes", "ches", "xes"] {
        if name.ends_with(suffix) {
            return name[..name.len() - 2].to_string();
        }
    }
    if name.ends_with('s') && !name.ends_with("ss") && name.len() > 1 {
        return name[..name.len() - 1].to_string();
    }
    name.to_string()
}
