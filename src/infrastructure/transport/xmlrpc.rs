#[cfg(test)]
#[path = "xmlrpc_test.rs"]
mod tests;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;

use crate::domain::models::wire;
use crate::domain::models::BoaError;
use crate::domain::models::Result;
use crate::domain::models::RpcFault;

fn protocol_err(msg: &str) -> BoaError {
    return BoaError::Protocol(format!("Invalid XML-RPC document: {msg}"));
}

fn encode_value(value: &Value, out: &mut String) {
    out.push_str("<value>");
    match value {
        Value::Null => out.push_str("<nil/>"),
        Value::Bool(flag) => {
            out.push_str(&format!("<boolean>{}</boolean>", if *flag { 1 } else { 0 }));
        }
        Value::Number(num) => {
            if let Some(int) = num.as_i64() {
                out.push_str(&format!("<int>{int}</int>"));
            } else {
                out.push_str(&format!("<double>{}</double>", num.as_f64().unwrap_or(0.0)));
            }
        }
        Value::String(text) => {
            out.push_str(&format!("<string>{}</string>", escape(text.as_str())));
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(item, out);
            }
            out.push_str("</data></array>");
        }
        Value::Object(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str(&format!("<member><name>{}</name>", escape(name.as_str())));
                encode_value(member, out);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
    }
    out.push_str("</value>");
}

/// Serializes a procedure call into a `<methodCall>` document.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from(r#"<?xml version="1.0"?>"#);
    out.push_str(&format!(
        "<methodCall><methodName>{}</methodName><params>",
        escape(method)
    ));
    for param in params {
        out.push_str("<param>");
        encode_value(param, &mut out);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");

    return out;
}

#[derive(Debug, Default)]
struct Node {
    name: String,
    text: String,
    children: Vec<Node>,
}

impl Node {
    fn child(&self, name: &str) -> Option<&Node> {
        return self.children.iter().find(|node| return node.name == name);
    }

    fn expect_child(&self, name: &str) -> Result<&Node> {
        return self.child(name).ok_or_else(|| {
            return protocol_err(&format!("<{}> is missing <{name}>", self.name));
        });
    }
}

fn parse_tree(text: &str) -> Result<Node> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<Node> = vec![Node::default()];

    loop {
        let event = reader
            .read_event()
            .map_err(|err| return protocol_err(&err.to_string()))?;

        match event {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).to_string();
                stack.push(Node {
                    name,
                    ..Node::default()
                });
            }
            Event::Empty(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).to_string();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node {
                        name,
                        ..Node::default()
                    });
                }
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| return protocol_err("unbalanced tags"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Err(protocol_err("unbalanced tags")),
                }
            }
            Event::Text(content) => {
                let unescaped = content
                    .unescape()
                    .map_err(|err| return protocol_err(&err.to_string()))?;
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&unescaped);
                }
            }
            Event::CData(content) => {
                let raw = content.into_inner();
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(protocol_err("document ended inside an element"));
    }

    return stack.pop().ok_or_else(|| return protocol_err("empty document"));
}

fn decode_value(node: &Node) -> Result<Value> {
    let typed = match node.children.first() {
        Some(typed) => typed,
        // Untyped values are strings.
        None => return Ok(Value::String(node.text.to_string())),
    };

    let text = typed.text.trim();
    match typed.name.as_str() {
        "int" | "i4" | "i8" => {
            let int = text
                .parse::<i64>()
                .map_err(|_| return protocol_err(&format!("bad integer '{text}'")))?;
            return Ok(Value::from(int));
        }
        "boolean" => match text {
            "1" => return Ok(Value::Bool(true)),
            "0" => return Ok(Value::Bool(false)),
            _ => return Err(protocol_err(&format!("bad boolean '{text}'"))),
        },
        "double" => {
            let float = text
                .parse::<f64>()
                .map_err(|_| return protocol_err(&format!("bad double '{text}'")))?;
            let num = Number::from_f64(float)
                .ok_or_else(|| return protocol_err(&format!("bad double '{text}'")))?;
            return Ok(Value::Number(num));
        }
        "string" => return Ok(Value::String(typed.text.to_string())),
        "dateTime.iso8601" => return Ok(Value::String(text.to_string())),
        "base64" => {
            let compact = text.split_whitespace().collect::<String>();
            let bytes = BASE64
                .decode(compact)
                .map_err(|err| return protocol_err(&err.to_string()))?;
            return Ok(Value::String(String::from_utf8_lossy(&bytes).to_string()));
        }
        "nil" => return Ok(Value::Null),
        "array" => {
            let data = typed.expect_child("data")?;
            let items = data
                .children
                .iter()
                .filter(|child| return child.name == "value")
                .map(decode_value)
                .collect::<Result<Vec<Value>>>()?;
            return Ok(Value::Array(items));
        }
        "struct" => {
            let mut members = Map::new();
            for member in typed.children.iter().filter(|c| return c.name == "member") {
                let name = member.expect_child("name")?.text.to_string();
                let value = decode_value(member.expect_child("value")?)?;
                members.insert(name, value);
            }
            return Ok(Value::Object(members));
        }
        other => return Err(protocol_err(&format!("unknown value type <{other}>"))),
    }
}

fn decode_fault(node: &Node) -> Result<RpcFault> {
    let value = decode_value(node.expect_child("value")?)?;
    let code = value
        .get("faultCode")
        .and_then(wire::to_integer)
        .ok_or_else(|| return protocol_err("fault without an integer faultCode"))?;
    let message = value
        .get("faultString")
        .and_then(|msg| return msg.as_str())
        .unwrap_or("")
        .to_string();

    return Ok(RpcFault { code, message });
}

/// Parses a `<methodResponse>` document into either its single return value
/// or the fault the service reported.
pub fn decode_response(text: &str) -> Result<std::result::Result<Value, RpcFault>> {
    let root = parse_tree(text)?;
    let response = root.expect_child("methodResponse")?;

    if let Some(fault) = response.child("fault") {
        return Ok(Err(decode_fault(fault)?));
    }

    let value = response
        .expect_child("params")?
        .expect_child("param")?
        .expect_child("value")?;

    return Ok(Ok(decode_value(value)?));
}
