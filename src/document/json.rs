//! JSON instance data reader (RFC 7951 encoding).
//!
//! Top-level member names are `module:name`. Nested names may repeat the
//! module qualifier; a different module is treated as unknown. Lists are
//! arrays of objects, leaf-lists arrays of scalars, and a leaf of type
//! `empty` is `[null]`. Numbers and booleans become their textual form and
//! numeric types also accept strings.
//!
//! Objects are read as member lists rather than maps so that a repeated
//! member name reaches the duplicate checks instead of overwriting the
//! earlier value.

use super::error::ParseError;
use super::node::NodeId;
use super::parser::TreeBuilder;
use crate::schema::{NodeKind, SchemaId, SchemaNode};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Number;
use std::collections::HashSet;
use std::fmt;

/// A JSON value whose objects keep every member in document order.
#[derive(Debug, Clone, PartialEq)]
enum Json {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

impl<'de> Deserialize<'de> for Json {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(JsonVisitor)
    }
}

struct JsonVisitor;

impl<'de> Visitor<'de> for JsonVisitor {
    type Value = Json;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Json, E> {
        Ok(Json::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Json, E> {
        Ok(Json::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Json, E> {
        Ok(Json::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Json, E> {
        Number::from_f64(v)
            .map(Json::Number)
            .ok_or_else(|| E::custom("number is not finite"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Json, E> {
        Ok(Json::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Json, E> {
        Ok(Json::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Json, E> {
        Ok(Json::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Json, E> {
        Ok(Json::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Json, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Json, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Json::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Json, A::Error> {
        let mut members = Vec::new();
        while let Some((name, value)) = map.next_entry::<String, Json>()? {
            members.push((name, value));
        }
        Ok(Json::Object(members))
    }
}

pub(crate) fn parse_json(builder: &mut TreeBuilder<'_, '_>, buffer: &str) -> Result<(), ParseError> {
    if buffer.trim().is_empty() {
        return Ok(());
    }

    let value: Json = serde_json::from_str(buffer).map_err(|e| ParseError::Syntax {
        message: e.to_string(),
    })?;
    let Json::Object(members) = value else {
        return Err(ParseError::Syntax {
            message: "top-level JSON value must be an object".to_string(),
        });
    };

    let mut seen = HashSet::new();
    for (qualified, member) in &members {
        let (module_name, name) = qualified.split_once(':').ok_or_else(|| ParseError::Syntax {
            message: format!("top-level member '{}' is not module-qualified", qualified),
        })?;
        let Some(module) = builder.context().find_module(module_name) else {
            let error = ParseError::UnknownModule {
                name: module_name.to_string(),
            };
            builder.unknown_module(error, &format!("/{}", qualified))?;
            continue;
        };
        if let Some(schema) = builder.resolve_top(module, name)? {
            check_repeated(builder, &mut seen, schema, None)?;
            add_member(builder, schema, None, member)?;
        }
    }
    Ok(())
}

/// Rejects a second member naming the same schema node in one object.
fn check_repeated(
    builder: &TreeBuilder<'_, '_>,
    seen: &mut HashSet<SchemaId>,
    schema: &SchemaNode,
    parent: Option<NodeId>,
) -> Result<(), ParseError> {
    if seen.insert(schema.id()) {
        Ok(())
    } else {
        Err(ParseError::Duplicate {
            path: builder.child_path(parent, schema),
        })
    }
}

fn add_member<'ctx>(
    builder: &mut TreeBuilder<'ctx, '_>,
    schema: &'ctx SchemaNode,
    parent: Option<NodeId>,
    value: &Json,
) -> Result<(), ParseError> {
    match schema.kind() {
        NodeKind::Container => {
            let members = as_object(builder, schema, parent, value)?;
            let id = builder.open(schema, parent)?;
            add_children(builder, schema, id, members)?;
            builder.close(id)
        }
        NodeKind::List => {
            for entry in as_array(builder, schema, parent, value)? {
                let members = as_object(builder, schema, parent, entry)?;
                let id = builder.open(schema, parent)?;
                add_children(builder, schema, id, members)?;
                builder.close(id)?;
            }
            Ok(())
        }
        NodeKind::Leaf => {
            let text = scalar_text(builder, schema, parent, value)?;
            builder.leaf(schema, parent, &text).map(|_| ())
        }
        NodeKind::LeafList => {
            for item in as_array(builder, schema, parent, value)? {
                let text = scalar_text(builder, schema, parent, item)?;
                builder.leaf(schema, parent, &text)?;
            }
            Ok(())
        }
    }
}

fn add_children<'ctx>(
    builder: &mut TreeBuilder<'ctx, '_>,
    parent_schema: &'ctx SchemaNode,
    parent: NodeId,
    members: &[(String, Json)],
) -> Result<(), ParseError> {
    let mut seen = HashSet::new();
    for (qualified, value) in members {
        let schema = match qualified.split_once(':') {
            Some((module_name, name)) => {
                let same_module = builder
                    .context()
                    .module(parent_schema.module())
                    .map_or(false, |m| m.name() == module_name);
                if same_module {
                    builder.resolve_child(parent_schema, parent, name)?
                } else {
                    let path = format!("{}/{}", builder.node_path(Some(parent)), qualified);
                    builder.unknown(path)?
                }
            }
            None => builder.resolve_child(parent_schema, parent, qualified)?,
        };
        if let Some(schema) = schema {
            check_repeated(builder, &mut seen, schema, Some(parent))?;
            add_member(builder, schema, Some(parent), value)?;
        }
    }
    Ok(())
}

fn as_object<'v>(
    builder: &TreeBuilder<'_, '_>,
    schema: &SchemaNode,
    parent: Option<NodeId>,
    value: &'v Json,
) -> Result<&'v [(String, Json)], ParseError> {
    match value {
        Json::Object(members) => Ok(members),
        _ => Err(mismatch(builder, schema, parent, "an object")),
    }
}

fn as_array<'v>(
    builder: &TreeBuilder<'_, '_>,
    schema: &SchemaNode,
    parent: Option<NodeId>,
    value: &'v Json,
) -> Result<&'v [Json], ParseError> {
    match value {
        Json::Array(items) => Ok(items),
        _ => Err(mismatch(builder, schema, parent, "an array")),
    }
}

fn scalar_text(
    builder: &TreeBuilder<'_, '_>,
    schema: &SchemaNode,
    parent: Option<NodeId>,
    value: &Json,
) -> Result<String, ParseError> {
    match value {
        Json::String(s) => Ok(s.clone()),
        Json::Number(n) => Ok(n.to_string()),
        Json::Bool(b) => Ok(b.to_string()),
        Json::Array(items) if matches!(items.as_slice(), [Json::Null]) => Ok(String::new()),
        _ => Err(mismatch(builder, schema, parent, "a scalar value")),
    }
}

fn mismatch(
    builder: &TreeBuilder<'_, '_>,
    schema: &SchemaNode,
    parent: Option<NodeId>,
    expected: &str,
) -> ParseError {
    ParseError::KindMismatch {
        path: builder.child_path(parent, schema),
        expected: expected.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::document::{parse, DataFormat, ParseOptions};
    use crate::export::export_tree;
    use crate::log::LogLevel;
    use crate::schema::SchemaContext;
    use std::cell::RefCell;

    const SCHEMA: &str = r#"
modules:
  - name: ex
    namespace: urn:ex
    nodes:
      - name: top
        kind: container
        children:
          - { name: name, kind: leaf }
          - { name: count, kind: leaf, type: uint64 }
          - { name: up, kind: leaf, type: boolean }
          - { name: flag, kind: leaf, type: empty }
          - { name: tag, kind: leaf-list }
          - name: entry
            kind: list
            keys: [id]
            children:
              - { name: id, kind: leaf, type: uint8 }
              - { name: note, kind: leaf }
  - name: other
    namespace: urn:other
    nodes:
      - { name: solo, kind: leaf }
"#;

    fn pairs(json: &str) -> Option<Vec<(String, String)>> {
        let ctx = SchemaContext::from_yaml_str(SCHEMA).unwrap();
        let tree = parse(&ctx, json, DataFormat::Json, ParseOptions::DATA, None)?;
        Some(export_tree(&tree).collect())
    }

    /// Parses with `options` and returns the export plus the logged events.
    fn parse_logged(
        json: &str,
        options: ParseOptions,
    ) -> (Option<Vec<(String, String)>>, Vec<(LogLevel, String)>) {
        let ctx = SchemaContext::from_yaml_str(SCHEMA).unwrap();
        let events = RefCell::new(Vec::new());
        let sink = |level: LogLevel, msg: &str, _: Option<&str>| {
            events.borrow_mut().push((level, msg.to_string()));
        };
        let pairs = parse(&ctx, json, DataFormat::Json, options, Some(&sink))
            .map(|tree| export_tree(&tree).collect());
        (pairs, events.into_inner())
    }

    fn has_error(events: &[(LogLevel, String)], text: &str) -> bool {
        events
            .iter()
            .any(|(level, msg)| *level == LogLevel::Error && msg.contains(text))
    }

    fn pair(path: &str, value: &str) -> (String, String) {
        (path.to_string(), value.to_string())
    }

    #[test]
    fn test_members_in_document_order() {
        let json = r#"{
            "ex:top": {
                "up": true,
                "count": "18446744073709551615",
                "name": "r1",
                "flag": [null],
                "tag": ["b", "a"]
            }
        }"#;
        assert_eq!(
            pairs(json).unwrap(),
            vec![
                pair("/ex:top/up", "true"),
                pair("/ex:top/count", "18446744073709551615"),
                pair("/ex:top/name", "r1"),
                pair("/ex:top/flag", ""),
                pair("/ex:top/tag[.='b']", "b"),
                pair("/ex:top/tag[.='a']", "a"),
            ]
        );
    }

    #[test]
    fn test_list_entries() {
        let json = r#"{"ex:top": {"entry": [{"id": 1, "note": "x"}, {"ex:id": 2}]}}"#;
        assert_eq!(
            pairs(json).unwrap(),
            vec![
                pair("/ex:top/entry[id='1']/id", "1"),
                pair("/ex:top/entry[id='1']/note", "x"),
                pair("/ex:top/entry[id='2']/id", "2"),
            ]
        );
    }

    #[test]
    fn test_multiple_modules() {
        let json = r#"{"other:solo": "s", "ex:top": {"name": "n"}}"#;
        assert_eq!(
            pairs(json).unwrap(),
            vec![pair("/other:solo", "s"), pair("/ex:top/name", "n")]
        );
    }

    #[test]
    fn test_unknown_members_skipped() {
        let json = r#"{"ex:top": {"bogus": {"a": 1}, "other:solo": "x", "name": "kept"}}"#;
        assert_eq!(pairs(json).unwrap(), vec![pair("/ex:top/name", "kept")]);
    }

    #[test]
    fn test_rejected_documents() {
        assert!(pairs(r#"{"ex:top": {"name": "a"}"#).is_none());
        assert!(pairs(r#"["ex:top"]"#).is_none());
        assert!(pairs(r#"{"top": {}}"#).is_none());
        assert!(pairs(r#"{"nope:top": {}}"#).is_none());
        assert!(pairs(r#"{"ex:top": []}"#).is_none());
        assert!(pairs(r#"{"ex:top": {"entry": {"id": 1}}}"#).is_none());
        assert!(pairs(r#"{"ex:top": {"name": {"x": 1}}}"#).is_none());
        assert!(pairs(r#"{"ex:top": {"tag": "single"}}"#).is_none());
        assert!(pairs(r#"{"ex:top": {"entry": [{"id": 300}]}}"#).is_none());
    }

    #[test]
    fn test_repeated_member_is_duplicate() {
        let (pairs, events) =
            parse_logged(r#"{"ex:top": {"name": "1", "name": "2"}}"#, ParseOptions::DATA);
        assert!(pairs.is_none());
        assert!(has_error(&events, "Duplicate instance of '/ex:top/name'"));

        // The module qualifier does not make it a different member
        let (pairs, _) =
            parse_logged(r#"{"ex:top": {"name": "1", "ex:name": "2"}}"#, ParseOptions::DATA);
        assert!(pairs.is_none());
    }

    #[test]
    fn test_repeated_top_level_member_is_duplicate() {
        let (pairs, events) = parse_logged(r#"{"other:solo": "a", "other:solo": "b"}"#, ParseOptions::DATA);
        assert!(pairs.is_none());
        assert!(has_error(&events, "Duplicate instance of '/other:solo'"));
    }

    #[test]
    fn test_repeated_list_and_leaf_list_members() {
        let lists = r#"{"ex:top": {"entry": [{"id": 1}], "entry": [{"id": 2}]}}"#;
        assert!(parse_logged(lists, ParseOptions::DATA).0.is_none());

        let tags = r#"{"ex:top": {"tag": ["a"], "tag": ["b"]}}"#;
        assert!(parse_logged(tags, ParseOptions::DATA).0.is_none());
    }

    #[test]
    fn test_unknown_module_skipped_unless_strict() {
        let json = r#"{
            "ex:top": {"name": "n"},
            "ietf-yang-library:modules-state": {"module-set-id": "0"}
        }"#;

        let (pairs, events) = parse_logged(json, ParseOptions::GET);
        assert_eq!(pairs.unwrap(), vec![pair("/ex:top/name", "n")]);
        assert!(events.iter().any(|(level, msg)| {
            *level == LogLevel::Warning && msg.contains("Module 'ietf-yang-library' is not loaded")
        }));

        let strict = ParseOptions::GET | ParseOptions::STRICT;
        let (pairs, events) = parse_logged(json, strict);
        assert!(pairs.is_none());
        assert!(has_error(&events, "Module 'ietf-yang-library' is not loaded"));
    }
}
