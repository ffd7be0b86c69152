//! XML instance data reader.
//!
//! Top-level elements select their module through their namespace; nested
//! elements must stay in their parent's module. Leaf text is trimmed and
//! unescaped, CDATA sections are accepted, and `<leaf/>` is an empty value.

use super::error::ParseError;
use super::node::NodeId;
use super::parser::TreeBuilder;
use crate::schema::SchemaNode;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

enum Frame<'ctx> {
    /// Open container or list instance.
    Inner {
        id: NodeId,
        schema: &'ctx SchemaNode,
    },
    /// Open leaf or leaf-list element collecting its text.
    Scalar {
        schema: &'ctx SchemaNode,
        parent: Option<NodeId>,
        text: String,
    },
}

struct XmlReader<'b, 'ctx, 'l> {
    builder: &'b mut TreeBuilder<'ctx, 'l>,
    stack: Vec<Frame<'ctx>>,
    /// Depth inside an element that is being skipped.
    skip_depth: usize,
}

pub(crate) fn parse_xml(builder: &mut TreeBuilder<'_, '_>, buffer: &str) -> Result<(), ParseError> {
    let mut reader = NsReader::from_str(buffer);
    reader.config_mut().trim_text(true);

    let mut xml = XmlReader {
        builder,
        stack: Vec::new(),
        skip_depth: 0,
    };

    loop {
        let (namespace, event) = match reader.read_resolved_event() {
            Ok((ns, event)) => (resolve_namespace(ns)?, event),
            Err(e) => return Err(syntax(e)),
        };

        match event {
            Event::Start(e) => xml.start(&e, namespace, false)?,
            Event::Empty(e) => xml.start(&e, namespace, true)?,
            Event::End(_) => xml.end()?,
            Event::Text(t) => {
                let text = t.unescape().map_err(syntax)?;
                xml.text(&text)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                xml.text(&text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if !xml.stack.is_empty() || xml.skip_depth > 0 {
        return Err(ParseError::Syntax {
            message: "unexpected end of document".to_string(),
        });
    }
    Ok(())
}

fn syntax<E: std::fmt::Display>(e: E) -> ParseError {
    ParseError::Syntax {
        message: e.to_string(),
    }
}

fn resolve_namespace(ns: ResolveResult<'_>) -> Result<Option<String>, ParseError> {
    match ns {
        ResolveResult::Bound(ns) => Ok(Some(String::from_utf8_lossy(ns.as_ref()).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(ParseError::Syntax {
            message: format!(
                "undeclared namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            ),
        }),
    }
}

impl<'b, 'ctx, 'l> XmlReader<'b, 'ctx, 'l> {
    fn start(
        &mut self,
        element: &BytesStart<'_>,
        namespace: Option<String>,
        empty: bool,
    ) -> Result<(), ParseError> {
        if self.skip_depth > 0 {
            if !empty {
                self.skip_depth += 1;
            }
            return Ok(());
        }

        let name = std::str::from_utf8(element.local_name().as_ref())
            .map_err(syntax)?
            .to_string();

        let parent = match self.stack.last() {
            None => None,
            Some(Frame::Inner { id, schema }) => Some((*id, *schema)),
            Some(Frame::Scalar { schema, parent, .. }) => {
                return Err(ParseError::KindMismatch {
                    path: self.builder.child_path(*parent, schema),
                    expected: format!("text content, found element '{}'", name),
                })
            }
        };

        let schema = match parent {
            None => self.resolve_top(namespace.as_deref(), &name)?,
            Some((id, parent_schema)) => {
                let same_module = match namespace.as_deref() {
                    None => true,
                    Some(ns) => self
                        .builder
                        .context()
                        .module(parent_schema.module())
                        .map_or(false, |m| m.namespace() == ns),
                };
                if same_module {
                    self.builder.resolve_child(parent_schema, id, &name)?
                } else {
                    let path = format!("{}/{}", self.builder.node_path(Some(id)), name);
                    self.builder.unknown(path)?
                }
            }
        };

        let Some(schema) = schema else {
            if !empty {
                self.skip_depth = 1;
            }
            return Ok(());
        };
        let parent_id = parent.map(|(id, _)| id);

        if schema.kind().is_scalar() {
            if empty {
                self.builder.leaf(schema, parent_id, "")?;
            } else {
                self.stack.push(Frame::Scalar {
                    schema,
                    parent: parent_id,
                    text: String::new(),
                });
            }
        } else {
            let id = self.builder.open(schema, parent_id)?;
            if empty {
                self.builder.close(id)?;
            } else {
                self.stack.push(Frame::Inner { id, schema });
            }
        }
        Ok(())
    }

    fn resolve_top(
        &self,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Option<&'ctx SchemaNode>, ParseError> {
        let namespace = namespace.unwrap_or_default();
        let Some(module) = self.builder.context().module_by_namespace(namespace) else {
            let error = ParseError::UnknownNamespace {
                namespace: namespace.to_string(),
            };
            self.builder.unknown_module(error, &format!("/{}", name))?;
            return Ok(None);
        };
        self.builder.resolve_top(module, name)
    }

    fn end(&mut self) -> Result<(), ParseError> {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return Ok(());
        }

        match self.stack.pop() {
            Some(Frame::Scalar {
                schema,
                parent,
                text,
            }) => {
                self.builder.leaf(schema, parent, &text)?;
            }
            Some(Frame::Inner { id, .. }) => self.builder.close(id)?,
            // Unbalanced end tags are rejected by the reader itself
            None => {}
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), ParseError> {
        if self.skip_depth > 0 {
            return Ok(());
        }

        match self.stack.last_mut() {
            Some(Frame::Scalar { text: buffer, .. }) => {
                buffer.push_str(text);
                Ok(())
            }
            Some(Frame::Inner { id, .. }) => {
                let path = self.builder.node_path(Some(*id));
                Err(ParseError::KindMismatch {
                    path,
                    expected: format!("child elements, found text '{}'", text),
                })
            }
            None => Err(ParseError::Syntax {
                message: format!("text outside of any element: '{}'", text),
            }),
        }
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
          - { name: flag, kind: leaf, type: empty }
          - { name: tag, kind: leaf-list }
          - name: inner
            kind: container
            children:
              - { name: n, kind: leaf, type: int32 }
  - name: other
    namespace: urn:other
    nodes:
      - { name: solo, kind: leaf }
"#;

    fn pairs(xml: &str) -> Option<Vec<(String, String)>> {
        let ctx = SchemaContext::from_yaml_str(SCHEMA).unwrap();
        let tree = parse(&ctx, xml, DataFormat::Xml, ParseOptions::DATA, None)?;
        Some(export_tree(&tree).collect())
    }

    fn pair(path: &str, value: &str) -> (String, String) {
        (path.to_string(), value.to_string())
    }

    #[test]
    fn test_nested_elements() {
        let xml = r#"<?xml version="1.0"?>
            <top xmlns="urn:ex">
              <name>r1</name>
              <inner><n>+42</n></inner>
            </top>"#;
        assert_eq!(
            pairs(xml).unwrap(),
            vec![pair("/ex:top/name", "r1"), pair("/ex:top/inner/n", "42")]
        );
    }

    #[test]
    fn test_prefixed_namespace_and_multiple_roots() {
        let xml = r#"<e:top xmlns:e="urn:ex"><e:name>a</e:name></e:top><solo xmlns="urn:other">s</solo>"#;
        assert_eq!(
            pairs(xml).unwrap(),
            vec![pair("/ex:top/name", "a"), pair("/other:solo", "s")]
        );
    }

    #[test]
    fn test_entities_cdata_and_empty() {
        let xml = r#"<top xmlns="urn:ex"><name>a &amp; b</name><tag><![CDATA[<x>]]></tag><flag/></top>"#;
        assert_eq!(
            pairs(xml).unwrap(),
            vec![
                pair("/ex:top/name", "a & b"),
                pair("/ex:top/tag[.='<x>']", "<x>"),
                pair("/ex:top/flag", ""),
            ]
        );
    }

    #[test]
    fn test_unknown_subtree_is_skipped() {
        let xml = r#"<top xmlns="urn:ex"><bogus><deep>1</deep><deeper/></bogus><name>kept</name></top>"#;
        assert_eq!(pairs(xml).unwrap(), vec![pair("/ex:top/name", "kept")]);
    }

    #[test]
    fn test_foreign_namespace_child_is_unknown() {
        let xml = r#"<top xmlns="urn:ex"><solo xmlns="urn:other">x</solo><name>n</name></top>"#;
        assert_eq!(pairs(xml).unwrap(), vec![pair("/ex:top/name", "n")]);
    }

    #[test]
    fn test_malformed_documents() {
        assert!(pairs(r#"<top xmlns="urn:ex"><name>a</top>"#).is_none());
        assert!(pairs(r#"<top xmlns="urn:ex"><name>a</name>"#).is_none());
        assert!(pairs(r#"<x:top><name>a</name></x:top>"#).is_none());
    }

    #[test]
    fn test_unknown_namespace_skipped_unless_strict() {
        let ctx = SchemaContext::from_yaml_str(SCHEMA).unwrap();
        let xml = r#"<top xmlns="urn:ex"><name>n</name></top>
            <modules-state xmlns="urn:ietf:params:xml:ns:yang:ietf-yang-library">
              <module><name>ex</name></module>
            </modules-state>"#;

        let warnings = RefCell::new(Vec::new());
        let sink = |level: LogLevel, msg: &str, _: Option<&str>| {
            if level == LogLevel::Warning {
                warnings.borrow_mut().push(msg.to_string());
            }
        };
        let tree = parse(&ctx, xml, DataFormat::Xml, ParseOptions::GET, Some(&sink)).unwrap();
        let exported: Vec<_> = export_tree(&tree).collect();
        assert_eq!(exported, vec![pair("/ex:top/name", "n")]);
        assert!(warnings.borrow()[0].contains("urn:ietf:params:xml:ns:yang:ietf-yang-library"));

        let strict = ParseOptions::GET | ParseOptions::STRICT;
        assert!(parse(&ctx, xml, DataFormat::Xml, strict, None).is_none());
    }

    #[test]
    fn test_only_unknown_namespaces_is_empty() {
        assert!(pairs(r#"<top><name>a</name></top>"#).is_none());
        assert!(pairs(r#"<top xmlns="urn:nope"/>"#).is_none());
    }

    #[test]
    fn test_repeated_leaf_is_duplicate() {
        assert!(pairs(r#"<top xmlns="urn:ex"><name>1</name><name>2</name></top>"#).is_none());
    }

    #[test]
    fn test_kind_mismatches() {
        assert!(pairs(r#"<top xmlns="urn:ex">text</top>"#).is_none());
        assert!(pairs(r#"<top xmlns="urn:ex"><name><inner/></name></top>"#).is_none());
    }
}
