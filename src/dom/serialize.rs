//! Serialization of the arena DOM back to an HTML string.
//!
//! Escaping, void elements, and rawtext elements (`<style>`) are all
//! delegated to html5ever's serializer; this module only walks the arena.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};

use super::arena::{ArenaDom, NodeData, NodeId};

/// A node in an arena, viewed as a serializable tree.
pub struct SerializableNode<'a> {
    pub dom: &'a ArenaDom,
    pub id: NodeId,
}

impl Serialize for SerializableNode<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        serialize_node(self.dom, self.id, serializer, traversal_scope)
    }
}

fn serialize_node<S>(
    dom: &ArenaDom,
    id: NodeId,
    serializer: &mut S,
    traversal_scope: TraversalScope,
) -> io::Result<()>
where
    S: Serializer,
{
    let Some(node) = dom.get(id) else {
        return Ok(());
    };

    let include_node = matches!(traversal_scope, TraversalScope::IncludeNode);

    match &node.data {
        NodeData::Element { name, attrs, .. } => {
            if include_node {
                serializer.start_elem(
                    name.clone(),
                    attrs.iter().map(|a| (&a.name, a.value.as_str())),
                )?;
            }
            for child in dom.children(id) {
                serialize_node(dom, child, serializer, TraversalScope::IncludeNode)?;
            }
            if include_node {
                serializer.end_elem(name.clone())?;
            }
            Ok(())
        }
        NodeData::Document => {
            for child in dom.children(id) {
                serialize_node(dom, child, serializer, TraversalScope::IncludeNode)?;
            }
            Ok(())
        }
        NodeData::Text(text) => serializer.write_text(text),
        NodeData::Comment(text) => serializer.write_comment(text),
        NodeData::Doctype { name } => serializer.write_doctype(name),
    }
}

/// Serialize the whole document to an HTML string.
pub fn to_html(dom: &ArenaDom) -> String {
    serialize_to_string(dom, dom.document(), TraversalScope::IncludeNode)
}

/// Serialize a node's children (its inner HTML) to a string.
pub fn inner_html(dom: &ArenaDom, id: NodeId) -> String {
    serialize_to_string(dom, id, TraversalScope::ChildrenOnly(None))
}

fn serialize_to_string(dom: &ArenaDom, id: NodeId, scope: TraversalScope) -> String {
    let mut bytes = Vec::new();
    let node = SerializableNode { dom, id };
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    // Writing to a Vec<u8> cannot fail.
    let _ = serialize(&mut bytes, &node, opts);
    String::from_utf8(bytes).unwrap_or_default()
}
