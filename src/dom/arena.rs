//! Arena-based DOM for HTML normalization.
//!
//! Nodes live in a contiguous vector; parent/child/sibling links are indices
//! into it. Detached nodes stay allocated but unlinked, so node ids remain
//! stable across structural mutation. Passes that mutate the tree snapshot
//! their match sets (e.g. via [`ArenaDom::descendants`]) before rewriting.

use html5ever::{LocalName, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Pre-extracted classes for fast style matching.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    /// Comment (preserved for serialization, ignored by passes).
    Comment(String),
    /// Document type declaration.
    Doctype { name: String },
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node in the arena.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Make an HTML-namespace qualified name from a local tag name.
pub fn html_name(local: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(local))
}

/// Make a no-namespace qualified name for an attribute.
pub fn attr_name(local: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(local))
}

/// Arena-based document tree.
pub struct ArenaDom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl ArenaDom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let classes = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "class")
            .map(|a| a.value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            classes,
        }))
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    /// Create a doctype node.
    pub fn create_doctype(&mut self, name: String) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype { name }))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);

        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Append text to a parent, coalescing onto a trailing text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(existing) = &mut last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        self.detach(new_node);

        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Unlink a node from its parent and siblings. The node stays allocated
    /// and keeps its own children; the surrounding tree is re-linked.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if parent.is_some()
            && let Some(p) = self.get_mut(parent)
        {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if parent.is_some()
            && let Some(p) = self.get_mut(parent)
        {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Replace a node with its own children, in place.
    pub fn unwrap(&mut self, id: NodeId) {
        let children: Vec<_> = self.children(id).collect();
        for child in children {
            self.insert_before(id, child);
        }
        self.detach(id);
    }

    /// Move all children of `from` onto the end of `to`.
    pub fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        let children: Vec<_> = self.children(from).collect();
        for child in children {
            self.append(to, child);
        }
    }

    /// Replace an element's children with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let children: Vec<_> = self.children(id).collect();
        for child in children {
            self.detach(child);
        }
        let text_node = self.create_text(text.to_string());
        self.append(id, text_node);
    }

    /// Change an element's tag name, preserving attributes and children.
    pub fn retag(&mut self, id: NodeId, local: &str) {
        if let Some(node) = self.get_mut(id)
            && let NodeData::Element { name, .. } = &mut node.data
        {
            *name = html_name(local);
        }
    }

    /// Whether the node is still reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        while let Some(node) = self.get(cur) {
            if cur == self.document {
                return true;
            }
            cur = node.parent;
            if cur.is_none() {
                return false;
            }
        }
        false
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Snapshot of all descendants of a node, in document order.
    ///
    /// Returns an owned vector so callers can mutate the tree while walking
    /// the match set; detached nodes are filtered with [`Self::is_attached`]
    /// by the caller where it matters.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            result.push(id);
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        result
    }

    /// All attached elements with the given tag name, in document order.
    pub fn elements_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.element_name(id).is_some_and(|n| n.as_ref() == tag))
            .collect()
    }

    /// Get element's local name (tag).
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get an attribute value.
    pub fn attr(&self, id: NodeId, attr: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Set (or replace) an attribute value.
    pub fn set_attr(&mut self, id: NodeId, attr: &str, value: &str) {
        if let Some(node) = self.get_mut(id)
            && let NodeData::Element { attrs, classes, .. } = &mut node.data
        {
            if let Some(existing) = attrs.iter_mut().find(|a| a.name.local.as_ref() == attr) {
                existing.value = value.to_string();
            } else {
                attrs.push(Attribute {
                    name: attr_name(attr),
                    value: value.to_string(),
                });
            }
            if attr == "class" {
                *classes = value.split_whitespace().map(str::to_string).collect();
            }
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, id: NodeId, attr: &str) {
        if let Some(node) = self.get_mut(id)
            && let NodeData::Element { attrs, classes, .. } = &mut node.data
        {
            attrs.retain(|a| a.name.local.as_ref() != attr);
            if attr == "class" {
                classes.clear();
            }
        }
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: NodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Check if node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    /// Get the payload of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of all descendant text nodes, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(s) = self.text(id) {
            out.push_str(s);
        }
        for desc in self.descendants(id) {
            if let Some(s) = self.text(desc) {
                out.push_str(s);
            }
        }
        out
    }

    /// Coalesce adjacent text siblings throughout the subtree.
    ///
    /// Several passes split or hoist text; smoothing restores the invariant
    /// that no two text nodes are adjacent, which the backtick pass relies
    /// on to see split backtick pairs as one run.
    pub fn smooth(&mut self, root: NodeId) {
        let mut parents = vec![root];
        parents.extend(self.descendants(root));
        for parent in parents {
            self.smooth_children(parent);
        }
    }

    fn smooth_children(&mut self, parent: NodeId) {
        let children: Vec<_> = self.children(parent).collect();
        let mut target: Option<NodeId> = None;
        for child in children {
            if !self.is_text(child) {
                target = None;
                continue;
            }
            let Some(run_head) = target else {
                target = Some(child);
                continue;
            };
            let tail = match self.text(child) {
                Some(s) => s.to_string(),
                None => continue,
            };
            self.detach(child);
            if let Some(node) = self.get_mut(run_head)
                && let NodeData::Text(s) = &mut node.data
            {
                s.push_str(&tail);
            }
        }
    }

    /// Deep-copy a subtree from another arena, appending it under `parent`.
    pub fn adopt_subtree(&mut self, other: &ArenaDom, from: NodeId, parent: NodeId) {
        let copied = match other.get(from).map(|n| &n.data) {
            Some(NodeData::Element { name, attrs, classes }) => {
                let id = self.alloc(Node::new(NodeData::Element {
                    name: name.clone(),
                    attrs: attrs.clone(),
                    classes: classes.clone(),
                }));
                Some(id)
            }
            Some(NodeData::Text(s)) => Some(self.create_text(s.clone())),
            Some(NodeData::Comment(s)) => Some(self.create_comment(s.clone())),
            _ => None,
        };

        let Some(copied) = copied else { return };
        self.append(parent, copied);
        let children: Vec<_> = other.children(from).collect();
        for child in children {
            self.adopt_subtree(other, child, copied);
        }
    }

    /// Number of allocated nodes (including detached ones).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_children() {
        let mut dom = ArenaDom::new();

        let parent = dom.create_element(html_name("div"), vec![]);
        let child1 = dom.create_element(html_name("p"), vec![]);
        let child2 = dom.create_element(html_name("p"), vec![]);

        dom.append(dom.document(), parent);
        dom.append(parent, child1);
        dom.append(parent, child2);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
    }

    #[test]
    fn test_text_coalescing_on_append() {
        let mut dom = ArenaDom::new();

        let p = dom.create_element(html_name("p"), vec![]);
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_detach_relinks_siblings() {
        let mut dom = ArenaDom::new();

        let div = dom.create_element(html_name("div"), vec![]);
        dom.append(dom.document(), div);
        let a = dom.create_element(html_name("a"), vec![]);
        let b = dom.create_element(html_name("b"), vec![]);
        let c = dom.create_element(html_name("i"), vec![]);
        dom.append(div, a);
        dom.append(div, b);
        dom.append(div, c);

        dom.detach(b);

        let children: Vec<_> = dom.children(div).collect();
        assert_eq!(children, vec![a, c]);
        assert!(!dom.is_attached(b));
        assert_eq!(dom.get(a).unwrap().next_sibling, c);
        assert_eq!(dom.get(c).unwrap().prev_sibling, a);
    }

    #[test]
    fn test_unwrap_splices_children_in_place() {
        let mut dom = ArenaDom::new();

        let p = dom.create_element(html_name("p"), vec![]);
        dom.append(dom.document(), p);
        let before = dom.create_text("x".into());
        let span = dom.create_element(html_name("span"), vec![]);
        let after = dom.create_text("y".into());
        dom.append(p, before);
        dom.append(p, span);
        dom.append(p, after);
        let inner = dom.create_text("mid".into());
        dom.append(span, inner);

        dom.unwrap(span);

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children, vec![before, inner, after]);
    }

    #[test]
    fn test_retag_preserves_children_and_attrs() {
        let mut dom = ArenaDom::new();

        let span = dom.create_element(
            html_name("span"),
            vec![Attribute {
                name: attr_name("class"),
                value: "c1".to_string(),
            }],
        );
        dom.append(dom.document(), span);
        let text = dom.create_text("hi".into());
        dom.append(span, text);

        dom.retag(span, "code");

        assert_eq!(dom.element_name(span).unwrap().as_ref(), "code");
        assert_eq!(dom.attr(span, "class"), Some("c1"));
        assert_eq!(dom.children(span).count(), 1);
    }

    #[test]
    fn test_smooth_merges_adjacent_text() {
        let mut dom = ArenaDom::new();

        let p = dom.create_element(html_name("p"), vec![]);
        dom.append(dom.document(), p);
        let t1 = dom.create_text("a".into());
        let t2 = dom.create_text("b".into());
        let t3 = dom.create_text("c".into());
        dom.append(p, t1);
        // Bypass append_text coalescing to simulate post-surgery state.
        dom.append(p, t2);
        dom.append(p, t3);

        dom.smooth(dom.document());

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text(children[0]), Some("abc"));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut dom = ArenaDom::new();

        let p = dom.create_element(html_name("p"), vec![]);
        dom.append(dom.document(), p);
        dom.append_text(p, "one ");
        let b = dom.create_element(html_name("b"), vec![]);
        dom.append(p, b);
        dom.append_text(b, "two");

        assert_eq!(dom.text_content(p), "one two");
    }
}
