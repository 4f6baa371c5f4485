//! Document model over parsed HTML
//!
//! Wraps a parsed page behind a uniform query interface so the checks and
//! the fix engine never touch the parser's own tree types. Parsing is done
//! by `scraper`; the resulting tree is lowered into an arena of owned nodes
//! addressed by stable [`NodeId`] handles. Handles stay valid for the
//! lifetime of the document session, which is what lets a fix re-find the
//! node an issue was raised against long after the scan that produced it.

pub mod style;

use serde::{Deserialize, Serialize};

/// Opaque handle to a node in a document's arena.
///
/// Valid only for the document that produced it; the fix engine re-validates
/// the recorded tag before trusting a handle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// A child slot: either a nested element or a run of text.
#[derive(Debug, Clone)]
enum Child {
    Element(NodeId),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    /// Attribute pairs in source order; names are lowercase per the parser
    attrs: Vec<(String, String)>,
    parent: Option<NodeId>,
    children: Vec<Child>,
}

/// One parsed document snapshot.
///
/// Queries are read-only; the only mutations are attribute-level
/// (`set_attr` / `remove_attr`), used by the fix engine.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

/// Elements serialized without a closing tag.
const VOID_TAGS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

impl Document {
    /// Parse an HTML string into a document. The underlying parser is
    /// lenient, so this never fails; garbage input yields a small or empty
    /// tree rather than an error.
    pub fn parse(html: &str) -> Self {
        let parsed = scraper::Html::parse_document(html);
        let mut doc = Document {
            nodes: Vec::new(),
            root: None,
        };
        let root_children = doc.lower_children(parsed.tree.root(), None);
        doc.root = root_children.iter().find_map(|c| match c {
            Child::Element(id) => Some(*id),
            Child::Text(_) => None,
        });
        doc
    }

    fn lower_children(
        &mut self,
        node: ego_tree::NodeRef<'_, scraper::Node>,
        parent: Option<NodeId>,
    ) -> Vec<Child> {
        let mut out = Vec::new();
        for child in node.children() {
            match child.value() {
                scraper::Node::Element(el) => {
                    let id = NodeId(self.nodes.len());
                    self.nodes.push(NodeData {
                        tag: el.name().to_string(),
                        attrs: el
                            .attrs()
                            .map(|(k, v)| (k.to_string(), v.to_string()))
                            .collect(),
                        parent,
                        children: Vec::new(),
                    });
                    let grandchildren = self.lower_children(child, Some(id));
                    self.nodes[id.0].children = grandchildren;
                    out.push(Child::Element(id));
                }
                scraper::Node::Text(text) => {
                    out.push(Child::Text(text.to_string()));
                }
                // comments, doctype, processing instructions
                _ => {}
            }
        }
        out
    }

    /// The root element handle (usually `<html>`), if the input had any
    /// element at all.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Whether a handle refers to a node in this document.
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Element children of a node, in order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id.0]
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Element(id) => Some(*id),
                Child::Text(_) => None,
            })
            .collect()
    }

    /// All element handles in document order.
    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Handles of every element with the given tag, in document order.
    pub fn nodes_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.all_nodes()
            .filter(|id| self.nodes[id.0].tag == tag)
            .collect()
    }

    /// Handles of every element whose tag is in `tags`, in document order.
    pub fn nodes_by_tags(&self, tags: &[&str]) -> Vec<NodeId> {
        self.all_nodes()
            .filter(|id| tags.contains(&self.nodes[id.0].tag.as_str()))
            .collect()
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0]
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute, returning the prior value (`None` if it was absent).
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Option<String> {
        let attrs = &mut self.nodes[id.0].attrs;
        if let Some(slot) = attrs.iter_mut().find(|(k, _)| k == name) {
            Some(std::mem::replace(&mut slot.1, value.to_string()))
        } else {
            attrs.push((name.to_string(), value.to_string()));
            None
        }
    }

    /// Remove an attribute, returning the prior value if it was present.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let attrs = &mut self.nodes[id.0].attrs;
        let pos = attrs.iter().position(|(k, _)| k == name)?;
        Some(attrs.remove(pos).1)
    }

    /// Whitespace-normalized text content of a node's subtree.
    pub fn text(&self, id: NodeId) -> String {
        let mut parts: Vec<String> = Vec::new();
        self.collect_text(id, &mut parts);
        let joined = parts.join(" ");
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Whitespace-normalized text from this node's immediate text children
    /// only, ignoring nested elements.
    pub fn direct_text(&self, id: NodeId) -> String {
        let parts: Vec<&str> = self.nodes[id.0]
            .children
            .iter()
            .filter_map(|c| match c {
                Child::Text(t) => Some(t.as_str()),
                Child::Element(_) => None,
            })
            .collect();
        parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, id: NodeId, parts: &mut Vec<String>) {
        for child in &self.nodes[id.0].children {
            match child {
                Child::Text(t) => parts.push(t.clone()),
                Child::Element(c) => self.collect_text(*c, parts),
            }
        }
    }

    /// CSS class list of a node.
    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        self.attr(id, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Resolve a style property from the node's inline style, falling back
    /// to its ancestors. This approximates inherited computed style for
    /// static HTML; external stylesheets are not cascaded.
    pub fn effective_style(&self, id: NodeId, property: &str) -> Option<String> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(style) = self.attr(node, "style") {
                if let Some(value) = style::style_property(style, property) {
                    return Some(value);
                }
            }
            current = self.parent(node);
        }
        None
    }

    /// Whether an element is likely visible to users. Hidden nodes are
    /// skipped by most checks.
    pub fn is_visible(&self, id: NodeId) -> bool {
        if self.has_attr(id, "hidden") {
            return false;
        }
        if self.attr(id, "aria-hidden") == Some("true") {
            return false;
        }
        if let Some(style) = self.attr(id, "style") {
            let lowered = style.to_lowercase();
            if lowered.contains("display:none")
                || lowered.contains("display: none")
                || lowered.contains("visibility:hidden")
                || lowered.contains("visibility: hidden")
            {
                return false;
            }
        }
        let hidden_classes = ["hidden", "invisible", "sr-only", "visually-hidden"];
        if self
            .classes(id)
            .iter()
            .any(|c| hidden_classes.contains(c))
        {
            return false;
        }
        true
    }

    /// Serialized opening tag of a node, for human-facing issue records.
    pub fn snippet(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        let mut out = format!("<{}", node.tag);
        for (k, v) in &node.attrs {
            out.push_str(&format!(" {}=\"{}\"", k, escape_attr(v)));
        }
        out.push('>');
        out
    }

    /// Short structural context: up to two enclosing tags, outermost first,
    /// e.g. `<body> > <div>`.
    pub fn context(&self, id: NodeId) -> String {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            chain.push(format!("<{}>", self.tag(node)));
            if chain.len() == 2 {
                break;
            }
            current = self.parent(node);
        }
        if chain.is_empty() {
            "document root".to_string()
        } else {
            chain.reverse();
            chain.join(" > ")
        }
    }

    /// Text of the first `<title>` element, if any.
    pub fn title(&self) -> Option<String> {
        self.nodes_by_tag("title")
            .first()
            .map(|id| self.text(*id))
            .filter(|t| !t.is_empty())
    }

    /// Serialize the document back to HTML. Attribute mutations made since
    /// parsing are reflected; comments and doctype flavor from the input
    /// are not preserved.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n");
        if let Some(root) = self.root {
            self.write_node(root, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        out.push('<');
        out.push_str(&node.tag);
        for (k, v) in &node.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            out.push_str(&escape_attr(v));
            out.push('"');
        }
        out.push('>');
        if VOID_TAGS.contains(&node.tag.as_str()) {
            return;
        }
        for child in &node.children {
            match child {
                Child::Text(t) => out.push_str(&escape_text(t)),
                Child::Element(c) => self.write_node(*c, out),
            }
        }
        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
