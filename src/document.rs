//! Parsed flow-configuration document
//!
//! An arena-indexed XML tree: nodes live in a flat `Vec` and refer to their
//! parent and children by index, which keeps the tree cycle-free without
//! smart pointers. Every node carries line/column provenance derived from
//! the reader's byte position.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error during document parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("XML parse error at line {line}: {message}")]
    Xml { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Index of a node within its document arena
pub type NodeId = usize;

/// A node in the flow-configuration tree
#[derive(Debug, Clone)]
pub struct FlowNode {
    /// Node kind ("element", "text", "comment")
    pub kind: String,
    /// Qualified name as written (e.g. "http:listener")
    pub name: String,
    /// Local name with any namespace prefix stripped
    pub local_name: String,
    /// Namespace prefix, if the name was qualified
    pub prefix: Option<String>,
    /// Attributes as written
    pub attrs: HashMap<String, String>,
    /// Parent node index
    pub parent: Option<NodeId>,
    /// Child node indices in document order
    pub children: Vec<NodeId>,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Text content (for text and comment nodes)
    pub text_content: Option<String>,
}

impl FlowNode {
    fn element(name: &str, line: usize, column: usize) -> Self {
        let (prefix, local) = split_name(name);
        Self {
            kind: "element".to_string(),
            name: name.to_string(),
            local_name: local,
            prefix,
            attrs: HashMap::new(),
            parent: None,
            children: Vec::new(),
            line,
            column,
            text_content: None,
        }
    }

    fn text(content: &str, line: usize, column: usize) -> Self {
        Self {
            kind: "text".to_string(),
            name: "#text".to_string(),
            local_name: "#text".to_string(),
            prefix: None,
            attrs: HashMap::new(),
            parent: None,
            children: Vec::new(),
            line,
            column,
            text_content: Some(content.to_string()),
        }
    }

    fn comment(content: &str, line: usize, column: usize) -> Self {
        Self {
            kind: "comment".to_string(),
            name: "#comment".to_string(),
            local_name: "#comment".to_string(),
            prefix: None,
            attrs: HashMap::new(),
            parent: None,
            children: Vec::new(),
            line,
            column,
            text_content: Some(content.to_string()),
        }
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.kind == "element"
    }

    /// Get an attribute value by its exact name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|s| s.as_str())
    }

    /// Get an attribute value matching on local name, ignoring any prefix
    pub fn attribute_local(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| split_name(k).1 == local)
            .map(|(_, v)| v.as_str())
    }
}

fn split_name(name: &str) -> (Option<String>, String) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
        None => (None, name.to_string()),
    }
}

/// A parsed flow-configuration document
#[derive(Debug)]
pub struct FlowDocument {
    nodes: Vec<FlowNode>,
    roots: Vec<NodeId>,
    source_lines: Vec<String>,
    path: PathBuf,
}

impl FlowDocument {
    /// Parse XML content into a document tree
    pub fn parse(content: &str, path: &Path) -> Result<Self, ParseError> {
        let (nodes, roots) = parse_xml(content)?;
        Ok(Self {
            nodes,
            roots,
            source_lines: content.lines().map(String::from).collect(),
            path: path.to_path_buf(),
        })
    }

    /// Create an empty document (used for the project-scope rule pass,
    /// which has no backing file)
    pub fn empty(path: &Path) -> Self {
        Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            source_lines: Vec::new(),
            path: path.to_path_buf(),
        }
    }

    /// Source file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The root element, if any
    pub fn root(&self) -> Option<&FlowNode> {
        self.roots.first().map(|&id| &self.nodes[id])
    }

    /// Root node indices
    pub fn root_ids(&self) -> &[NodeId] {
        &self.roots
    }

    /// Get a node by index
    pub fn node(&self, id: NodeId) -> &FlowNode {
        &self.nodes[id]
    }

    /// Iterate over all nodes in document order
    pub fn iter(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.iter()
    }

    /// Iterate over all nodes with their indices
    pub fn iter_ids(&self) -> impl Iterator<Item = (NodeId, &FlowNode)> {
        self.nodes.iter().enumerate()
    }

    /// Child nodes of the given node
    pub fn children_of<'a>(&'a self, node: &'a FlowNode) -> impl Iterator<Item = &'a FlowNode> + 'a {
        node.children.iter().map(|&id| &self.nodes[id])
    }

    /// Parent node of the given node
    pub fn parent_of(&self, node: &FlowNode) -> Option<&FlowNode> {
        node.parent.map(|id| &self.nodes[id])
    }

    /// All descendant indices of the given node, depth-first
    pub fn descendant_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            for &child in self.nodes[next].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Descendant nodes of the given node, depth-first
    pub fn descendants_of<'a>(&'a self, node: &FlowNode) -> Vec<&'a FlowNode> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = node.children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(&self.nodes[next]);
            for &child in self.nodes[next].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Get source line at line number (1-based)
    pub fn source_line(&self, line: usize) -> Option<&str> {
        if line > 0 && line <= self.source_lines.len() {
            Some(&self.source_lines[line - 1])
        } else {
            None
        }
    }
}

fn parse_xml(content: &str) -> Result<(Vec<FlowNode>, Vec<NodeId>), ParseError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut nodes: Vec<FlowNode> = Vec::new();
    let mut roots: Vec<NodeId> = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut buf = Vec::new();

    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(content.match_indices('\n').map(|(i, _)| i + 1))
        .collect();

    let pos_to_line_col = |pos: u64| -> (usize, usize) {
        let pos = pos as usize;
        let line = line_starts.partition_point(|&start| start <= pos);
        let col = pos - line_starts.get(line.saturating_sub(1)).unwrap_or(&0) + 1;
        (line, col)
    };

    let mut attach = |mut node: FlowNode,
                      nodes: &mut Vec<FlowNode>,
                      roots: &mut Vec<NodeId>,
                      stack: &[NodeId]|
     -> NodeId {
        let id = nodes.len();
        if let Some(&parent_id) = stack.last() {
            node.parent = Some(parent_id);
            nodes.push(node);
            nodes[parent_id].children.push(id);
        } else {
            nodes.push(node);
            if nodes[id].is_element() {
                roots.push(id);
            }
        }
        id
    };

    loop {
        // Position of the upcoming event, so provenance points at the
        // opening '<' rather than past the end of the tag
        let event_pos = reader.buffer_position();

        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let (line, col) = pos_to_line_col(event_pos);
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let mut node = FlowNode::element(&name, line, col);
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    node.attrs.insert(key, value);
                }
                let id = attach(node, &mut nodes, &mut roots, &stack);
                stack.push(id);
            }

            Ok(Event::Empty(e)) => {
                let (line, col) = pos_to_line_col(event_pos);
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let mut node = FlowNode::element(&name, line, col);
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    node.attrs.insert(key, value);
                }
                attach(node, &mut nodes, &mut roots, &stack);
            }

            Ok(Event::End(_)) => {
                stack.pop();
            }

            Ok(Event::Text(e)) => {
                let text = e.unescape().map_err(|err| ParseError::Xml {
                    line: pos_to_line_col(event_pos).0,
                    message: err.to_string(),
                })?;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    let (line, col) = pos_to_line_col(event_pos);
                    attach(FlowNode::text(trimmed, line, col), &mut nodes, &mut roots, &stack);
                }
            }

            Ok(Event::Comment(e)) => {
                let (line, col) = pos_to_line_col(event_pos);
                let text = String::from_utf8_lossy(&e).to_string();
                attach(FlowNode::comment(&text, line, col), &mut nodes, &mut roots, &stack);
            }

            Ok(Event::Eof) => break,

            Err(e) => {
                let (line, _) = pos_to_line_col(reader.error_position());
                return Err(ParseError::Xml {
                    line,
                    message: e.to_string(),
                });
            }

            _ => {}
        }

        buf.clear();
    }

    Ok((nodes, roots))
}
