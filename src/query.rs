//! Tree-query facility
//!
//! A small path sub-language rules use to select nodes by structure without
//! caring about namespace prefixes. Matching is always on local names, so
//! `flow/error-handler` finds `<error-handler>` whether or not the document
//! qualifies it.
//!
//! Grammar:
//! - `a/b/c` walks element children starting at the document root
//! - a leading `//` matches the first segment at any depth
//! - `*` matches any element name
//! - `[@attr]` and `[@attr='value']` filter on attributes

use crate::document::{FlowDocument, FlowNode, NodeId};

#[derive(Debug, Clone)]
struct Segment {
    name: String,
    predicates: Vec<(String, Option<String>)>,
}

fn parse_segment(raw: &str) -> Segment {
    let mut name = raw;
    let mut predicates = Vec::new();

    while let Some(open) = name.rfind('[') {
        let Some(close) = name.rfind(']') else { break };
        if close < open {
            break;
        }
        let body = &name[open + 1..close];
        if let Some(attr) = body.strip_prefix('@') {
            match attr.split_once('=') {
                Some((key, value)) => {
                    let value = value.trim_matches('\'').trim_matches('"');
                    predicates.push((key.to_string(), Some(value.to_string())));
                }
                None => predicates.push((attr.to_string(), None)),
            }
        }
        name = &name[..open];
    }

    predicates.reverse();
    Segment {
        name: name.to_string(),
        predicates,
    }
}

fn parse_path(path: &str) -> (bool, Vec<Segment>) {
    let (descendant, rest) = match path.strip_prefix("//") {
        Some(rest) => (true, rest),
        None => (false, path.trim_start_matches('/')),
    };
    let segments = rest
        .split('/')
        .filter(|s| !s.is_empty())
        .map(parse_segment)
        .collect();
    (descendant, segments)
}

fn matches(node: &FlowNode, segment: &Segment) -> bool {
    if !node.is_element() {
        return false;
    }
    if segment.name != "*" && node.local_name != segment.name {
        return false;
    }
    segment.predicates.iter().all(|(key, expected)| {
        match (node.attribute(key), expected) {
            (Some(actual), Some(want)) => actual == want,
            (Some(_), None) => true,
            (None, _) => false,
        }
    })
}

impl FlowDocument {
    /// Select all nodes matching a structural path, in document order
    pub fn select_all(&self, path: &str) -> Vec<&FlowNode> {
        let (descendant, segments) = parse_path(path);
        if segments.is_empty() {
            return Vec::new();
        }

        let mut current: Vec<NodeId> = if descendant {
            self.iter_ids()
                .filter(|(_, n)| matches(n, &segments[0]))
                .map(|(id, _)| id)
                .collect()
        } else {
            self.root_ids()
                .iter()
                .copied()
                .filter(|&id| matches(self.node(id), &segments[0]))
                .collect()
        };

        for segment in &segments[1..] {
            let mut next = Vec::new();
            for id in current {
                for &child in &self.node(id).children {
                    if matches(self.node(child), segment) {
                        next.push(child);
                    }
                }
            }
            current = next;
        }

        current.into_iter().map(|id| self.node(id)).collect()
    }

    /// Select the first node matching a structural path
    pub fn select_first(&self, path: &str) -> Option<&FlowNode> {
        self.select_all(path).into_iter().next()
    }

    /// Check whether any node matches the path
    pub fn exists(&self, path: &str) -> bool {
        !self.select_all(path).is_empty()
    }

    /// Count nodes matching the path
    pub fn count(&self, path: &str) -> usize {
        self.select_all(path).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn doc(content: &str) -> FlowDocument {
        FlowDocument::parse(content, Path::new("test.xml")).unwrap()
    }

    #[test]
    fn test_rooted_path() {
        let d = doc(r#"<mule><flow name="a"/><flow name="b"/><sub-flow name="c"/></mule>"#);
        assert_eq!(d.count("mule/flow"), 2);
        assert_eq!(d.count("mule/sub-flow"), 1);
        assert!(!d.exists("mule/error-handler"));
    }

    #[test]
    fn test_descendant_path() {
        let d = doc(r#"<mule><flow name="a"><choice><when><logger/></when></choice></flow></mule>"#);
        assert_eq!(d.count("//logger"), 1);
        assert_eq!(d.count("//when/logger"), 1);
        assert_eq!(d.count("//flow/logger"), 0);
    }

    #[test]
    fn test_namespace_agnostic() {
        let d = doc(
            r#"<mule xmlns:http="h"><flow name="a"><http:listener path="/x"/></flow></mule>"#,
        );
        // Local-name matching ignores the http: prefix
        assert_eq!(d.count("//listener"), 1);
        assert_eq!(d.count("mule/flow/listener"), 1);
    }

    #[test]
    fn test_wildcard() {
        let d = doc(r#"<mule><flow name="a"/><sub-flow name="b"/></mule>"#);
        assert_eq!(d.count("mule/*"), 2);
    }

    #[test]
    fn test_attribute_predicates() {
        let d = doc(r#"<mule><flow name="a"/><flow name="b" initialState="stopped"/></mule>"#);
        assert_eq!(d.count("mule/flow[@initialState]"), 1);
        assert_eq!(d.count("mule/flow[@name='a']"), 1);
        assert_eq!(d.count("mule/flow[@name='z']"), 0);
        let node = d.select_first("//flow[@name='b']").unwrap();
        assert_eq!(node.attribute("initialState"), Some("stopped"));
    }

    #[test]
    fn test_document_order() {
        let d = doc(r#"<mule><flow name="z"/><flow name="a"/></mule>"#);
        let names: Vec<_> = d
            .select_all("//flow")
            .iter()
            .map(|n| n.attribute("name").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn test_empty_document() {
        let d = FlowDocument::empty(Path::new("virtual"));
        assert!(d.select_all("//flow").is_empty());
        assert!(!d.exists("mule"));
    }
}
