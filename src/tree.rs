//! Flat parse events to a generic element tree.
//!
//! An event-style XML tokenizer only tells us, for every element, its
//! nesting level. The tree is rebuilt from that alone: the parent of an
//! element opened at level `L` is the element most recently opened at
//! level `L - 1`.
//!
//! Children are grouped by tag name. Same-tag siblings keep their
//! document order under one key, which is what makes the repeated
//! `d:response` elements of a multistatus answer easy to walk.

use std::collections::HashMap;

use crate::errors::DavError;
use crate::DavResult;

/// Kind of a parse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Open,
    Close,
    Text,
}

/// One event of a flat XML parse, in document order.
///
/// `level` is the nesting depth: children of the document root are at
/// level 1. A `Text` event carries the level of the element it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEvent {
    pub kind: EventKind,
    pub tag: String,
    pub level: usize,
    pub value: Option<String>,
    pub attributes: HashMap<String, String>,
}

impl ParseEvent {
    pub fn open(tag: impl Into<String>, level: usize) -> ParseEvent {
        ParseEvent {
            kind: EventKind::Open,
            tag: tag.into(),
            level,
            value: None,
            attributes: HashMap::new(),
        }
    }

    pub fn close(tag: impl Into<String>, level: usize) -> ParseEvent {
        ParseEvent {
            kind: EventKind::Close,
            ..ParseEvent::open(tag, level)
        }
    }

    pub fn text(tag: impl Into<String>, level: usize, value: impl Into<String>) -> ParseEvent {
        ParseEvent {
            kind: EventKind::Text,
            value: Some(value.into()),
            ..ParseEvent::open(tag, level)
        }
    }

    /// Add an attribute (builder style).
    pub fn attr(self, name: impl Into<String>, value: impl Into<String>) -> ParseEvent {
        let mut this = self;
        this.attributes.insert(name.into(), value.into());
        this
    }
}

/// One element of the rebuilt document.
///
/// `value`, `attributes` and `children` are `None` when the element has
/// none, never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    tag: String,
    level: usize,
    value: Option<String>,
    attributes: Option<HashMap<String, String>>,
    children: Option<HashMap<String, Vec<Node>>>,
}

impl Node {
    fn new(tag: String, level: usize, attributes: HashMap<String, String>) -> Node {
        Node {
            tag,
            level,
            value: None,
            attributes: if attributes.is_empty() {
                None
            } else {
                Some(attributes)
            },
            children: None,
        }
    }

    /// Element name, including any namespace prefix (`d:response`).
    /// Empty for the document root.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Nesting level. The document root is level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Text content.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn attributes(&self) -> Option<&HashMap<String, String>> {
        self.attributes.as_ref()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.as_ref()?.get(name).map(|s| s.as_str())
    }

    /// All children, grouped by tag.
    pub fn child_map(&self) -> Option<&HashMap<String, Vec<Node>>> {
        self.children.as_ref()
    }

    /// Children with the given tag, in document order.
    pub fn children(&self, tag: &str) -> &[Node] {
        self.children
            .as_ref()
            .and_then(|c| c.get(tag))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// First child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children(tag).first()
    }

    /// Follow the first child with each tag in turn.
    pub fn path(&self, tags: &[&str]) -> Option<&Node> {
        tags.iter().try_fold(self, |node, tag| node.child(tag))
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    fn push_child(&mut self, child: Node) {
        self.children
            .get_or_insert_with(HashMap::new)
            .entry(child.tag.clone())
            .or_default()
            .push(child);
    }

    fn set_text(&mut self, text: &str) {
        match self.value {
            Some(ref mut v) => v.push_str(text),
            None => self.value = Some(text.to_string()),
        }
    }

    // children are pushed in reverse while the arena is folded up.
    fn reverse_children(&mut self) {
        if let Some(children) = self.children.as_mut() {
            children.values_mut().for_each(|v| v.reverse());
        }
    }
}

/// Rebuild the document tree from a flat event sequence.
///
/// Returns a synthetic root node (empty tag, level 0) whose children are
/// the top-level elements. Fails with [`DavError::Structure`] if an event
/// refers to a level that has no open parent.
pub fn build<'a, I>(events: I) -> DavResult<Node>
where
    I: IntoIterator<Item = &'a ParseEvent>,
{
    // Nodes live in an arena in creation order, so a parent always has a
    // smaller index than its children.
    let mut arena: Vec<(usize, Node)> = vec![(0, Node::default())];
    // index into the arena of the latest node opened at each level.
    let mut last: Vec<usize> = vec![0];

    for ev in events {
        match ev.kind {
            EventKind::Close => {}
            EventKind::Open => {
                if ev.level == 0 || ev.level > last.len() {
                    return Err(DavError::Structure {
                        level: ev.level,
                        tag: ev.tag.clone(),
                    });
                }
                // anything deeper than the new node's parent is finished.
                last.truncate(ev.level);
                let parent = last[ev.level - 1];
                let node = Node::new(ev.tag.clone(), ev.level, ev.attributes.clone());
                last.push(arena.len());
                arena.push((parent, node));
            }
            EventKind::Text => {
                let idx = match last.get(ev.level) {
                    Some(idx) => *idx,
                    None => {
                        return Err(DavError::Structure {
                            level: ev.level,
                            tag: ev.tag.clone(),
                        })
                    }
                };
                if let Some(text) = ev.value.as_deref() {
                    arena[idx].1.set_text(text);
                }
            }
        }
    }
    trace!("tree: {} elements", arena.len() - 1);

    // Fold the arena up, last node first: by the time a node is moved into
    // its parent all of its own children have been moved into it.
    while arena.len() > 1 {
        let (parent, mut node) = match arena.pop() {
            Some(n) => n,
            None => break,
        };
        node.reverse_children();
        arena[parent].1.push_child(node);
    }
    let mut root = arena.pop().map(|(_, n)| n).unwrap_or_default();
    root.reverse_children();
    Ok(root)
}
