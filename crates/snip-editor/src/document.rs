//! Document model
//!
//! An id-arena stand-in for the host page's tree. Holding a `NodeId` never
//! extends a node's lifetime or keeps it attached; consumers re-resolve
//! against the document on every use.

use std::collections::HashMap;

/// Opaque node handle. A stale id resolves to nothing.
pub type NodeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadowMode {
    Open,
    Closed,
}

#[derive(Debug, Clone)]
struct Shadow {
    mode: ShadowMode,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub tag: String,
    attrs: HashMap<String, String>,
    pub text: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    shadow: Option<Shadow>,
}

/// Side effects the core asks the host to perform. Recorded in order so
/// callers (and tests) can observe what would have happened on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    /// A detectable send control was invoked.
    ClickedSend(NodeId),
    /// No send control existed; the equivalent Enter submission was
    /// synthesized on the target.
    SynthesizedEnter(NodeId),
    /// An input notification was re-fired after a programmatic write so
    /// the host page's own state updates.
    InputNotified(NodeId),
}

#[derive(Debug)]
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    focused: Option<NodeId>,
    next_id: NodeId,
    actions: Vec<HostAction>,
}

impl Document {
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            1,
            Node {
                id: 1,
                tag: "body".to_string(),
                attrs: HashMap::new(),
                text: String::new(),
                children: Vec::new(),
                parent: None,
                shadow: None,
            },
        );
        Self {
            nodes,
            root: 1,
            focused: None,
            next_id: 2,
            actions: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element. It only becomes scannable once appended
    /// somewhere under the root.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                tag: tag.to_string(),
                attrs: HashMap::new(),
                text: String::new(),
                children: Vec::new(),
                parent: None,
                shadow: None,
            },
        );
        id
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
    }

    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowMode) {
        if let Some(node) = self.nodes.get_mut(&host) {
            node.shadow = Some(Shadow {
                mode,
                children: Vec::new(),
            });
        }
    }

    pub fn append_shadow_child(&mut self, host: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(&host)
            && let Some(shadow) = node.shadow.as_mut()
        {
            shadow.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(host);
        }
    }

    /// Detach a subtree from its parent. The node stays in the arena so
    /// stale handles resolve to a detached (invalid) node, not a panic.
    pub fn remove(&mut self, id: NodeId) {
        let parent = self.nodes.get(&id).and_then(|n| n.parent);
        if let Some(pid) = parent
            && let Some(p) = self.nodes.get_mut(&pid)
        {
            p.children.retain(|c| *c != id);
            if let Some(shadow) = p.shadow.as_mut() {
                shadow.children.retain(|c| *c != id);
            }
        }
        if let Some(n) = self.nodes.get_mut(&id) {
            n.parent = None;
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(&id)
            .and_then(|n| n.attrs.get(name))
            .map(|s| s.as_str())
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.tag.as_str())
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.text = text.to_string();
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.text.as_str())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Whether a node is connected to the root, through regular children
    /// or a shadow host chain.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = id;
        loop {
            if cursor == self.root {
                return true;
            }
            match self.nodes.get(&cursor).and_then(|n| n.parent) {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    pub fn focus(&mut self, id: NodeId) {
        self.focused = Some(id);
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// The event's composed propagation path: the node and every ancestor
    /// up to the root, crossing shadow boundaries. Available at
    /// interaction time even for closed shadow subtrees.
    pub fn composed_path(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if !self.nodes.contains_key(&node) {
                break;
            }
            path.push(node);
            cursor = self.nodes.get(&node).and_then(|n| n.parent);
        }
        path
    }

    /// Depth-first traversal of everything a structural scan can see:
    /// regular children always, shadow children only when the shadow root
    /// is open.
    pub fn scannable_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            out.push(id);
            for child in node.children.iter().rev() {
                stack.push(*child);
            }
            if let Some(shadow) = &node.shadow
                && shadow.mode == ShadowMode::Open
            {
                for child in shadow.children.iter().rev() {
                    stack.push(*child);
                }
            }
        }
        out
    }

    /// Find a detectable send control: a button marked as submit or
    /// labelled as the send affordance.
    pub fn find_send_control(&self) -> Option<NodeId> {
        self.scannable_ids().into_iter().find(|id| {
            self.tag(*id) == Some("button")
                && (self.attr(*id, "type") == Some("submit")
                    || self
                        .attr(*id, "aria-label")
                        .is_some_and(|label| label.to_ascii_lowercase().contains("send")))
        })
    }

    pub fn push_action(&mut self, action: HostAction) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[HostAction] {
        &self.actions
    }

    pub fn take_actions(&mut self) -> Vec<HostAction> {
        std::mem::take(&mut self.actions)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
