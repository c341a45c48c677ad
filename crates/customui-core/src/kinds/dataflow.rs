//! Node graph editor model.
//!
//! Host operations change the graph silently. User edits update the graph and
//! produce the matching event so the host can mirror it.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::UiError;
use crate::event::{Event, UserInput};
use crate::geometry::Point;
use crate::kinds::{Behavior, Emit, value};
use crate::markup::Element;
use crate::mutation::Mutation;
use crate::query::{Query, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: i32,
    pub pos: Point,
    pub text: String,
    pub inlets: u32,
    pub outlets: u32,
    pub valid: bool,
}

/// Edge from an outlet of `src` to an inlet of `dst`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Connection {
    pub src: i32,
    pub src_outlet: u32,
    pub dst: i32,
    pub dst_inlet: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DataflowOp {
    AddNode {
        id: i32,
        pos: Point,
        text: String,
        inlets: u32,
        outlets: u32,
    },
    RemoveNode(i32),
    SetNodeValid {
        node: i32,
        valid: bool,
    },
    SetNodePos {
        node: i32,
        pos: Point,
    },
    SetNodeText {
        node: i32,
        text: String,
    },
    SetNodeInletCount {
        node: i32,
        count: u32,
    },
    SetNodeOutletCount {
        node: i32,
        count: u32,
    },
    AddConnection(Connection),
    RemoveConnection(Connection),
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Dataflow {
    pub nodes: BTreeMap<i32, Node>,
    pub connections: BTreeSet<Connection>,
    pub onnodeadded: Option<String>,
    pub onnoderemoved: Option<String>,
    pub onnodeposchanged: Option<String>,
    pub onnodetextchanged: Option<String>,
    pub onconnectionadded: Option<String>,
    pub onconnectionremoved: Option<String>,
}

impl Dataflow {
    pub fn parse(el: &Element) -> Self {
        Self {
            onnodeadded: el.handler("onnodeadded"),
            onnoderemoved: el.handler("onnoderemoved"),
            onnodeposchanged: el.handler("onnodeposchanged"),
            onnodetextchanged: el.handler("onnodetextchanged"),
            onconnectionadded: el.handler("onconnectionadded"),
            onconnectionremoved: el.handler("onconnectionremoved"),
            ..Default::default()
        }
    }

    fn node_mut(&mut self, id: i32) -> Result<&mut Node, UiError> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| UiError::InvalidArgument(format!("no node with id {id}")))
    }

    fn check_connection(&self, c: &Connection) -> Result<(), UiError> {
        let src = self
            .nodes
            .get(&c.src)
            .ok_or_else(|| UiError::InvalidArgument(format!("no node with id {}", c.src)))?;
        let dst = self
            .nodes
            .get(&c.dst)
            .ok_or_else(|| UiError::InvalidArgument(format!("no node with id {}", c.dst)))?;
        if c.src_outlet >= src.outlets {
            return Err(UiError::InvalidArgument(format!(
                "node {} has no outlet {}",
                c.src, c.src_outlet
            )));
        }
        if c.dst_inlet >= dst.inlets {
            return Err(UiError::InvalidArgument(format!(
                "node {} has no inlet {}",
                c.dst, c.dst_inlet
            )));
        }
        Ok(())
    }

    fn add_node(&mut self, node: Node) -> Result<(), UiError> {
        if self.nodes.contains_key(&node.id) {
            return Err(UiError::InvalidArgument(format!(
                "node {} already exists",
                node.id
            )));
        }
        self.nodes.insert(node.id, node);
        Ok(())
    }

    fn remove_node(&mut self, id: i32) -> Result<(), UiError> {
        self.nodes
            .remove(&id)
            .ok_or_else(|| UiError::InvalidArgument(format!("no node with id {id}")))?;
        self.connections.retain(|c| c.src != id && c.dst != id);
        Ok(())
    }

    fn add_connection(&mut self, c: Connection) -> Result<(), UiError> {
        self.check_connection(&c)?;
        if !self.connections.insert(c) {
            return Err(UiError::InvalidArgument(format!(
                "connection {c:?} already exists"
            )));
        }
        Ok(())
    }

    fn remove_connection(&mut self, c: &Connection) -> Result<(), UiError> {
        if !self.connections.remove(c) {
            return Err(UiError::InvalidArgument(format!("no connection {c:?}")));
        }
        Ok(())
    }

    pub fn run(&mut self, op: &DataflowOp) -> Result<(), UiError> {
        match op {
            DataflowOp::AddNode {
                id,
                pos,
                text,
                inlets,
                outlets,
            } => self.add_node(Node {
                id: *id,
                pos: *pos,
                text: text.clone(),
                inlets: *inlets,
                outlets: *outlets,
                valid: true,
            })?,
            DataflowOp::RemoveNode(id) => self.remove_node(*id)?,
            DataflowOp::SetNodeValid { node, valid } => self.node_mut(*node)?.valid = *valid,
            DataflowOp::SetNodePos { node, pos } => self.node_mut(*node)?.pos = *pos,
            DataflowOp::SetNodeText { node, text } => self.node_mut(*node)?.text = text.clone(),
            DataflowOp::SetNodeInletCount { node, count } => {
                self.node_mut(*node)?.inlets = *count;
                self.connections
                    .retain(|c| c.dst != *node || c.dst_inlet < *count);
            }
            DataflowOp::SetNodeOutletCount { node, count } => {
                self.node_mut(*node)?.outlets = *count;
                self.connections
                    .retain(|c| c.src != *node || c.src_outlet < *count);
            }
            DataflowOp::AddConnection(c) => self.add_connection(*c)?,
            DataflowOp::RemoveConnection(c) => self.remove_connection(c)?,
        }
        Ok(())
    }

    /// One past the highest node id, or the lowest free positive id once
    /// the top of the range is taken.
    fn next_node_id(&self) -> Option<i32> {
        match self.nodes.keys().next_back() {
            None => Some(1),
            Some(id) => (*id).max(0).checked_add(1).or_else(|| {
                (1..=i32::MAX).find(|id| !self.nodes.contains_key(id))
            }),
        }
    }
}

impl Behavior for Dataflow {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::Dataflow(op) => Some(self.run(op)),
            _ => None,
        }
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        let (event, handler) = match input {
            UserInput::NodeCreated {
                pos,
                text,
                inlets,
                outlets,
            } => {
                let Some(node) = self.next_node_id() else {
                    log::warn!("no free node id left; node creation dropped");
                    return None;
                };
                self.add_node(Node {
                    id: node,
                    pos,
                    text: text.clone(),
                    inlets,
                    outlets,
                    valid: true,
                })
                .ok()?;
                let event = Event::NodeAdded {
                    node,
                    pos,
                    text,
                    inlets,
                    outlets,
                };
                (event, &self.onnodeadded)
            }
            UserInput::NodeDeleted(node) => {
                self.remove_node(node).ok()?;
                (Event::NodeRemoved { node }, &self.onnoderemoved)
            }
            UserInput::NodeMoved { node, pos } => {
                self.node_mut(node).ok()?.pos = pos;
                (Event::NodePosChanged { node, pos }, &self.onnodeposchanged)
            }
            UserInput::NodeTextEdited { node, text } => {
                self.node_mut(node).ok()?.text = text.clone();
                (
                    Event::NodeTextChanged { node, text },
                    &self.onnodetextchanged,
                )
            }
            UserInput::ConnectionCreated(c) => {
                self.add_connection(c).ok()?;
                (Event::ConnectionAdded(c), &self.onconnectionadded)
            }
            UserInput::ConnectionDeleted(c) => {
                self.remove_connection(&c).ok()?;
                (Event::ConnectionRemoved(c), &self.onconnectionremoved)
            }
            _ => return None,
        };
        Some(Emit::new(event, handler))
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::NodeIds => value(Value::List(
                self.nodes.keys().map(|id| id.to_string()).collect(),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> Dataflow {
        let mut d = Dataflow::parse(&Element::new("dataflow"));
        for id in [1, 2] {
            d.run(&DataflowOp::AddNode {
                id,
                pos: Point::new(0, 0),
                text: format!("n{id}"),
                inlets: 2,
                outlets: 1,
            })
            .unwrap();
        }
        d
    }

    fn edge(dst_inlet: u32) -> Connection {
        Connection {
            src: 1,
            src_outlet: 0,
            dst: 2,
            dst_inlet,
        }
    }

    #[test]
    fn test_connection_ports_validated() {
        let mut d = graph();
        assert!(d.run(&DataflowOp::AddConnection(edge(5))).is_err());
        d.run(&DataflowOp::AddConnection(edge(1))).unwrap();
        assert!(d.run(&DataflowOp::AddConnection(edge(1))).is_err());
    }

    #[test]
    fn test_shrinking_ports_drops_connections() {
        let mut d = graph();
        d.run(&DataflowOp::AddConnection(edge(0))).unwrap();
        d.run(&DataflowOp::AddConnection(edge(1))).unwrap();
        d.run(&DataflowOp::SetNodeInletCount { node: 2, count: 1 })
            .unwrap();
        assert_eq!(d.connections.len(), 1);
        d.run(&DataflowOp::RemoveNode(1)).unwrap();
        assert!(d.connections.is_empty());
    }

    #[test]
    fn test_user_created_node_gets_next_id() {
        let mut d = graph();
        let emit = d
            .input(UserInput::NodeCreated {
                pos: Point::new(5, 6),
                text: "add".into(),
                inlets: 2,
                outlets: 1,
            })
            .unwrap();
        assert!(matches!(emit.event, Event::NodeAdded { node: 3, .. }));
        assert!(d.nodes.contains_key(&3));
    }

    #[test]
    fn test_user_created_node_after_max_id() {
        let mut d = graph();
        d.run(&DataflowOp::AddNode {
            id: i32::MAX,
            pos: Point::new(0, 0),
            text: "top".into(),
            inlets: 0,
            outlets: 0,
        })
        .unwrap();
        let emit = d
            .input(UserInput::NodeCreated {
                pos: Point::new(1, 1),
                text: "add".into(),
                inlets: 1,
                outlets: 1,
            })
            .unwrap();
        assert!(matches!(emit.event, Event::NodeAdded { node: 3, .. }));
        assert_eq!(d.nodes.len(), 4);
    }

    #[test]
    fn test_invalid_user_edit_emits_nothing() {
        let mut d = graph();
        assert!(d.input(UserInput::NodeDeleted(42)).is_none());
        assert!(d.input(UserInput::ConnectionCreated(edge(9))).is_none());
    }
}
