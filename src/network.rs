//! Module defining the [`Network`] struct, a combinational LUT network, as well as [`Node`],
//! [`Signal`] and the errors raised while building or reading one.
//!
//! To enumerate cuts of a network, check [`crate::cut`]. To rebuild a network from a cut
//! selection, check [`crate::rebuild`].

mod integrity;
pub mod error;
pub mod node;
mod parser;
mod sim;
mod writer;

use std::collections::HashMap;

pub use error::{MapError, ParserError, Result};
pub use node::{Node, NodeId, NodeKind, Signal};

use crate::TruthTable;

/// Id of the constant false node.
pub const CONST0: NodeId = 0;
/// Id of the constant true node.
pub const CONST1: NodeId = 1;

/// A combinational network of LUTs.
///
/// Nodes live in an append-only arena: ids are dense, assigned at creation and never reused.
/// A node can only use already existing nodes as fanins, so the creation order is a
/// topological order and the network is acyclic by construction.
///
/// ```rust
/// use lutcut::{Network, TruthTable};
/// let mut ntk = Network::new();
/// let a = ntk.create_primary_input("a");
/// let b = ntk.create_primary_input("b");
/// let and = TruthTable::var(2, 0).and(&TruthTable::var(2, 1));
/// let o = ntk.create_logic_node(&[a, b], and);
/// ntk.create_output(o, "o");
/// assert_eq!(ntk.num_pis(), 2);
/// assert_eq!(ntk.num_gates(), 1);
/// assert_eq!(ntk.size(), 5); // constants included
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    model_name: Option<String>,
    nodes: Vec<Node>,
    pis: Vec<Signal>,
    outputs: Vec<(Signal, String)>,
}

impl Default for Network {
    fn default() -> Self {
        Network::new()
    }
}

impl Network {
    /// Create a brand new network (both constant nodes included).
    pub fn new() -> Self {
        let constant = |value| Node {
            kind: NodeKind::Constant(value),
            fanins: Vec::new(),
            name: None,
        };
        Network {
            model_name: None,
            nodes: vec![constant(false), constant(true)],
            pis: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    pub fn set_model_name(&mut self, name: impl Into<String>) {
        self.model_name = Some(name.into());
    }

    fn push(&mut self, node: Node) -> Signal {
        self.nodes.push(node);
        Signal(self.nodes.len() - 1)
    }

    /// Returns the constant node for `value`. Constants are shared, no node is created.
    pub fn create_constant(&mut self, value: bool) -> Signal {
        if value { Signal(CONST1) } else { Signal(CONST0) }
    }

    /// Create a new primary input.
    pub fn create_primary_input(&mut self, name: impl Into<String>) -> Signal {
        let signal = self.push(Node {
            kind: NodeKind::PrimaryInput,
            fanins: Vec::new(),
            name: Some(name.into()),
        });
        self.pis.push(signal);
        signal
    }

    /// Create a new LUT computing `function` over `fanins` (variable `i` is `fanins[i]`).
    ///
    /// Panics if a fanin does not exist yet or if the arity of `function` does not match
    /// the number of fanins: both are programming errors, not runtime conditions.
    pub fn create_logic_node(&mut self, fanins: &[Signal], function: TruthTable) -> Signal {
        for fanin in fanins {
            assert!(
                fanin.0 < self.nodes.len(),
                "fanin {} does not exist yet (network has {} nodes)",
                fanin.0,
                self.nodes.len()
            );
        }
        assert_eq!(
            function.num_vars(),
            fanins.len(),
            "function arity does not match the number of fanins"
        );
        self.push(Node {
            kind: NodeKind::Logic(function),
            fanins: fanins.to_vec(),
            name: None,
        })
    }

    /// Mark an existing signal as an output with the given name.
    pub fn create_output(&mut self, signal: Signal, name: impl Into<String>) {
        assert!(signal.0 < self.nodes.len(), "output node {} does not exist", signal.0);
        self.outputs.push((signal, name.into()));
    }

    /// Give a name to a LUT. Constants and primary inputs keep their names.
    pub fn set_name(&mut self, signal: Signal, name: impl Into<String>) -> Result<()> {
        let node = self
            .nodes
            .get_mut(signal.0)
            .ok_or(MapError::NodeDoesNotExist(signal.0))?;
        if !node.is_logic() {
            return Err(MapError::InvalidState(format!(
                "only logic nodes can be renamed, node {} is not one",
                signal.0
            )));
        }
        node.name = Some(name.into());
        Ok(())
    }

    /// Retrieves a node from its id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of nodes, constants included.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_pis(&self) -> usize {
        self.pis.len()
    }

    pub fn num_pos(&self) -> usize {
        self.outputs.len()
    }

    /// Number of LUTs.
    pub fn num_gates(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_logic()).count()
    }

    pub fn primary_inputs(&self) -> &[Signal] {
        &self.pis
    }

    pub fn outputs(&self) -> &[(Signal, String)] {
        &self.outputs
    }

    /// Visits every node in creation (topological) order.
    pub fn for_each_node(&self, mut f: impl FnMut(NodeId, &Node)) {
        for (id, node) in self.nodes.iter().enumerate() {
            f(id, node);
        }
    }

    /// Visits primary inputs in creation order, with their position among inputs.
    pub fn for_each_primary_input(&self, mut f: impl FnMut(usize, Signal)) {
        for (position, &signal) in self.pis.iter().enumerate() {
            f(position, signal);
        }
    }

    /// Visits outputs in declaration order.
    pub fn for_each_output(&self, mut f: impl FnMut(Signal, &str)) {
        for (signal, name) in &self.outputs {
            f(*signal, name);
        }
    }

    /// The name used to refer to a node in exchange documents and BLIF files:
    /// its explicit name, else `const0`/`const1`, `pi<k>` or `n<id>`.
    pub fn node_name(&self, id: NodeId) -> String {
        let Some(node) = self.nodes.get(id) else {
            return format!("n{}", id);
        };
        if let Some(name) = node.name.as_ref().filter(|name| !name.is_empty()) {
            return name.clone();
        }
        match node.kind {
            NodeKind::Constant(value) => format!("const{}", value as u8),
            NodeKind::PrimaryInput => {
                let position = self.pis.iter().position(|pi| pi.0 == id).unwrap_or(id);
                format!("pi{}", position)
            }
            NodeKind::Logic(_) => format!("n{}", id),
        }
    }

    /// Display names of all nodes, indexed by node id.
    pub fn node_names(&self) -> Vec<String> {
        (0..self.nodes.len()).map(|id| self.node_name(id)).collect()
    }

    /// Map from display name to node id, for constants and LUTs only.
    pub fn internal_names(&self) -> HashMap<String, NodeId> {
        (0..self.nodes.len())
            .filter(|&id| !self.nodes[id].is_pi())
            .map(|id| (self.node_name(id), id))
            .collect()
    }

    /// Map from display name to node id, for primary inputs only.
    pub fn pi_names(&self) -> HashMap<String, NodeId> {
        self.pis
            .iter()
            .map(|pi| (self.node_name(pi.0), pi.0))
            .collect()
    }

    /// Number of fanouts of every node, indexed by node id. Outputs are not counted.
    pub fn fanout_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.nodes.len()];
        for node in &self.nodes {
            for fanin in &node.fanins {
                counts[fanin.0] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn and2() -> TruthTable {
        TruthTable::var(2, 0).and(&TruthTable::var(2, 1))
    }

    #[test]
    fn creation_order_test() {
        let mut ntk = Network::new();
        assert_eq!(ntk.size(), 2);
        assert_eq!(ntk.create_constant(false).node(), CONST0);
        assert_eq!(ntk.create_constant(true).node(), CONST1);
        assert_eq!(ntk.size(), 2);

        let a = ntk.create_primary_input("a");
        let b = ntk.create_primary_input("b");
        let n = ntk.create_logic_node(&[a, b], and2());
        assert_eq!((a.node(), b.node(), n.node()), (2, 3, 4));

        let mut visited = Vec::new();
        ntk.for_each_node(|id, node| {
            for fanin in node.fanins() {
                assert!(fanin.node() < id);
            }
            visited.push(id);
        });
        assert_eq!(visited, vec![0, 1, 2, 3, 4]);

        let mut pis = Vec::new();
        ntk.for_each_primary_input(|position, signal| pis.push((position, signal)));
        assert_eq!(pis, vec![(0, a), (1, b)]);
    }

    #[test]
    #[should_panic]
    fn create_logic_node_unknown_fanin_test() {
        let mut ntk = Network::new();
        let _ = ntk.create_logic_node(&[Signal(7)], TruthTable::identity());
    }

    #[test]
    #[should_panic]
    fn create_logic_node_arity_test() {
        let mut ntk = Network::new();
        let a = ntk.create_primary_input("a");
        let _ = ntk.create_logic_node(&[a], and2());
    }

    #[test]
    fn node_name_test() {
        let mut ntk = Network::new();
        let a = ntk.create_primary_input("a");
        let b = ntk.create_primary_input("b");
        let n = ntk.create_logic_node(&[a, b], and2());
        let m = ntk.create_logic_node(&[n], TruthTable::identity().not());
        ntk.set_name(m, "nand").unwrap();

        assert_eq!(
            ntk.node_names(),
            vec!["const0", "const1", "a", "b", "n4", "nand"]
        );
        assert!(ntk.set_name(a, "x").is_err());
        assert!(ntk.set_name(Signal(42), "x").is_err());

        let internal = ntk.internal_names();
        assert_eq!(internal.get("nand"), Some(&5));
        assert_eq!(internal.get("const1"), Some(&1));
        assert!(!internal.contains_key("a"));
        assert_eq!(ntk.pi_names().get("b"), Some(&3));
    }

    #[test]
    fn fanout_counts_test() {
        let mut ntk = Network::new();
        let a = ntk.create_primary_input("a");
        let b = ntk.create_primary_input("b");
        let n = ntk.create_logic_node(&[a, b], and2());
        let _m = ntk.create_logic_node(&[n, a], and2());
        ntk.create_output(n, "n");
        assert_eq!(ntk.fanout_counts(), vec![0, 0, 2, 1, 1, 0]);
        assert_eq!(ntk.num_pos(), 1);
    }
}
