use std::collections::HashSet;

use crate::{MapError, Network, NodeKind, Result};

use super::{CONST0, CONST1, Node, NodeId};

impl Network {
    /// Checking if the network structure is correct.
    ///
    /// The creation methods maintain these invariants at any moment, so this is mostly useful
    /// after building a network from an external description, or in tests:
    /// - ids 0 and 1 are the false and true constants, and no other node is a constant
    /// - every fanin refers to a node created earlier (topological order)
    /// - LUT functions have one variable per fanin, other nodes have no fanin
    /// - the primary input list matches the input nodes
    /// - outputs refer to existing nodes
    /// - explicit names are unique among inputs, and among internal nodes.
    pub fn check_integrity(&self) -> Result<()> {
        for (id, node) in self.nodes.iter().enumerate() {
            self.check_node_integrity(id, node)?;
        }

        // Checking primary input bookkeeping
        let registered = self.pis.iter().map(|pi| pi.0).collect::<Vec<NodeId>>();
        let actual = (0..self.nodes.len())
            .filter(|&id| self.nodes[id].is_pi())
            .collect::<Vec<NodeId>>();
        if registered != actual {
            return Err(MapError::InvalidState(format!(
                "primary inputs {:?} registered but input nodes are {:?}",
                registered, actual
            )));
        }

        // Checking that all outputs are nodes of the network
        for (signal, name) in &self.outputs {
            if signal.0 >= self.nodes.len() {
                return Err(MapError::InvalidState(format!(
                    "output {} refers to node {} which is not in the network",
                    name, signal.0
                )));
            }
        }

        // Checking names
        let mut pi_names = HashSet::new();
        let mut internal_names = HashSet::new();
        for node in &self.nodes {
            if let Some(name) = node.name() {
                let names = if node.is_pi() {
                    &mut pi_names
                } else {
                    &mut internal_names
                };
                if !names.insert(name) {
                    return Err(MapError::InvalidState(format!(
                        "name {} is used by more than one node",
                        name
                    )));
                }
            }
        }

        Ok(())
    }

    fn check_node_integrity(&self, id: NodeId, node: &Node) -> Result<()> {
        match &node.kind {
            NodeKind::Constant(value) => {
                let expected = if *value { CONST1 } else { CONST0 };
                if id != expected {
                    return Err(MapError::InvalidState(format!(
                        "constant {} found at id={} (expected id={})",
                        value, id, expected
                    )));
                }
            }
            NodeKind::PrimaryInput => {}
            NodeKind::Logic(function) => {
                if function.num_vars() != node.fanins.len() {
                    return Err(MapError::InvalidState(format!(
                        "node {} has {} fanins but a {}-variable function",
                        id,
                        node.fanins.len(),
                        function.num_vars()
                    )));
                }
            }
        }

        if !node.is_logic() && !node.fanins.is_empty() {
            return Err(MapError::InvalidState(format!(
                "node {} is not a LUT but has fanins",
                id
            )));
        }

        for fanin in &node.fanins {
            if fanin.0 >= id {
                return Err(MapError::InvalidState(format!(
                    "node {} uses node {} as a fanin, which was not created before it",
                    id, fanin.0
                )));
            }
        }

        Ok(())
    }
}
