use crate::{Network, NodeKind};

impl Network {
    /// Evaluates every node for one assignment of the primary inputs
    /// (`pi_values[k]` drives the `k`-th input). Returns the node values indexed by id.
    pub fn simulate(&self, pi_values: &[bool]) -> Vec<bool> {
        assert_eq!(
            pi_values.len(),
            self.pis.len(),
            "expected one value per primary input"
        );
        let mut values = vec![false; self.nodes.len()];
        for (position, pi) in self.pis.iter().enumerate() {
            values[pi.0] = pi_values[position];
        }
        for (id, node) in self.nodes.iter().enumerate() {
            values[id] = match &node.kind {
                NodeKind::Constant(value) => *value,
                NodeKind::PrimaryInput => values[id],
                NodeKind::Logic(function) => {
                    let inputs = node
                        .fanins
                        .iter()
                        .map(|fanin| values[fanin.0])
                        .collect::<Vec<bool>>();
                    function.evaluate(&inputs)
                }
            };
        }
        values
    }

    /// Output values, in declaration order, for one assignment of the primary inputs.
    pub fn simulate_outputs(&self, pi_values: &[bool]) -> Vec<bool> {
        let values = self.simulate(pi_values);
        self.outputs.iter().map(|(signal, _)| values[signal.0]).collect()
    }
}
