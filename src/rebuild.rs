//! Reconstruction of a network from the optimizer's cut selection.
//!
//! The new network is built from scratch, the same way a network is read from a file:
//! constants and primary inputs first, then one LUT per selected node in topological order,
//! then the outputs. A selected node is implemented by its chosen cut: the LUT reads the
//! cut leaves and computes the cut function. Choosing the trivial cut means "keep this node
//! as it is", so the node is rebuilt from its own fanins and local function.
//!
//! Whatever cannot be built is left out and reported as a [`Diagnostic`]. Nothing already
//! built is ever undone.

use std::collections::HashMap;

use crate::{
    MapError, Network, NodeId, NodeKind, Result, Signal, TruthTable,
    cut::NetworkCuts,
    diagnostic::Diagnostic,
    exchange::Selection,
};

/// What happened during a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Number of LUTs instantiated from a chosen cut.
    pub selected_nodes: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// A rebuilt network and its report.
#[derive(Debug, Clone)]
pub struct Rebuild {
    pub network: Network,
    pub report: RebuildReport,
}

/// Resolves the chosen cut indices against the network node names. Entries naming a
/// constant or a primary input are dropped: those nodes are always carried over.
fn resolve_choices(
    network: &Network,
    by_name: &HashMap<&str, NodeId>,
    selection: &Selection,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Option<u32>> {
    let mut choices = vec![None; network.size()];
    for (name, &index) in &selection.chosen_cuts {
        let Some(&id) = by_name.get(name.as_str()) else {
            diagnostics.push(Diagnostic::UnknownNode { name: name.clone() }.report());
            continue;
        };
        if network.node(id).is_some_and(|node| node.is_logic()) {
            choices[id] = Some(index);
        } else {
            log::debug!("ignoring chosen cut for non-logic node {}", name);
        }
    }
    choices
}

/// Rebuilds `network` keeping only the nodes chosen in `selection`, each one implemented by
/// its chosen cut among `cuts`, and creates an output for every name of `outputs`.
///
/// Output names are looked up among rebuilt nodes first, then among primary inputs.
/// `cuts` must have been enumerated on `network` with the same parameters as the ones the
/// selection refers to, otherwise the indices are meaningless.
pub fn rebuild(
    network: &Network,
    cuts: &NetworkCuts,
    outputs: &[String],
    selection: &Selection,
) -> Result<Rebuild> {
    if cuts.num_nodes() != network.size() {
        return Err(MapError::InvalidParams(format!(
            "cuts were enumerated for {} nodes, network has {}",
            cuts.num_nodes(),
            network.size()
        )));
    }

    let names = network.node_names();
    let by_name: HashMap<&str, NodeId> = names
        .iter()
        .enumerate()
        .map(|(id, name)| (name.as_str(), id))
        .collect();
    let mut report = RebuildReport::default();
    let choices = resolve_choices(network, &by_name, selection, &mut report.diagnostics);

    let mut ntk = Network::new();
    if let Some(name) = network.model_name() {
        ntk.set_model_name(name);
    }

    // Old node id -> new signal
    let mut mapping: Vec<Option<Signal>> = vec![None; network.size()];
    let mut pis: HashMap<&str, Signal> = HashMap::new();

    for id in 0..network.size() {
        let node = network.node(id).ok_or(MapError::NodeDoesNotExist(id))?;

        if let NodeKind::Constant(value) = node.kind() {
            mapping[id] = Some(ntk.create_constant(*value));
            continue;
        }
        if node.is_pi() {
            let signal = ntk.create_primary_input(names[id].clone());
            mapping[id] = Some(signal);
            pis.insert(names[id].as_str(), signal);
            continue;
        }

        let Some(index) = choices[id] else {
            continue;
        };
        let set = cuts.cuts(id);
        let Some(cut) = set.get(index as usize) else {
            report.diagnostics.push(
                Diagnostic::CutIndexOutOfRange {
                    node: names[id].clone(),
                    index,
                    available: set.len(),
                }
                .report(),
            );
            continue;
        };

        let (leaves, function): (Vec<NodeId>, TruthTable) = if cut.is_trivial() {
            let function = node
                .function()
                .ok_or_else(|| MapError::InvalidState(format!("node {} has no function", id)))?;
            (
                node.fanins().iter().map(|fanin| fanin.node()).collect(),
                function.clone(),
            )
        } else {
            (cut.leaves().to_vec(), cut.function().clone())
        };

        let mut fanins = Vec::with_capacity(leaves.len());
        let mut missing = None;
        for &leaf in &leaves {
            match mapping[leaf] {
                Some(signal) => fanins.push(signal),
                None => {
                    missing = Some(leaf);
                    break;
                }
            }
        }
        if let Some(leaf) = missing {
            report.diagnostics.push(
                Diagnostic::MissingLeaf {
                    node: names[id].clone(),
                    leaf: names[leaf].clone(),
                }
                .report(),
            );
            continue;
        }

        let signal = ntk.create_logic_node(&fanins, function);
        ntk.set_name(signal, names[id].clone())?;
        mapping[id] = Some(signal);
        report.selected_nodes += 1;
        log::debug!("node {}: cut {} with {} leaves", names[id], index, leaves.len());
    }

    for name in outputs {
        let signal = by_name
            .get(name.as_str())
            .and_then(|&id| mapping[id])
            .or_else(|| pis.get(name.as_str()).copied());
        match signal {
            Some(signal) => ntk.create_output(signal, name.clone()),
            None => report
                .diagnostics
                .push(Diagnostic::UnresolvedOutput { name: name.clone() }.report()),
        }
    }

    log::info!(
        "rebuilt {} of {} nodes, {} selected, {} diagnostics",
        ntk.size(),
        network.size(),
        report.selected_nodes,
        report.diagnostics.len()
    );
    Ok(Rebuild {
        network: ntk,
        report,
    })
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::{
        cut::{CutParams, enumerate_cuts},
        exchange::ExchangeDocument,
    };

    const ADDER: &str = "\
.model adder
.inputs a b c
.outputs s co
.names a b x
10 1
01 1
.names x c s
10 1
01 1
.names a b g
11 1
.names x c p
11 1
.names g p co
00 0
.end
";

    fn outputs_of(network: &Network, cuts: &NetworkCuts) -> Vec<String> {
        ExchangeDocument::from_cuts(network, cuts).0.outputs
    }

    fn all_trivial(network: &Network) -> Selection {
        let mut selection = Selection::default();
        network.for_each_node(|id, node| {
            if node.is_logic() {
                selection.choose(network.node_name(id), 0);
            }
        });
        selection
    }

    fn assert_equivalent(a: &Network, b: &Network) {
        assert_eq!(a.num_pis(), b.num_pis());
        for assignment in 0..(1usize << a.num_pis()) {
            let values = (0..a.num_pis())
                .map(|v| (assignment >> v) & 1 == 1)
                .collect::<Vec<bool>>();
            assert_eq!(a.simulate_outputs(&values), b.simulate_outputs(&values));
        }
    }

    #[test]
    fn trivial_selection_is_identity_test() {
        let ntk = Network::from_blif(ADDER.as_bytes()).unwrap();
        let cuts = enumerate_cuts(&ntk, CutParams::default()).unwrap();
        let outputs = outputs_of(&ntk, &cuts);

        let Rebuild { network, report } =
            rebuild(&ntk, &cuts, &outputs, &all_trivial(&ntk)).unwrap();
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.selected_nodes, ntk.num_gates());
        assert_eq!(network.size(), ntk.size());
        assert_eq!(network.node_names(), ntk.node_names());
        assert_eq!(network.to_blif(), ntk.to_blif());
    }

    #[test]
    fn mapping_test() {
        // Implement both outputs with their largest cut, over the primary inputs only
        let ntk = Network::from_blif(ADDER.as_bytes()).unwrap();
        let cuts = enumerate_cuts(&ntk, CutParams::default()).unwrap();
        let names = ntk.internal_names();
        let pis = ntk.pi_names();
        let inputs = {
            let mut inputs = vec![pis["a"], pis["b"], pis["c"]];
            inputs.sort();
            inputs
        };

        let mut selection = Selection::default();
        for output in ["s", "co"] {
            let set = cuts.cuts(names[output]);
            let index = set.iter().position(|cut| cut.leaves() == inputs).unwrap();
            selection.choose(output, index as u32);
        }

        let outputs = outputs_of(&ntk, &cuts);
        let Rebuild { network, report } = rebuild(&ntk, &cuts, &outputs, &selection).unwrap();
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.selected_nodes, 2);
        assert_eq!(network.num_gates(), 2);
        assert_eq!(network.node(network.outputs()[0].0.node()).unwrap().fanins().len(), 3);
        assert_equivalent(&ntk, &network);
    }

    #[test]
    fn internal_leaves_test() {
        // co over (c, x, g) and s over (c, x), with x and g kept as they are
        let ntk = Network::from_blif(ADDER.as_bytes()).unwrap();
        let cuts = enumerate_cuts(&ntk, CutParams::default()).unwrap();
        let names = ntk.internal_names();
        let (c, x, g) = (ntk.pi_names()["c"], names["x"], names["g"]);

        let mut selection = Selection::default();
        selection.choose("x", 0).choose("g", 0);
        for (output, leaves) in [("co", vec![c, x, g]), ("s", vec![c, x])] {
            let set = cuts.cuts(names[output]);
            let index = set.iter().position(|cut| cut.leaves() == leaves).unwrap();
            assert!(!set[index].is_trivial());
            selection.choose(output, index as u32);
        }

        let outputs = outputs_of(&ntk, &cuts);
        let Rebuild { network, report } = rebuild(&ntk, &cuts, &outputs, &selection).unwrap();
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.selected_nodes, 4);

        let rebuilt = network.internal_names();
        let new_c = network.pi_names()["c"];
        let fanins_of = |name: &str| {
            network
                .node(rebuilt[name])
                .unwrap()
                .fanins()
                .iter()
                .map(|fanin| fanin.node())
                .collect::<Vec<NodeId>>()
        };
        assert_eq!(fanins_of("co"), vec![new_c, rebuilt["x"], rebuilt["g"]]);
        assert_eq!(fanins_of("s"), vec![new_c, rebuilt["x"]]);
        assert!(!rebuilt.contains_key("p"));
        assert_equivalent(&ntk, &network);
    }

    #[test]
    fn out_of_range_index_test() {
        let ntk = Network::from_blif(ADDER.as_bytes()).unwrap();
        let cuts = enumerate_cuts(&ntk, CutParams::default()).unwrap();
        let outputs = outputs_of(&ntk, &cuts);
        let mut selection = all_trivial(&ntk);
        selection.choose("co", 1000);

        let Rebuild { network, report } = rebuild(&ntk, &cuts, &outputs, &selection).unwrap();
        assert_eq!(
            report.diagnostics,
            vec![
                Diagnostic::CutIndexOutOfRange {
                    node: "co".to_string(),
                    index: 1000,
                    available: cuts.cuts(ntk.internal_names()["co"]).len(),
                },
                Diagnostic::UnresolvedOutput {
                    name: "co".to_string()
                },
            ]
        );
        assert_eq!(report.selected_nodes, 4);
        assert_eq!(network.num_pos(), 1);
        assert_eq!(network.outputs()[0].1, "s");
    }

    #[test]
    fn missing_leaf_test() {
        // x is not selected: s and p need it, g does not
        let ntk = Network::from_blif(ADDER.as_bytes()).unwrap();
        let cuts = enumerate_cuts(&ntk, CutParams::default()).unwrap();
        let outputs = outputs_of(&ntk, &cuts);
        let mut selection = Selection::default();
        selection.choose("s", 0).choose("g", 0).choose("p", 0);

        let Rebuild { network, report } = rebuild(&ntk, &cuts, &outputs, &selection).unwrap();
        assert_eq!(
            report.diagnostics,
            vec![
                Diagnostic::MissingLeaf {
                    node: "s".to_string(),
                    leaf: "x".to_string(),
                },
                Diagnostic::MissingLeaf {
                    node: "p".to_string(),
                    leaf: "x".to_string(),
                },
                Diagnostic::UnresolvedOutput {
                    name: "s".to_string()
                },
                Diagnostic::UnresolvedOutput {
                    name: "co".to_string()
                },
            ]
        );
        assert_eq!(report.selected_nodes, 1);
        assert_eq!(network.num_gates(), 1);
        assert!(network.internal_names().contains_key("g"));
    }

    #[test]
    fn selection_names_test() {
        let ntk = Network::from_blif(ADDER.as_bytes()).unwrap();
        let cuts = enumerate_cuts(&ntk, CutParams::default()).unwrap();
        let mut selection = Selection::default();
        selection.choose("nope", 0).choose("a", 3).choose("const0", 0);

        let Rebuild { network, report } = rebuild(&ntk, &cuts, &[], &selection).unwrap();
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnknownNode {
                name: "nope".to_string()
            }]
        );
        assert_eq!(report.selected_nodes, 0);
        assert_eq!(network.num_pis(), 3);
        assert_eq!(network.num_gates(), 0);
    }

    #[test]
    fn input_outputs_test() {
        let ntk = Network::from_blif(ADDER.as_bytes()).unwrap();
        let cuts = enumerate_cuts(&ntk, CutParams::default()).unwrap();
        let outputs = vec!["a".to_string(), "const1".to_string(), "ghost".to_string()];

        let Rebuild { network, report } =
            rebuild(&ntk, &cuts, &outputs, &Selection::default()).unwrap();
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnresolvedOutput {
                name: "ghost".to_string()
            }]
        );
        assert_eq!(network.num_pos(), 2);
        assert_eq!(network.simulate_outputs(&[true, false, false]), vec![true, true]);
        assert_eq!(network.simulate_outputs(&[false, false, false]), vec![false, true]);
    }

    #[test]
    fn mismatched_cuts_test() {
        let ntk = Network::from_blif(ADDER.as_bytes()).unwrap();
        let cuts = enumerate_cuts(&Network::new(), CutParams::default()).unwrap();
        assert!(matches!(
            rebuild(&ntk, &cuts, &[], &Selection::default()),
            Err(MapError::InvalidParams(_))
        ));
    }
}
