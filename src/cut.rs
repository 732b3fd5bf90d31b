//! K-feasible cut enumeration.
//!
//! A cut of a node is a set of leaves separating the node from the rest of the network,
//! together with the function the node computes over those leaves. Cuts are built bottom-up:
//! the cuts of a LUT are the unions of one cut per fanin, as long as the union has at most
//! `cut_size` leaves.
//!
//! Every node keeps a ranked, bounded [`CutSet`]. Downstream tools refer to cuts by their
//! index in that set, so the ranking is fully deterministic: the trivial cut first, then by
//! ascending leaf count, ties broken by discovery order.
//!
//! ```rust
//! use lutcut::{Network, TruthTable};
//! use lutcut::cut::{CutParams, enumerate_cuts};
//!
//! let mut ntk = Network::new();
//! let a = ntk.create_primary_input("a");
//! let b = ntk.create_primary_input("b");
//! let o = ntk.create_logic_node(&[a, b], TruthTable::var(2, 0).and(&TruthTable::var(2, 1)));
//! ntk.create_output(o, "o");
//!
//! let cuts = enumerate_cuts(&ntk, CutParams::default()).unwrap();
//! let set = cuts.cuts(o.node());
//! assert_eq!(set.len(), 2);
//! assert!(set[0].is_trivial());
//! assert_eq!(set[1].leaves(), &[a.node(), b.node()]);
//! ```

use std::{collections::HashSet, ops::Index};

use crate::{MapError, Network, Node, NodeId, Result, TruthTable, cost::CutCost, truth_table};

/// Default maximum number of leaves of a cut.
pub const DEFAULT_CUT_SIZE: usize = 4;
/// Default maximum number of cuts kept per node.
pub const DEFAULT_CUT_LIMIT: usize = 32;
/// Largest supported cut size, bounded by the truth table size.
pub const MAX_CUT_SIZE: usize = truth_table::MAX_VARS;
/// Largest supported cut limit, so it fits in the exchange document.
pub const MAX_CUT_LIMIT: usize = u32::MAX as usize;

/// Cut enumeration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutParams {
    /// Maximum number of leaves of a cut (the `K` of K-feasible).
    pub cut_size: usize,
    /// Maximum number of cuts kept per node, trivial cut included.
    pub cut_limit: usize,
}

impl Default for CutParams {
    fn default() -> Self {
        CutParams {
            cut_size: DEFAULT_CUT_SIZE,
            cut_limit: DEFAULT_CUT_LIMIT,
        }
    }
}

impl CutParams {
    pub fn new(cut_size: usize, cut_limit: usize) -> Self {
        CutParams {
            cut_size,
            cut_limit,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cut_size == 0 || self.cut_size > MAX_CUT_SIZE {
            return Err(MapError::InvalidParams(format!(
                "cut size must be between 1 and {}, got {}",
                MAX_CUT_SIZE, self.cut_size
            )));
        }
        if self.cut_limit == 0 || self.cut_limit > MAX_CUT_LIMIT {
            return Err(MapError::InvalidParams(format!(
                "cut limit must be between 1 and {}, got {}",
                MAX_CUT_LIMIT, self.cut_limit
            )));
        }
        Ok(())
    }
}

/// A cut: a root, its leaves sorted by id, and the root function over the leaves
/// (variable `i` is `leaves[i]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cut {
    root: NodeId,
    leaves: Vec<NodeId>,
    function: TruthTable,
}

impl Cut {
    /// The cut made of the node alone.
    fn trivial(root: NodeId) -> Self {
        Cut {
            root,
            leaves: vec![root],
            function: TruthTable::identity(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    pub fn function(&self) -> &TruthTable {
        &self.function
    }

    /// Number of leaves.
    pub fn size(&self) -> usize {
        self.leaves.len()
    }

    /// A trivial cut stops at the root itself: "do not decompose past this node".
    pub fn is_trivial(&self) -> bool {
        self.leaves.len() == 1 && self.leaves[0] == self.root
    }

    pub fn cost(&self) -> CutCost {
        CutCost::of(&self.function)
    }
}

/// The ranked cuts of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutSet {
    cuts: Vec<Cut>,
}

impl CutSet {
    pub fn len(&self) -> usize {
        self.cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Cut> {
        self.cuts.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cut> {
        self.cuts.iter()
    }

    /// The trivial cut, always present for an enumerated node.
    pub fn trivial(&self) -> Option<&Cut> {
        self.cuts.iter().find(|cut| cut.is_trivial())
    }
}

impl Index<usize> for CutSet {
    type Output = Cut;

    fn index(&self, index: usize) -> &Self::Output {
        &self.cuts[index]
    }
}

impl<'a> IntoIterator for &'a CutSet {
    type Item = &'a Cut;
    type IntoIter = std::slice::Iter<'a, Cut>;

    fn into_iter(self) -> Self::IntoIter {
        self.cuts.iter()
    }
}

/// Cut sets of every node of a network, indexed by node id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkCuts {
    params: CutParams,
    sets: Vec<CutSet>,
}

impl NetworkCuts {
    pub fn params(&self) -> CutParams {
        self.params
    }

    /// Cut set of a node. Panics if the node is not part of the enumerated network.
    pub fn cuts(&self, node: NodeId) -> &CutSet {
        &self.sets[node]
    }

    /// Number of nodes the cuts were enumerated for.
    pub fn num_nodes(&self) -> usize {
        self.sets.len()
    }

    /// Number of cuts over all nodes.
    pub fn total_cuts(&self) -> usize {
        self.sets.iter().map(CutSet::len).sum()
    }
}

/// Merges two sorted leaf sets. Returns [`None`] as soon as the union exceeds `limit`.
fn merge_leaves(a: &[NodeId], b: &[NodeId], limit: usize) -> Option<Vec<NodeId>> {
    let mut merged = Vec::with_capacity(limit);
    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        let next = match (a.get(i), b.get(j)) {
            (Some(&x), Some(&y)) if x == y => {
                i += 1;
                j += 1;
                x
            }
            (Some(&x), Some(&y)) if x < y => {
                i += 1;
                x
            }
            (_, Some(&y)) => {
                j += 1;
                y
            }
            (Some(&x), None) => {
                i += 1;
                x
            }
            (None, None) => break,
        };
        if merged.len() == limit {
            return None;
        }
        merged.push(next);
    }
    Some(merged)
}

/// Re-expresses `cut`'s function over `leaves`, a superset of its own leaves.
fn expand(cut: &Cut, leaves: &[NodeId]) -> TruthTable {
    let mapping = cut
        .leaves
        .iter()
        .map(|leaf| {
            leaves
                .binary_search(leaf)
                .unwrap_or_else(|_| panic!("leaf {} is not part of the merged leaves", leaf))
        })
        .collect::<Vec<usize>>();
    cut.function.remap(leaves.len(), &mapping)
}

/// Returns true if the sorted `small` is a subset of the sorted `large`.
fn is_subset(small: &[NodeId], large: &[NodeId]) -> bool {
    let mut rest = large.iter();
    small.iter().all(|leaf| rest.any(|other| other == leaf))
}

/// A cut is dominated when another non-trivial cut of the same node uses a strict subset
/// of its leaves: the smaller cut already separates the root from the inputs.
fn is_dominated(cut: &Cut, others: &[Cut]) -> bool {
    !cut.is_trivial()
        && others.iter().any(|other| {
            !other.is_trivial()
                && other.size() < cut.size()
                && is_subset(&other.leaves, &cut.leaves)
        })
}

/// State of the product of the fanins' cut sets for one node.
struct Product<'a> {
    cut_size: usize,
    function: &'a TruthTable,
    fanin_sets: Vec<&'a CutSet>,
    chosen: Vec<&'a Cut>,
    seen: HashSet<Vec<NodeId>>,
    found: Vec<Cut>,
    root: NodeId,
}

impl<'a> Product<'a> {
    /// Picks a cut for fanin `position` onwards, `leaves` being the union so far.
    fn visit(&mut self, position: usize, leaves: Vec<NodeId>) {
        if position == self.fanin_sets.len() {
            if !leaves.is_empty() && !self.seen.contains(&leaves) {
                let inputs = self
                    .chosen
                    .iter()
                    .map(|cut| expand(cut, &leaves))
                    .collect::<Vec<TruthTable>>();
                let function = self.function.compose(leaves.len(), &inputs);
                self.seen.insert(leaves.clone());
                self.found.push(Cut {
                    root: self.root,
                    leaves,
                    function,
                });
            }
            return;
        }

        let set = self.fanin_sets[position];
        for cut in set {
            // Infeasible unions are dropped, along with everything they would extend to
            let Some(merged) = merge_leaves(&leaves, &cut.leaves, self.cut_size) else {
                continue;
            };
            self.chosen.push(cut);
            self.visit(position + 1, merged);
            self.chosen.pop();
        }
    }
}

fn enumerate_node_cuts(id: NodeId, node: &Node, sets: &[CutSet], params: CutParams) -> CutSet {
    let Some(function) = node.function() else {
        return CutSet {
            cuts: vec![Cut::trivial(id)],
        };
    };

    let trivial = Cut::trivial(id);
    let mut product = Product {
        cut_size: params.cut_size,
        function,
        fanin_sets: node.fanins().iter().map(|fanin| &sets[fanin.node()]).collect(),
        chosen: Vec::with_capacity(node.fanins().len()),
        seen: HashSet::from([trivial.leaves.clone()]),
        found: vec![trivial],
        root: id,
    };
    product.visit(0, Vec::new());

    let found = product.found;
    let dominated = found
        .iter()
        .map(|cut| is_dominated(cut, &found))
        .collect::<Vec<bool>>();
    let mut cuts = found
        .into_iter()
        .zip(dominated)
        .filter_map(|(cut, dominated)| (!dominated).then_some(cut))
        .collect::<Vec<Cut>>();

    // Stable: equal sizes keep their discovery order, and the trivial cut (discovered
    // first, one leaf) stays at index 0
    cuts.sort_by_key(Cut::size);
    cuts.truncate(params.cut_limit);

    log::debug!("node {}: {} cuts", id, cuts.len());
    CutSet { cuts }
}

/// Computes the cut set of every node, in topological order.
pub fn enumerate_cuts(network: &Network, params: CutParams) -> Result<NetworkCuts> {
    params.validate()?;

    let mut sets: Vec<CutSet> = Vec::with_capacity(network.size());
    network.for_each_node(|id, node| {
        let set = enumerate_node_cuts(id, node, &sets, params);
        sets.push(set);
    });

    let cuts = NetworkCuts { params, sets };
    log::info!(
        "enumerated {} cuts over {} nodes (K={}, limit={})",
        cuts.total_cuts(),
        network.size(),
        params.cut_size,
        params.cut_limit
    );
    Ok(cuts)
}
