use crate::TruthTable;

/// A node id.
///
/// Ids are dense and assigned in creation order. By convention, id 0 is the constant
/// false node and id 1 the constant true node.
pub type NodeId = usize;

/// A reference to a node of a [`Network`].
///
/// There are no complemented edges: LUT functions already encode any inversion.
///
/// [`Network`]: super::Network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signal(pub(super) NodeId);

impl Signal {
    pub fn node(&self) -> NodeId {
        self.0
    }
}

impl From<Signal> for NodeId {
    fn from(signal: Signal) -> Self {
        signal.0
    }
}

/// What a node computes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A constant signal.
    Constant(bool),
    /// A primary input.
    PrimaryInput,
    /// A LUT: the function of its fanins, variable `i` of the table being fanin `i`.
    Logic(TruthTable),
}

/// A node of the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(super) kind: NodeKind,
    pub(super) fanins: Vec<Signal>,
    pub(super) name: Option<String>,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn fanins(&self) -> &[Signal] {
        &self.fanins
    }

    /// The explicit name of the node, if it was given one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, NodeKind::Constant(_))
    }

    pub fn is_pi(&self) -> bool {
        matches!(self.kind, NodeKind::PrimaryInput)
    }

    pub fn is_logic(&self) -> bool {
        matches!(self.kind, NodeKind::Logic(_))
    }

    /// Returns the local function if the node is a LUT, else [`None`].
    pub fn function(&self) -> Option<&TruthTable> {
        match &self.kind {
            NodeKind::Logic(tt) => Some(tt),
            _ => None,
        }
    }
}
