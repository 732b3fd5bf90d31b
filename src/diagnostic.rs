//! Recoverable conditions met while exporting cuts or rebuilding a network.
//!
//! None of these abort a run: the affected node or output is left out of the result and
//! processing goes on. They are logged as warnings when produced and handed back to the
//! caller so the run can be inspected afterwards.

use thiserror::Error;

/// A recoverable condition. Each one causes exactly the named node or output to be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// The network declares no output, so this fanout-free node is exported as one.
    #[error("network has no outputs, using fanout-free node {name} as an output")]
    FanoutFreeOutput { name: String },

    /// The selection names a node the network does not have.
    #[error("chosen cut references unknown node {name}")]
    UnknownNode { name: String },

    /// The chosen index is not smaller than the number of cuts of the node.
    #[error("chosen cut index {index} out of range for node {node} ({available} cuts)")]
    CutIndexOutOfRange {
        node: String,
        index: u32,
        available: usize,
    },

    /// A leaf of the chosen cut has not been rebuilt, so the node cannot be instantiated.
    #[error("missing mapped leaf {leaf} for node {node}")]
    MissingLeaf { node: String, leaf: String },

    /// The output name matches neither a rebuilt internal node nor a primary input.
    #[error("could not create output {name}")]
    UnresolvedOutput { name: String },
}

impl Diagnostic {
    /// Logs the diagnostic as a warning and returns it.
    pub(crate) fn report(self) -> Self {
        log::warn!("{}", self);
        self
    }
}
