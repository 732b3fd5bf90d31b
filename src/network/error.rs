use thiserror::Error;

use super::NodeId;

/// The result of a network, enumeration or reconstruction operation.
pub type Result<T> = std::result::Result<T, MapError>;

/// Error returned when an operation failed. All of these abort the current run.
#[derive(Debug, Error)]
pub enum MapError {
    /// The node with given id does not exist.
    #[error("node with id={0} does not exist")]
    NodeDoesNotExist(NodeId),

    /// The network has reached an invalid state. This should never happen when the
    /// network is only built through its creation methods.
    #[error("the network has reached an invalid state - error: {0}")]
    InvalidState(String),

    /// Cut enumeration parameters are unusable.
    #[error("invalid cut parameters: {0}")]
    InvalidParams(String),

    /// The exchange document is not valid JSON or misses required fields.
    #[error("malformed cuts document: {0}")]
    MalformedDocument(serde_json::Error),

    /// The selection document is not valid JSON or `chosen_cuts` is not a map
    /// from node name to a non-negative cut index.
    #[error("malformed selection document: {0}")]
    MalformedSelection(serde_json::Error),

    /// Reading or writing a stream failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Just forwarding a [`ParserError`].
    #[error("{0}")]
    ParserError(#[from] ParserError),
}

/// Error returned when reading a BLIF description failed.
///
/// It is defined here because the `parser` module is private.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Only combinational single-model BLIF is supported.
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Invalid token, something else was expected.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// A net is used but neither declared as an input nor driven by a `.names` block.
    #[error("net {0} is never defined")]
    UndefinedNet(String),

    /// A net is driven by more than one `.names` block, or by an input and a block.
    #[error("net {0} has more than one driver")]
    MultipleDrivers(String),

    /// The `.names` blocks form a cycle through the given net.
    #[error("combinational loop through net {0}")]
    CombinationalLoop(String),

    /// An IO error occured (file doesn't exist, cannot be read, ...).
    #[error("io error: {0}")]
    IoError(String),
}
