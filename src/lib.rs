pub mod cost;
pub mod cut;
pub mod diagnostic;
pub mod exchange;
pub mod flow;
pub mod network;
pub mod rebuild;
pub mod truth_table;

// Re-exporting symbols and modules.
pub use cut::{Cut, CutParams, CutSet, NetworkCuts, enumerate_cuts};
pub use diagnostic::Diagnostic;
pub use exchange::{DocumentHeader, ExchangeDocument, Selection};
pub use network::{MapError, Network, Node, NodeId, NodeKind, ParserError, Result, Signal};
pub use rebuild::{Rebuild, RebuildReport, rebuild};
pub use truth_table::TruthTable;
