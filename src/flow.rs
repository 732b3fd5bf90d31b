//! The two phases of the mapping flow, from files to files.
//!
//! - [`run_enumerate`]: BLIF network in, exchange document out.
//! - [`run_rebuild`]: BLIF network, exchange document and selection in, BLIF network out.
//!
//! Between the two, an external optimizer turns the exchange document into a selection.

use std::{
    fmt,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    Network, Result,
    cut::{CutParams, enumerate_cuts},
    diagnostic::Diagnostic,
    exchange::{DocumentHeader, ExchangeDocument, Selection},
    rebuild::rebuild,
};

/// Outcome of the enumeration phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerateSummary {
    pub nodes: usize,
    pub gates: usize,
    pub cuts: usize,
    pub outputs: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of the rebuild phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildSummary {
    pub original_nodes: usize,
    pub rebuilt_nodes: usize,
    pub rebuilt_pis: usize,
    pub rebuilt_pos: usize,
    pub selected_nodes: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl fmt::Display for RebuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original nodes: {}", self.original_nodes)?;
        writeln!(f, "Rebuilt nodes:  {}", self.rebuilt_nodes)?;
        writeln!(f, "Rebuilt PIs:    {}", self.rebuilt_pis)?;
        writeln!(f, "Rebuilt POs:    {}", self.rebuilt_pos)?;
        write!(f, "Selected nodes: {}", self.selected_nodes)
    }
}

/// Enumerates the cuts of the network stored in `input` and writes the exchange document
/// to `output`.
pub fn run_enumerate(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    params: CutParams,
) -> Result<EnumerateSummary> {
    params.validate()?;
    let network = Network::from_file(input)?;
    log::info!(
        "PIs={} POs={} LUTs={} nodes={}",
        network.num_pis(),
        network.num_pos(),
        network.num_gates(),
        network.size()
    );

    let cuts = enumerate_cuts(&network, params)?;
    let (document, diagnostics) = ExchangeDocument::from_cuts(&network, &cuts);

    let mut writer = BufWriter::new(File::create(output)?);
    document.write_to(&mut writer)?;
    writer.flush()?;

    Ok(EnumerateSummary {
        nodes: network.size(),
        gates: network.num_gates(),
        cuts: cuts.total_cuts(),
        outputs: document.outputs.len(),
        diagnostics,
    })
}

/// Rebuilds the network stored in `input` from the cut selection, and writes it to `output`.
///
/// The cut sets are enumerated again with the document's cut size. The cut limit is
/// `cut_limit` when given, else the one recorded in the document, else the default one.
pub fn run_rebuild(
    input: impl AsRef<Path>,
    cuts: impl AsRef<Path>,
    selection: impl AsRef<Path>,
    output: impl AsRef<Path>,
    cut_limit: Option<usize>,
) -> Result<RebuildSummary> {
    let network = Network::from_file(input)?;
    let document = DocumentHeader::from_reader(BufReader::new(File::open(cuts)?))?;
    let selection = Selection::from_reader(BufReader::new(File::open(selection)?))?;

    let mut params = document.params();
    if let Some(limit) = cut_limit {
        params.cut_limit = limit;
    }
    let network_cuts = enumerate_cuts(&network, params)?;
    let result = rebuild(&network, &network_cuts, &document.outputs, &selection)?;

    let mut writer = BufWriter::new(File::create(output)?);
    result.network.write_blif(&mut writer)?;
    writer.flush()?;

    Ok(RebuildSummary {
        original_nodes: network.size(),
        rebuilt_nodes: result.network.size(),
        rebuilt_pis: result.network.num_pis(),
        rebuilt_pos: result.network.num_pos(),
        selected_nodes: result.report.selected_nodes,
        diagnostics: result.report.diagnostics,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rebuild_summary_display_test() {
        let summary = RebuildSummary {
            original_nodes: 9,
            rebuilt_nodes: 7,
            rebuilt_pis: 3,
            rebuilt_pos: 1,
            selected_nodes: 2,
            diagnostics: Vec::new(),
        };
        assert_eq!(
            summary.to_string(),
            "Original nodes: 9\n\
             Rebuilt nodes:  7\n\
             Rebuilt PIs:    3\n\
             Rebuilt POs:    1\n\
             Selected nodes: 2"
        );
    }
}
