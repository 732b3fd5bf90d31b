//! The JSON documents exchanged with the external cut selection optimizer.
//!
//! - [`ExchangeDocument`] is written by the enumeration phase: every LUT with its ranked cuts
//!   and their costs, the output names and the cut size.
//! - [`Selection`] is written by the optimizer: one cut index per chosen node.
//! - [`DocumentHeader`] is what the rebuild phase reads back from the exchange document. The
//!   cut sets are enumerated again, so the content of `nodes` is not looked at.
//!
//! These are plain data: nothing here checks a selection against the actual cut sets, that is
//! up to [`crate::rebuild`].

use std::{
    collections::BTreeMap,
    io::{Read, Write},
};

use serde::{Deserialize, Serialize};

use crate::{
    MapError, Network, Result,
    cut::{CutParams, DEFAULT_CUT_LIMIT, NetworkCuts},
    diagnostic::Diagnostic,
};

/// One cut as seen by the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutEntry {
    pub leaves: Vec<String>,
    pub inv_cost: u32,
    pub depth_cost: u32,
    pub area_cost: u32,
}

/// One LUT and its cuts, in rank order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub index: usize,
    pub name: String,
    pub cuts: Vec<CutEntry>,
}

/// The enumeration result handed to the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeDocument {
    /// The cut size `K`.
    pub cuts_per_node: u32,
    /// The cut limit used for enumeration, so the cut sets can be re-derived identically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut_limit: Option<u32>,
    /// Names of the outputs, each one an internal node or a primary input name.
    #[serde(default)]
    pub outputs: Vec<String>,
    pub nodes: Vec<NodeEntry>,
}

impl ExchangeDocument {
    /// Builds the document from a network and its cuts.
    ///
    /// Only LUTs are listed. If the network declares no output, every fanout-free node
    /// except the constants (primary inputs included) is exported as an output, and a
    /// [`Diagnostic::FanoutFreeOutput`] is returned for each one.
    pub fn from_cuts(network: &Network, cuts: &NetworkCuts) -> (Self, Vec<Diagnostic>) {
        let names = network.node_names();
        let mut diagnostics = Vec::new();

        let mut outputs = Vec::new();
        if network.num_pos() > 0 {
            network.for_each_output(|signal, _| outputs.push(names[signal.node()].clone()));
        } else {
            log::warn!("network has no outputs, using fanout-free nodes as outputs");
            let fanouts = network.fanout_counts();
            network.for_each_node(|id, node| {
                if node.is_constant() || fanouts[id] > 0 {
                    return;
                }
                outputs.push(names[id].clone());
                diagnostics.push(
                    Diagnostic::FanoutFreeOutput {
                        name: names[id].clone(),
                    }
                    .report(),
                );
            });
        }

        let mut nodes = Vec::new();
        network.for_each_node(|id, node| {
            if !node.is_logic() {
                return;
            }
            let entries = cuts
                .cuts(id)
                .iter()
                .map(|cut| {
                    let cost = cut.cost();
                    CutEntry {
                        leaves: cut.leaves().iter().map(|&leaf| names[leaf].clone()).collect(),
                        inv_cost: cost.inv_cost,
                        depth_cost: cost.depth_cost,
                        area_cost: cost.area_cost,
                    }
                })
                .collect();
            nodes.push(NodeEntry {
                index: id,
                name: names[id].clone(),
                cuts: entries,
            });
        });

        // Both fit: enumerate_cuts validated the parameters
        let params = cuts.params();
        let cuts_per_node = u32::try_from(params.cut_size).unwrap_or(u32::MAX);
        let cut_limit = u32::try_from(params.cut_limit).unwrap_or(u32::MAX);
        log::info!(
            "exporting {} nodes and {} outputs",
            nodes.len(),
            outputs.len()
        );
        let document = ExchangeDocument {
            cuts_per_node,
            cut_limit: Some(cut_limit),
            outputs,
            nodes,
        };
        (document, diagnostics)
    }

    /// The parameters to re-derive the cut sets with. A missing cut limit falls back to
    /// the default one.
    pub fn params(&self) -> CutParams {
        params(self.cuts_per_node, self.cut_limit)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(MapError::MalformedDocument)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        serde_json::from_reader(reader).map_err(MapError::MalformedDocument)
    }

    /// Pretty-printed JSON with a two-space indent.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(MapError::MalformedDocument)
    }

    pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).map_err(MapError::MalformedDocument)?;
        writeln!(writer)?;
        Ok(())
    }
}

fn params(cuts_per_node: u32, cut_limit: Option<u32>) -> CutParams {
    CutParams::new(
        cuts_per_node as usize,
        cut_limit.map_or(DEFAULT_CUT_LIMIT, |limit| limit as usize),
    )
}

/// The part of an exchange document the rebuild phase needs.
///
/// Only `cuts_per_node` and `nodes` must be present. The entries of `nodes` are kept as raw
/// JSON whatever their shape, optimizers are free to trim or rewrite them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub cuts_per_node: u32,
    #[serde(default)]
    pub cut_limit: Option<u32>,
    #[serde(default)]
    pub outputs: Vec<String>,
    pub nodes: Vec<serde_json::Value>,
}

impl DocumentHeader {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(MapError::MalformedDocument)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        serde_json::from_reader(reader).map_err(MapError::MalformedDocument)
    }

    /// See [`ExchangeDocument::params`].
    pub fn params(&self) -> CutParams {
        params(self.cuts_per_node, self.cut_limit)
    }
}

/// The optimizer's answer: for each chosen node (by name), the index of its cut.
///
/// Nodes missing from the map are not instantiated, unless something else needs them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub chosen_cuts: BTreeMap<String, u32>,
}

impl Selection {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(MapError::MalformedSelection)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        serde_json::from_reader(reader).map_err(MapError::MalformedSelection)
    }

    /// Chooses cut `index` for the node named `name`.
    pub fn choose(&mut self, name: impl Into<String>, index: u32) -> &mut Self {
        self.chosen_cuts.insert(name.into(), index);
        self
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{TruthTable, cut::enumerate_cuts};

    fn and2_network() -> Network {
        let mut ntk = Network::new();
        let a = ntk.create_primary_input("a");
        let b = ntk.create_primary_input("b");
        let o = ntk.create_logic_node(&[a, b], TruthTable::var(2, 0).and(&TruthTable::var(2, 1)));
        ntk.set_name(o, "o").unwrap();
        ntk.create_output(o, "o");
        ntk
    }

    #[test]
    fn and2_document_test() {
        let ntk = and2_network();
        let cuts = enumerate_cuts(&ntk, CutParams::new(4, 32)).unwrap();
        let (document, diagnostics) = ExchangeDocument::from_cuts(&ntk, &cuts);
        assert!(diagnostics.is_empty());

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(
            value,
            json!({
                "cuts_per_node": 4,
                "cut_limit": 32,
                "outputs": ["o"],
                "nodes": [{
                    "index": 4,
                    "name": "o",
                    "cuts": [
                        { "leaves": ["o"], "inv_cost": 0, "depth_cost": 1, "area_cost": 1 },
                        { "leaves": ["a", "b"], "inv_cost": 0, "depth_cost": 1, "area_cost": 2 },
                    ]
                }]
            })
        );

        let text = document.to_json_string().unwrap();
        assert_eq!(ExchangeDocument::from_json_str(&text).unwrap(), document);
    }

    #[test]
    fn fanout_free_outputs_test() {
        // No declared output, n5 is the only fanout-free node
        let mut ntk = Network::new();
        let a = ntk.create_primary_input("a");
        let b = ntk.create_primary_input("b");
        let n4 = ntk.create_logic_node(&[a, b], TruthTable::var(2, 0).or(&TruthTable::var(2, 1)));
        let _n5 = ntk.create_logic_node(&[n4], TruthTable::identity().not());
        let cuts = enumerate_cuts(&ntk, CutParams::default()).unwrap();

        let (document, diagnostics) = ExchangeDocument::from_cuts(&ntk, &cuts);
        assert_eq!(document.outputs, vec!["n5"]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::FanoutFreeOutput {
                name: "n5".to_string()
            }]
        );

        // Unused inputs are outputs too, constants never are
        let mut ntk = Network::new();
        let _a = ntk.create_primary_input("a");
        let cuts = enumerate_cuts(&ntk, CutParams::default()).unwrap();
        let (document, diagnostics) = ExchangeDocument::from_cuts(&ntk, &cuts);
        assert_eq!(document.outputs, vec!["a"]);
        assert_eq!(diagnostics.len(), 1);
        assert!(document.nodes.is_empty());
    }

    #[test]
    fn decode_document_test() {
        let document = ExchangeDocument::from_json_str(
            r#"{ "cuts_per_node": 3, "nodes": [ { "index": 4, "name": "o", "cuts": [] } ] }"#,
        )
        .unwrap();
        assert!(document.outputs.is_empty());
        assert_eq!(document.params(), CutParams::new(3, DEFAULT_CUT_LIMIT));

        for text in [
            r#"{ "nodes": [] }"#,
            r#"{ "cuts_per_node": 4 }"#,
            r#"{ "cuts_per_node": 4, "nodes": [ { "index": 1 } ] }"#,
            "not json",
        ] {
            assert!(matches!(
                ExchangeDocument::from_json_str(text),
                Err(MapError::MalformedDocument(_))
            ));
        }

        let err = ExchangeDocument::from_json_str(r#"{ "cuts_per_node": 4 }"#).unwrap_err();
        assert!(err.to_string().contains("nodes"));
    }

    #[test]
    fn decode_header_test() {
        // Trimmed node entries, bare leaf lists instead of cut objects
        let header = DocumentHeader::from_json_str(
            r#"{ "cuts_per_node": 4, "outputs": ["m"], "nodes": [ { "name": "m", "cuts": [["a", "b"]] } ] }"#,
        )
        .unwrap();
        assert_eq!(header.outputs, vec!["m"]);
        assert_eq!(header.nodes.len(), 1);
        assert_eq!(header.params(), CutParams::new(4, DEFAULT_CUT_LIMIT));

        let header = DocumentHeader::from_json_str(
            r#"{ "cuts_per_node": 6, "cut_limit": 8, "nodes": [] }"#,
        )
        .unwrap();
        assert!(header.outputs.is_empty());
        assert_eq!(header.params(), CutParams::new(6, 8));

        // A full document is a valid header
        let ntk = and2_network();
        let cuts = enumerate_cuts(&ntk, CutParams::new(3, 10)).unwrap();
        let text = ExchangeDocument::from_cuts(&ntk, &cuts).0.to_json_string().unwrap();
        let header = DocumentHeader::from_json_str(&text).unwrap();
        assert_eq!(header.params(), CutParams::new(3, 10));
        assert_eq!(header.outputs, vec!["o"]);

        for text in [
            r#"{ "nodes": [] }"#,
            r#"{ "cuts_per_node": 4, "outputs": ["m"] }"#,
            r#"{ "cuts_per_node": -1, "nodes": [] }"#,
            r#"{ "cuts_per_node": 4, "nodes": {} }"#,
        ] {
            assert!(matches!(
                DocumentHeader::from_json_str(text),
                Err(MapError::MalformedDocument(_))
            ));
        }
    }

    #[test]
    fn decode_selection_test() {
        let selection =
            Selection::from_json_str(r#"{ "chosen_cuts": { "o": 1, "n7": 0 } }"#).unwrap();
        let mut expected = Selection::default();
        expected.choose("o", 1).choose("n7", 0);
        assert_eq!(selection, expected);

        for text in [
            r#"{}"#,
            r#"{ "chosen_cuts": [1, 2] }"#,
            r#"{ "chosen_cuts": { "o": -1 } }"#,
            r#"{ "chosen_cuts": { "o": "first" } }"#,
        ] {
            assert!(matches!(
                Selection::from_json_str(text),
                Err(MapError::MalformedSelection(_))
            ));
        }
    }
}
