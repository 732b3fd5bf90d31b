//! Export a [`Network`] to the BLIF format with [`Network::write_blif`] or [`Network::to_blif`].
//!
//! Every LUT becomes a `.names` block listing its on-set minterms. Nets are named after
//! [`Network::node_name`], so a network read from BLIF keeps its net names.
//!
//! ```rust
//! use lutcut::{Network, TruthTable};
//! let mut ntk = Network::new();
//! let a = ntk.create_primary_input("a");
//! let b = ntk.create_primary_input("b");
//! let o = ntk.create_logic_node(&[a, b], TruthTable::var(2, 0).xor(&TruthTable::var(2, 1)));
//! ntk.set_name(o, "o").unwrap();
//! ntk.create_output(o, "o");
//! assert_eq!(
//!     ntk.to_blif(),
//!     ".model top\n.inputs a b\n.outputs o\n.names a b o\n10 1\n01 1\n.end\n"
//! );
//! ```

use std::io::{self, Write};

use crate::{Network, NodeKind, TruthTable};

use super::{CONST0, CONST1};

const DEFAULT_MODEL_NAME: &str = "top";

fn write_cover(w: &mut impl Write, function: &TruthTable) -> io::Result<()> {
    let n = function.num_vars();
    for minterm in function.minterms() {
        if n == 0 {
            writeln!(w, "1")?;
            continue;
        }
        let cube = (0..n)
            .map(|v| if (minterm >> v) & 1 == 1 { '1' } else { '0' })
            .collect::<String>();
        writeln!(w, "{} 1", cube)?;
    }
    Ok(())
}

impl Network {
    /// Writes the network in BLIF format.
    pub fn write_blif(&self, mut w: impl Write) -> io::Result<()> {
        let names = self.node_names();

        writeln!(w, ".model {}", self.model_name().unwrap_or(DEFAULT_MODEL_NAME))?;

        let inputs = self
            .pis
            .iter()
            .map(|pi| names[pi.0].as_str())
            .collect::<Vec<&str>>();
        writeln!(w, ".inputs {}", inputs.join(" "))?;

        let outputs = self
            .outputs
            .iter()
            .map(|(_, name)| name.as_str())
            .collect::<Vec<&str>>();
        writeln!(w, ".outputs {}", outputs.join(" "))?;

        // Constants only get a net if something reads them
        let mut used = [false; 2];
        for node in &self.nodes {
            for fanin in &node.fanins {
                if fanin.0 <= CONST1 {
                    used[fanin.0] = true;
                }
            }
        }
        for (signal, _) in &self.outputs {
            if signal.0 <= CONST1 {
                used[signal.0] = true;
            }
        }
        if used[CONST0] {
            writeln!(w, ".names {}", names[CONST0])?;
        }
        if used[CONST1] {
            writeln!(w, ".names {}\n1", names[CONST1])?;
        }

        for (id, node) in self.nodes.iter().enumerate() {
            let NodeKind::Logic(function) = &node.kind else {
                continue;
            };
            let mut nets = node
                .fanins
                .iter()
                .map(|fanin| names[fanin.0].as_str())
                .collect::<Vec<&str>>();
            nets.push(&names[id]);
            writeln!(w, ".names {}", nets.join(" "))?;
            write_cover(&mut w, function)?;
        }

        // Outputs named differently from their driver get a buffer
        for (signal, name) in &self.outputs {
            if names[signal.0] != *name {
                writeln!(w, ".names {} {}\n1 1", names[signal.0], name)?;
            }
        }

        writeln!(w, ".end")
    }

    /// Returns the BLIF description of the network.
    pub fn to_blif(&self) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_blif(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
