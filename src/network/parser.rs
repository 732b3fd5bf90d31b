use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{MapError, Network, Result, Signal, TruthTable, network::error::ParserError, truth_table};

/// A `.names` block: a single-output cover over named nets.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Gate {
    inputs: Vec<String>,
    output: String,
    rows: Vec<(String, bool)>,
}

/// The statements of one `.model`, before any node is created.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Model {
    name: Option<String>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    gates: Vec<Gate>,
}

/// Joins `\`-continued lines and strips comments. Returns non-empty logical lines
/// with the number of the physical line they start on.
fn logical_lines(reader: impl BufRead) -> std::result::Result<Vec<(usize, String)>, ParserError> {
    let mut lines = Vec::new();
    let mut pending = String::new();
    let mut start = 0;

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|z| ParserError::IoError(z.to_string()))?;
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line.as_str(),
        };
        if pending.is_empty() {
            start = number + 1;
        }
        let trimmed = content.trim_end();
        if let Some(stripped) = trimmed.strip_suffix('\\') {
            pending.push_str(stripped);
            pending.push(' ');
            continue;
        }
        pending.push_str(trimmed);
        if !pending.trim().is_empty() {
            lines.push((start, pending.trim().to_string()));
        }
        pending.clear();
    }

    if !pending.trim().is_empty() {
        lines.push((start, pending.trim().to_string()));
    }
    Ok(lines)
}

fn read_cover_row(gate: &Gate, tokens: &[&str]) -> std::result::Result<(String, bool), ParserError> {
    let (cube, output) = match (gate.inputs.len(), tokens) {
        (0, [output]) => ("", *output),
        (n, [cube, output]) if n > 0 => (*cube, *output),
        _ => {
            return Err(ParserError::InvalidToken(format!(
                "malformed cover row '{}' for net {}",
                tokens.join(" "),
                gate.output
            )));
        }
    };

    if cube.len() != gate.inputs.len() || !cube.chars().all(|c| matches!(c, '0' | '1' | '-')) {
        return Err(ParserError::InvalidToken(format!(
            "expected a cube of {} characters among 0, 1, -, got '{}' for net {}",
            gate.inputs.len(),
            cube,
            gate.output
        )));
    }
    let value = match output {
        "1" => true,
        "0" => false,
        _ => {
            return Err(ParserError::InvalidToken(format!(
                "expected 0 or 1 as cover output, got '{}' for net {}",
                output, gate.output
            )));
        }
    };
    Ok((cube.to_string(), value))
}

fn read_model(lines: &[(usize, String)]) -> std::result::Result<Model, ParserError> {
    let mut model = Model::default();
    let mut current: Option<Gate> = None;
    let mut seen_model = false;
    let mut ended = false;

    for (number, line) in lines {
        let tokens = line.split_whitespace().collect::<Vec<&str>>();
        let Some(&first) = tokens.first() else {
            continue;
        };

        if ended {
            return Err(ParserError::UnsupportedFeature(format!(
                "only one model per file is supported (line {})",
                number
            )));
        }

        if !first.starts_with('.') {
            let gate = current.as_mut().ok_or(ParserError::InvalidToken(format!(
                "cover row outside of a .names block at line {}",
                number
            )))?;
            let row = read_cover_row(gate, &tokens)?;
            gate.rows.push(row);
            continue;
        }

        // Any directive closes the current cover
        if let Some(gate) = current.take() {
            model.gates.push(gate);
        }

        match first {
            ".model" => {
                if seen_model {
                    return Err(ParserError::UnsupportedFeature(format!(
                        "only one model per file is supported (line {})",
                        number
                    )));
                }
                seen_model = true;
                model.name = tokens.get(1).map(|s| s.to_string());
            }
            ".inputs" => model.inputs.extend(tokens[1..].iter().map(|s| s.to_string())),
            ".outputs" => model.outputs.extend(tokens[1..].iter().map(|s| s.to_string())),
            ".names" => {
                let Some((output, inputs)) = tokens[1..].split_last() else {
                    return Err(ParserError::InvalidToken(format!(
                        ".names without any net at line {}",
                        number
                    )));
                };
                if inputs.len() > truth_table::MAX_VARS {
                    return Err(ParserError::UnsupportedFeature(format!(
                        "net {} has {} inputs, at most {} are supported",
                        output,
                        inputs.len(),
                        truth_table::MAX_VARS
                    )));
                }
                current = Some(Gate {
                    inputs: inputs.iter().map(|s| s.to_string()).collect(),
                    output: output.to_string(),
                    rows: Vec::new(),
                });
            }
            ".end" => ended = true,
            ".latch" | ".mlatch" | ".subckt" | ".gate" | ".search" | ".exdc" => {
                return Err(ParserError::UnsupportedFeature(format!(
                    "{} at line {} (only combinational single-model BLIF is supported)",
                    first, number
                )));
            }
            _ => log::warn!("ignoring BLIF directive {} at line {}", first, number),
        }
    }

    if let Some(gate) = current.take() {
        model.gates.push(gate);
    }
    Ok(model)
}

/// Truth table of a cover. Rows are either all on-set (`1`) or all off-set (`0`) rows.
fn cover_function(gate: &Gate) -> std::result::Result<TruthTable, ParserError> {
    let n = gate.inputs.len();
    let Some(&(_, polarity)) = gate.rows.first() else {
        return Ok(TruthTable::new(n));
    };
    if gate.rows.iter().any(|(_, value)| *value != polarity) {
        return Err(ParserError::InvalidToken(format!(
            "cover of net {} mixes on-set and off-set rows",
            gate.output
        )));
    }

    let mut tt = TruthTable::new(n);
    for (cube, _) in &gate.rows {
        let cube = cube.as_bytes();
        for assignment in 0..tt.num_bits() {
            let matches = (0..n).all(|v| match cube[v] {
                b'0' => (assignment >> v) & 1 == 0,
                b'1' => (assignment >> v) & 1 == 1,
                _ => true,
            });
            if matches {
                tt.set_bit(assignment, true);
            }
        }
    }
    Ok(if polarity { tt } else { tt.not() })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    InProgress,
    Done,
}

/// Builder for the BLIF format.
///
/// Inputs are created first, then `.names` blocks in dependency order: a depth-first
/// visit from each block in file order creates its fanins before the block itself.
fn build_network(model: Model) -> Result<Network> {
    let mut ntk = Network::new();
    if let Some(name) = &model.name {
        ntk.set_model_name(name.clone());
    }

    let mut nets: HashMap<String, Signal> = HashMap::new();
    for input in &model.inputs {
        if nets.contains_key(input) {
            return Err(ParserError::MultipleDrivers(input.clone()).into());
        }
        let signal = ntk.create_primary_input(input.clone());
        nets.insert(input.clone(), signal);
    }

    let mut drivers: HashMap<&str, usize> = HashMap::new();
    for (index, gate) in model.gates.iter().enumerate() {
        if nets.contains_key(&gate.output) || drivers.insert(&gate.output, index).is_some() {
            return Err(ParserError::MultipleDrivers(gate.output.clone()).into());
        }
    }

    let mut state = vec![Visit::Pending; model.gates.len()];
    for root in 0..model.gates.len() {
        let mut stack: Vec<(usize, bool)> = vec![(root, false)];

        while let Some((index, last_time)) = stack.pop() {
            let gate = &model.gates[index];

            // Post order: all fanins are available now
            if last_time {
                let fanins = gate
                    .inputs
                    .iter()
                    .map(|net| {
                        nets.get(net)
                            .copied()
                            .ok_or_else(|| MapError::from(ParserError::UndefinedNet(net.clone())))
                    })
                    .collect::<Result<Vec<Signal>>>()?;
                let function = cover_function(gate)?;
                let signal = if fanins.is_empty() {
                    ntk.create_constant(function.is_const1())
                } else {
                    let signal = ntk.create_logic_node(&fanins, function);
                    ntk.set_name(signal, gate.output.clone())?;
                    signal
                };
                nets.insert(gate.output.clone(), signal);
                state[index] = Visit::Done;
                continue;
            }

            match state[index] {
                Visit::Done => continue,
                Visit::InProgress => {
                    return Err(ParserError::CombinationalLoop(gate.output.clone()).into());
                }
                Visit::Pending => {}
            }

            state[index] = Visit::InProgress;
            stack.push((index, true));

            for net in &gate.inputs {
                if nets.contains_key(net) {
                    continue;
                }
                let driver = *drivers
                    .get(net.as_str())
                    .ok_or_else(|| ParserError::UndefinedNet(net.clone()))?;
                if state[driver] != Visit::Done {
                    stack.push((driver, false));
                }
            }
        }
    }

    for output in &model.outputs {
        let signal = *nets
            .get(output)
            .ok_or_else(|| ParserError::UndefinedNet(output.clone()))?;
        ntk.create_output(signal, output.clone());
    }

    ntk.check_integrity()?;
    Ok(ntk)
}

impl Network {
    /// Creates a network from a BLIF description.
    ///
    /// Only the combinational subset is supported: `.model`, `.inputs`, `.outputs`,
    /// `.names` and `.end`. Sequential and hierarchical constructs are rejected.
    pub fn from_blif(reader: impl BufRead) -> Result<Self> {
        let lines = logical_lines(reader)?;
        let model = read_model(&lines)?;
        build_network(model)
    }

    /// Creates a network from a `.blif` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path.as_ref()).map_err(|z| ParserError::IoError(z.to_string()))?;
        Network::from_blif(BufReader::new(f))
    }
}
