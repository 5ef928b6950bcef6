//! IO for .bench (ISCAS) files

use std::io::{BufRead, BufReader, Read, Write};

use fxhash::FxHashMap;

use crate::network::{BinaryType, NaryType, TernaryType};
use crate::{Gate, Network, Signal};

use super::utils::{get_inverted_signals, sig_to_string};

fn build_name_to_sig(
    statements: &[Vec<String>],
    inputs: &[String],
) -> FxHashMap<String, Signal> {
    let mut ret = FxHashMap::default();
    for (i, name) in inputs.iter().enumerate() {
        let present = ret
            .insert(name.clone(), Signal::from_input(i as u32))
            .is_some();
        assert!(!present, "{} is defined twice", name)
    }
    for (i, s) in statements.iter().enumerate() {
        let present = ret
            .insert(s[0].to_string(), Signal::from_var(i as u32))
            .is_some();
        assert!(!present, "{} is defined twice", s[0])
    }

    // ABC-style naming for constant signals
    if !ret.contains_key("vdd") {
        ret.insert("vdd".to_string(), Signal::one());
    }
    if !ret.contains_key("gnd") {
        ret.insert("gnd".to_string(), Signal::zero());
    }
    ret
}

fn check_statement(statement: &[String], name_to_sig: &FxHashMap<String, Signal>) {
    let deps = &statement[2..];
    for dep in deps {
        assert!(
            name_to_sig.contains_key(dep),
            "Gate input {dep} is not generated anywhere"
        );
    }
    match statement[1].to_uppercase().as_str() {
        "BUF" | "BUFF" | "NOT" => assert_eq!(deps.len(), 1),
        "VDD" | "VSS" => assert_eq!(deps.len(), 0),
        "MAJ" => assert_eq!(deps.len(), 3),
        _ => (),
    };
}

fn gate_dependencies(
    statement: &[String],
    name_to_sig: &FxHashMap<String, Signal>,
) -> Box<[Signal]> {
    statement[2..].iter().map(|n| name_to_sig[n]).collect()
}

fn network_from_statements(
    statements: &[Vec<String>],
    inputs: &[String],
    outputs: &[String],
) -> Result<Network, String> {
    let mut ret = Network::new();
    ret.add_inputs(inputs.len());

    // Compute a mapping between the two
    let name_to_sig = build_name_to_sig(statements, inputs);

    // Check everything
    for statement in statements {
        check_statement(statement, &name_to_sig);
    }
    for output in outputs {
        assert!(
            name_to_sig.contains_key(output),
            "Output {output} is not generated anywhere"
        );
    }

    // Setup the variables based on the mapping
    for s in statements {
        let sigs: Box<[Signal]> = gate_dependencies(s, &name_to_sig);
        match s[1].to_uppercase().as_str() {
            "BUF" | "BUFF" => {
                ret.add(Gate::Buf(sigs[0]));
            }
            "NOT" => {
                ret.add(Gate::Buf(!sigs[0]));
            }
            "VDD" => {
                ret.add(Gate::Buf(Signal::one()));
            }
            "VSS" | "GND" => {
                ret.add(Gate::Buf(Signal::zero()));
            }
            "AND" => {
                ret.add(Gate::Nary(sigs, NaryType::And));
            }
            "NAND" => {
                ret.add(Gate::Nary(sigs, NaryType::Nand));
            }
            "OR" => {
                ret.add(Gate::Nary(sigs, NaryType::Or));
            }
            "NOR" => {
                ret.add(Gate::Nary(sigs, NaryType::Nor));
            }
            "XOR" => {
                ret.add(Gate::Nary(sigs, NaryType::Xor));
            }
            "XNOR" => {
                ret.add(Gate::Nary(sigs, NaryType::Xnor));
            }
            "MAJ" => {
                ret.add(Gate::maj(sigs[0], sigs[1], sigs[2]));
            }
            "DFF" | "DFFRSE" => {
                return Err("Sequential elements are not supported".to_string());
            }
            _ => {
                return Err(format!("Unknown gate type {}", s[1]));
            }
        }
    }
    for o in outputs {
        ret.add_output(name_to_sig[o]);
    }
    ret.topo_sort();
    ret.check();
    Ok(ret)
}

/// Read a network in .bench format, as used by the ISCAS benchmarks
///
/// These files describe the design with simple statements like:
/// ```text
///     # This is a comment
///     INPUT(i0)
///     INPUT(i1)
///     x0 = AND(i0, i1)
///     x1 = NAND(x0, i1)
///     x2 = OR(x0, i0)
///     x3 = NOR(i0, x1)
///     x4 = XOR(x3, x2)
///     x5 = BUF(x4)
///     x6 = NOT(x5)
///     x7 = gnd
///     x8 = vdd
///     OUTPUT(x0)
/// ```
///
/// Only combinational designs are supported; flip-flops are rejected.
pub fn read_bench<R: Read>(r: R) -> Result<Network, String> {
    let mut statements = Vec::new();
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    for l in BufReader::new(r).lines() {
        if let Ok(s) = l {
            let t = s.trim().to_owned();
            if t.is_empty() || t.starts_with('#') {
                continue;
            }
            if !t.contains("=") {
                let parts: Vec<_> = t
                    .split(&['(', ')'])
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .collect();
                assert_eq!(parts.len(), 2);
                if ["INPUT", "PINPUT"].contains(&parts[0]) {
                    inputs.push(parts[1].to_string());
                } else if ["OUTPUT", "POUTPUT"].contains(&parts[0]) {
                    outputs.push(parts[1].to_string());
                } else {
                    return Err(format!("Unknown keyword {}", parts[0]));
                }
            } else {
                let parts: Vec<_> = t
                    .split(&['=', '(', ',', ')'])
                    .map(|s| s.trim().to_owned())
                    .filter(|s| !s.is_empty())
                    .collect();
                assert!(parts.len() >= 2);
                statements.push(parts);
            }
        } else {
            return Err("Error during file IO".to_string());
        }
    }
    network_from_statements(&statements, &inputs, &outputs)
}

/// Write a network in .bench format, as used by the ISCAS benchmarks
pub fn write_bench<W: Write>(w: &mut W, ntk: &Network) {
    writeln!(w, "# .bench (ISCAS) file").unwrap();
    writeln!(w, "# Generated by rmopt").unwrap();
    for i in 0..ntk.nb_inputs() {
        writeln!(w, "INPUT({})", ntk.input(i)).unwrap();
    }
    writeln!(w).unwrap();
    for i in 0..ntk.nb_outputs() {
        writeln!(w, "OUTPUT({})", sig_to_string(&ntk.output(i))).unwrap();
    }
    writeln!(w).unwrap();
    for i in 0..ntk.nb_nodes() {
        use Gate::*;
        let g = ntk.gate(i);
        let rep = g
            .dependencies()
            .iter()
            .map(sig_to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(w, "x{} = ", i).unwrap();
        match g {
            Binary(_, BinaryType::And) | Ternary(_, TernaryType::And) => {
                writeln!(w, "AND({})", rep).unwrap();
            }
            Binary(_, BinaryType::Xor) | Ternary(_, TernaryType::Xor) => {
                writeln!(w, "XOR({})", rep).unwrap();
            }
            Nary(_, tp) => match tp {
                NaryType::And => writeln!(w, "AND({})", rep).unwrap(),
                NaryType::Or => writeln!(w, "OR({})", rep).unwrap(),
                NaryType::Nand => writeln!(w, "NAND({})", rep).unwrap(),
                NaryType::Nor => writeln!(w, "NOR({})", rep).unwrap(),
                NaryType::Xor => writeln!(w, "XOR({})", rep).unwrap(),
                NaryType::Xnor => writeln!(w, "XNOR({})", rep).unwrap(),
            },
            Ternary(_, TernaryType::Maj) => {
                writeln!(w, "MAJ({})", rep).unwrap();
            }
            Buf(s) => {
                if s.is_constant() {
                    writeln!(w, "{}", sig_to_string(s)).unwrap();
                } else if s.is_inverted() {
                    writeln!(w, "NOT({})", sig_to_string(&!s)).unwrap();
                } else {
                    writeln!(w, "BUF({})", rep).unwrap();
                }
            }
        }
    }

    let signals_with_inv = get_inverted_signals(ntk);
    for s in signals_with_inv {
        writeln!(w, "{}_n = NOT({})", s, s).unwrap();
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_basic_readwrite() {
        use std::io::BufWriter;

        let example = "# .bench (ISCAS) file
INPUT(i0)
INPUT(i1)

OUTPUT(x0)
OUTPUT(x1)
OUTPUT(x2)
OUTPUT(x3)
OUTPUT(x4)
OUTPUT(x5)
OUTPUT(x6)

x0 = AND(i0, i1)
x1 = NAND(i0, i1)
x2 = OR(i0, i1)
x3 = NOR(i0, i1)
x4 = XOR(i0, i1)
x5 = BUF(i0)
x6 = NOT(i1)
x7 = NOT(x2)
x8 = gnd
x9 = vdd
x10 = XOR(  i0, i1 )
x11   =  gnd
";
        let ntk = super::read_bench(example.as_bytes()).unwrap();
        assert_eq!(ntk.nb_inputs(), 2);
        assert_eq!(ntk.nb_outputs(), 7);
        assert_eq!(ntk.nb_nodes(), 12);
        let mut buf = BufWriter::new(Vec::new());
        super::write_bench(&mut buf, &ntk);
        String::from_utf8(buf.into_inner().unwrap()).unwrap();
    }

    #[test]
    fn test_sequential_rejected() {
        let example = "INPUT(i0)
OUTPUT(x0)
x0 = DFF(i0)
";
        assert!(super::read_bench(example.as_bytes()).is_err());
    }

    #[test]
    fn test_roundtrip_maj() {
        use std::io::BufWriter;

        let mut net = crate::Network::new();
        let i0 = net.add_input();
        let i1 = net.add_input();
        let i2 = net.add_input();
        let m = net.maj(i0, i1, !i2);
        net.add_output(!m);
        let mut buf = BufWriter::new(Vec::new());
        super::write_bench(&mut buf, &net);
        let text = String::from_utf8(buf.into_inner().unwrap()).unwrap();
        let back = super::read_bench(text.as_bytes()).unwrap();
        assert_eq!(back.nb_inputs(), 3);
        assert_eq!(back.nb_outputs(), 1);
        for pattern in 0..8usize {
            let input: Vec<bool> = (0..3).map(|i| (pattern >> i) & 1 != 0).collect();
            assert_eq!(
                crate::sim::simulate_comb(&net, &input),
                crate::sim::simulate_comb(&back, &input)
            );
        }
    }
}
