// Copyright 2026 the Dispatch Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![doc = "Code generator for `dispatch_tape` opcode tables.\n\n\
          This is a std-only build tool crate. It is not shipped as part of the core crate.\n"]

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

#[derive(Deserialize, Clone)]
struct Spec {
    version: u32,
    opcodes: Vec<OpcodeSpec>,
}

#[derive(Deserialize, Clone)]
struct OpcodeSpec {
    name: String,
    mnemonic: String,
    byte: String,
    #[serde(default)]
    immediate: usize,
    stack_in: usize,
    stack_out: usize,
    #[serde(default)]
    terminator: bool,
    doc: String,
}

const MAX_IMMEDIATE: usize = 32;
const MAX_STACK_EFFECT: usize = 17;

fn parse_u8_hex(s: &str) -> Result<u8> {
    let s = s.trim();
    let raw = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u8::from_str_radix(raw, 16).with_context(|| format!("invalid opcode byte '{s}'"))
}

fn fmt_hex_u8(b: u8) -> String {
    format!("0x{b:02X}")
}

fn sort_and_validate_ops(ops: &mut [(u8, OpcodeSpec)]) -> Result<()> {
    ops.sort_by(|(b0, o0), (b1, o1)| b0.cmp(b1).then_with(|| o0.name.cmp(&o1.name)));

    for w in ops.windows(2) {
        let (b0, o0) = &w[0];
        let (b1, o1) = &w[1];
        if b0 == b1 {
            bail!(
                "duplicate opcode byte {}: {} and {}",
                fmt_hex_u8(*b0),
                o0.name,
                o1.name
            );
        }
    }
    let mut names: Vec<&str> = ops.iter().map(|(_, o)| o.name.as_str()).collect();
    names.sort_unstable();
    for w in names.windows(2) {
        if w[0] == w[1] {
            bail!("duplicate opcode name '{}'", w[0]);
        }
    }
    Ok(())
}

fn validate_shapes(ops: &[(u8, OpcodeSpec)]) -> Result<()> {
    for (b, op) in ops {
        if op.immediate > MAX_IMMEDIATE {
            bail!(
                "opcode {} ({}) has an immediate of {} bytes (max {MAX_IMMEDIATE})",
                op.name,
                fmt_hex_u8(*b),
                op.immediate
            );
        }
        if op.stack_in > MAX_STACK_EFFECT || op.stack_out > MAX_STACK_EFFECT {
            bail!("opcode {} has an implausible stack effect", op.name);
        }
        if op.mnemonic.is_empty() || op.doc.is_empty() {
            bail!("opcode {} is missing a mnemonic or doc", op.name);
        }
    }
    Ok(())
}

fn render_usize_table(
    out: &mut String,
    doc: &str,
    fn_name: &str,
    ops: &[(u8, OpcodeSpec)],
    value: impl Fn(&OpcodeSpec) -> usize,
) {
    let _ = writeln!(out, "    /// {doc}");
    out.push_str("    #[must_use]\n");
    let _ = writeln!(out, "    pub const fn {fn_name}(self) -> usize {{");
    out.push_str("        match self {\n");
    for (_, op) in ops {
        let v = value(op);
        if v != 0 {
            let _ = writeln!(out, "            Self::{} => {v},", op.name);
        }
    }
    out.push_str("            _ => 0,\n");
    out.push_str("        }\n");
    out.push_str("    }\n");
}

fn generate(spec: Spec) -> Result<String> {
    if spec.version != 1 {
        bail!("unsupported opcodes.json version {}", spec.version);
    }

    let mut ops: Vec<(u8, OpcodeSpec)> = Vec::with_capacity(spec.opcodes.len());
    for op in spec.opcodes {
        let b = parse_u8_hex(&op.byte)?;
        ops.push((b, op));
    }

    sort_and_validate_ops(&mut ops)?;
    validate_shapes(&ops)?;

    let mut out = String::new();
    out.push_str("// Copyright 2026 the Dispatch Tape Authors\n");
    out.push_str("// SPDX-License-Identifier: Apache-2.0 OR MIT\n\n");
    out.push_str("// @generated by dispatch_tape_codegen. Do not edit by hand.\n");
    out.push('\n');

    out.push_str("/// Instruction opcodes understood by the interpreter.\n");
    out.push_str("#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]\n");
    out.push_str("#[repr(u8)]\n");
    out.push_str("pub enum Opcode {\n");
    for (b, op) in &ops {
        let _ = writeln!(out, "    /// {}", op.doc);
        let _ = writeln!(out, "    {} = {},", op.name, fmt_hex_u8(*b));
    }
    out.push_str("}\n\n");

    out.push_str("impl Opcode {\n");

    out.push_str("    /// Parses an opcode from its byte value.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub const fn from_u8(b: u8) -> Option<Self> {\n");
    out.push_str("        match b {\n");
    for (b, op) in &ops {
        let _ = writeln!(out, "            {} => Some(Self::{}),", fmt_hex_u8(*b), op.name);
    }
    out.push_str("            _ => None,\n");
    out.push_str("        }\n");
    out.push_str("    }\n\n");

    out.push_str("    /// Returns the assembler mnemonic.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub const fn mnemonic(self) -> &'static str {\n");
    out.push_str("        match self {\n");
    for (_, op) in &ops {
        let _ = writeln!(out, "            Self::{} => \"{}\",", op.name, op.mnemonic);
    }
    out.push_str("        }\n");
    out.push_str("    }\n\n");

    render_usize_table(
        &mut out,
        "Returns the number of immediate bytes that follow the opcode byte.",
        "immediate_len",
        &ops,
        |op| op.immediate,
    );
    out.push('\n');
    render_usize_table(
        &mut out,
        "Returns the number of stack items the opcode consumes.",
        "stack_in",
        &ops,
        |op| op.stack_in,
    );
    out.push('\n');
    render_usize_table(
        &mut out,
        "Returns the number of stack items the opcode leaves behind.",
        "stack_out",
        &ops,
        |op| op.stack_out,
    );
    out.push('\n');

    let terminators: Vec<String> = ops
        .iter()
        .filter(|(_, op)| op.terminator)
        .map(|(_, op)| format!("Self::{}", op.name))
        .collect();
    if terminators.is_empty() {
        bail!("opcode table has no terminators");
    }
    out.push_str("    /// Returns `true` if the opcode ends a basic block.\n");
    out.push_str("    #[must_use]\n");
    out.push_str("    pub const fn is_terminator(self) -> bool {\n");
    out.push_str("        matches!(\n");
    out.push_str("            self,\n");
    let _ = writeln!(out, "            {}", terminators.join("\n                | "));
    out.push_str("        )\n");
    out.push_str("    }\n");
    out.push_str("}\n");

    Ok(out)
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let spec_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dispatch_tape/opcodes.json"));
    let out_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dispatch_tape/src/opcodes_gen.rs"));
    if args.next().is_some() {
        bail!("usage: dispatch_tape_codegen [spec.json] [opcodes_out.rs]");
    }

    let json =
        fs::read_to_string(&spec_path).with_context(|| format!("read {}", spec_path.display()))?;
    let spec: Spec =
        serde_json::from_str(&json).with_context(|| format!("parse {}", spec_path.display()))?;

    let rendered = generate(spec)?;

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&out_path, rendered.as_bytes())
        .with_context(|| format!("write {}", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{OpcodeSpec, Spec, generate};
    use std::fs;
    use std::path::PathBuf;

    fn normalize_newlines(s: &str) -> String {
        // On Windows, git autocrlf can check in generated `.rs` files with `\r\n` line endings.
        s.replace("\r\n", "\n").replace('\r', "\n")
    }

    fn op(name: &str, byte: &str) -> OpcodeSpec {
        OpcodeSpec {
            name: name.into(),
            mnemonic: name.to_uppercase(),
            byte: byte.into(),
            immediate: 0,
            stack_in: 0,
            stack_out: 0,
            terminator: true,
            doc: "Test opcode.".into(),
        }
    }

    #[test]
    fn generated_file_is_up_to_date() {
        let workspace_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let workspace_root = workspace_root.parent().expect("workspace root");

        let spec_path = workspace_root.join("dispatch_tape/opcodes.json");
        let out_path = workspace_root.join("dispatch_tape/src/opcodes_gen.rs");

        let json = fs::read_to_string(&spec_path).expect("read opcodes.json");
        let spec: Spec = serde_json::from_str(&json).expect("parse opcodes.json");
        let rendered = generate(spec).expect("render opcodes_gen.rs");
        let existing = fs::read_to_string(&out_path).expect("read opcodes_gen.rs");

        assert_eq!(
            normalize_newlines(&rendered),
            normalize_newlines(&existing),
            "opcodes_gen.rs is out of date; re-run: cargo run -p dispatch_tape_codegen"
        );
    }

    #[test]
    fn duplicate_bytes_are_rejected() {
        let spec = Spec {
            version: 1,
            opcodes: vec![op("Stop", "0x00"), op("Halt", "0x00")],
        };
        let err = generate(spec).err().expect("duplicate byte");
        assert!(err.to_string().contains("duplicate opcode byte"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let spec = Spec {
            version: 1,
            opcodes: vec![op("Stop", "0x00"), op("Stop", "0x01")],
        };
        let err = generate(spec).err().expect("duplicate name");
        assert!(err.to_string().contains("duplicate opcode name"));
    }

    #[test]
    fn oversized_immediates_are_rejected() {
        let mut big = op("Push33", "0x60");
        big.immediate = 33;
        let spec = Spec {
            version: 1,
            opcodes: vec![big],
        };
        assert!(generate(spec).is_err());
    }
}
