//! Brainfuck to C and JavaScript source translation.
//!
//! Both targets are generated from a folded [`Program`], so runs of `+`/`-`
//! and `<`/`>` become single statements and clear loops become assignments.
//! Generated programs use a tape of [`DEFAULT_MEMORY`] byte cells, and set the
//! cell to 0 when input is exhausted, like the interpreter.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::interpreter::{DEFAULT_MEMORY, InterpretError, Op, Optimization, Program};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    C,
    JavaScript,
}

impl Target {
    /// Human-readable language name.
    pub fn name(self) -> &'static str {
        match self {
            Target::C => "C",
            Target::JavaScript => "JavaScript",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TranspileError {
    #[error(transparent)]
    Parse(#[from] InterpretError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Translate Brainfuck `source` into a standalone program for `target`.
pub fn transpile(source: &str, target: Target) -> Result<String, TranspileError> {
    let program = Program::parse(source, Optimization::Folded)?;
    let code = match target {
        Target::C => to_c(&program),
        Target::JavaScript => to_js(&program),
    };
    debug!(language = target.name(), bytes = code.len(), "transpiled program");
    Ok(code)
}

/// Translate `source` and write the result to `path`, replacing any existing file.
pub fn transpile_to_file(source: &str, target: Target, path: &Path) -> Result<(), TranspileError> {
    let code = transpile(source, target)?;
    fs::write(path, code).map_err(|source| TranspileError::Write {
        path: path.to_path_buf(),
        source,
    })
}

struct Emitter {
    out: String,
    depth: usize,
}

impl Emitter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 1,
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn raw(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}

pub fn to_c(program: &Program) -> String {
    let mut e = Emitter::new();
    e.raw("#include <stdio.h>");
    e.raw("");
    e.raw("int main(void) {");
    e.line(&format!("static unsigned char array[{DEFAULT_MEMORY}];"));
    e.line("unsigned char *ptr = array;");
    e.line("int ch;");
    e.raw("");

    for instruction in program.instructions() {
        match instruction.op {
            Op::Right(1) => e.line("++ptr;"),
            Op::Right(n) => e.line(&format!("ptr += {n};")),
            Op::Left(1) => e.line("--ptr;"),
            Op::Left(n) => e.line(&format!("ptr -= {n};")),
            Op::Add(1) => e.line("++*ptr;"),
            Op::Add(n) => e.line(&format!("*ptr += {n};")),
            Op::Sub(1) => e.line("--*ptr;"),
            Op::Sub(n) => e.line(&format!("*ptr -= {n};")),
            Op::Clear => e.line("*ptr = 0;"),
            Op::Output => e.line("putchar(*ptr);"),
            Op::Input => {
                e.line("ch = getchar();");
                e.line("*ptr = ch == EOF ? 0 : (unsigned char)ch;");
            }
            Op::JumpIfZero(_) => {
                e.line("while (*ptr) {");
                e.depth += 1;
            }
            Op::JumpUnlessZero(_) => {
                e.depth -= 1;
                e.line("}");
            }
        }
    }

    e.raw("");
    e.line("return 0;");
    e.raw("}");
    e.out
}

pub fn to_js(program: &Program) -> String {
    let mut e = Emitter::new();
    e.depth = 0;
    e.line(&format!("const memory = new Uint8Array({DEFAULT_MEMORY});"));
    e.line("let pointer = 0;");
    e.line("let input = null;");
    e.line("const output = [];");
    e.raw("");
    e.line("function readInput() {");
    e.depth += 1;
    e.line("if (input === null) {");
    e.depth += 1;
    e.line("input = Array.from(require('fs').readFileSync(0));");
    e.depth -= 1;
    e.line("}");
    e.line("return input.length > 0 ? input.shift() : 0;");
    e.depth -= 1;
    e.line("}");
    e.raw("");

    for instruction in program.instructions() {
        match instruction.op {
            Op::Right(n) => e.line(&format!("pointer += {n};")),
            Op::Left(n) => e.line(&format!("pointer -= {n};")),
            Op::Add(n) => e.line(&format!("memory[pointer] += {n};")),
            Op::Sub(n) => e.line(&format!("memory[pointer] -= {n};")),
            Op::Clear => e.line("memory[pointer] = 0;"),
            Op::Output => e.line("output.push(memory[pointer]);"),
            Op::Input => e.line("memory[pointer] = readInput();"),
            Op::JumpIfZero(_) => {
                e.line("while (memory[pointer] !== 0) {");
                e.depth += 1;
            }
            Op::JumpUnlessZero(_) => {
                e.depth -= 1;
                e.line("}");
            }
        }
    }

    e.raw("");
    e.line("process.stdout.write(Buffer.from(output));");
    e.out
}
