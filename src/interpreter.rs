//! A small Brainfuck interpreter.
//!
//! Source is first parsed into a [`Program`], then executed by an
//! [`Interpreter`] over a tape of byte cells (30,000 by default).
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; cells wrap on overflow and underflow.
//! - Strict pointer bounds: moving left of cell 0 or right past the end
//!   returns an error.
//! - Input `,` reads a single byte; on EOF the current cell is set to 0.
//! - Output `.` writes the byte at the current cell (no newline).
//! - Characters outside `><+-.,[]` are comments and are skipped.
//! - Unmatched brackets are reported before anything runs.
//!
//! With [`Optimization::Folded`] (the default), runs of `+`, `-`, `<`, `>` are
//! merged into one instruction and `[-]`/`[+]` become a single clear.
//! [`Optimization::Raw`] keeps one instruction per source character.
//!
//! ```
//! use bf_tools::interpreter::execute;
//!
//! let out = execute("++++++++[>++++++++<-]>+.+.", b"").unwrap();
//! assert_eq!(out, b"AB");
//! ```

use std::fmt;
use std::io::{self, Read, Write};

use tracing::debug;

use crate::cleaner::is_instruction;

/// Tape length used by [`Interpreter::new`].
pub const DEFAULT_MEMORY: usize = 30_000;

/// Errors that can occur while parsing or running Brainfuck code.
///
/// `ip` is the character index of the offending instruction in the source.
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("Parse error: unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBrackets { ip: usize, kind: UnmatchedBracketKind },

    /// The data pointer attempted to move left of cell 0 or beyond the last cell.
    #[error("Runtime error: pointer out of bounds at instruction {ip} (ptr={ptr}, op='{op}')")]
    PointerOutOfBounds { ip: usize, ptr: usize, op: char },

    /// Reading input or writing output failed.
    #[error("I/O error at instruction {ip}: {source}")]
    IoError {
        ip: usize,
        #[source]
        source: io::Error,
    },
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// How much the parser rewrites the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Optimization {
    /// One instruction per source character.
    Raw,
    /// Fold repeated `+-<>` and turn `[-]`/`[+]` into [`Op::Clear`].
    #[default]
    Folded,
}

/// A parsed instruction. Jump targets index into [`Program::instructions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Right(usize),
    Left(usize),
    Add(u8),
    Sub(u8),
    Clear,
    Output,
    Input,
    /// `[`: jump to the matching `]` when the cell is zero.
    JumpIfZero(usize),
    /// `]`: jump back to the matching `[` when the cell is non-zero.
    JumpUnlessZero(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    /// Character index of the instruction in the source.
    pub ip: usize,
}

/// Brainfuck source parsed into instructions with resolved jumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn parse(source: &str, optimization: Optimization) -> Result<Self, InterpretError> {
        let code: Vec<(usize, char)> = source
            .chars()
            .enumerate()
            .filter(|&(_, c)| is_instruction(c))
            .collect();

        let mut instructions: Vec<Instruction> = Vec::with_capacity(code.len());
        // Open brackets waiting for their match: (instruction index, source ip).
        let mut open: Vec<(usize, usize)> = Vec::new();
        let folded = optimization == Optimization::Folded;
        let mut i = 0;

        while i < code.len() {
            let (ip, ch) = code[i];
            let op = match ch {
                '+' | '-' | '<' | '>' => {
                    let run = if folded {
                        code[i..].iter().take_while(|&&(_, c)| c == ch).count()
                    } else {
                        1
                    };
                    i += run;
                    instructions.push(Instruction { op: fold(ch, run), ip });
                    continue;
                }
                '[' if folded && is_clear_loop(&code[i..]) => {
                    i += 3;
                    instructions.push(Instruction { op: Op::Clear, ip });
                    continue;
                }
                '[' => {
                    open.push((instructions.len(), ip));
                    Op::JumpIfZero(usize::MAX)
                }
                ']' => {
                    let Some((start, _)) = open.pop() else {
                        return Err(InterpretError::UnmatchedBrackets {
                            ip,
                            kind: UnmatchedBracketKind::Close,
                        });
                    };
                    instructions[start].op = Op::JumpIfZero(instructions.len());
                    Op::JumpUnlessZero(start)
                }
                '.' => Op::Output,
                _ => Op::Input,
            };
            instructions.push(Instruction { op, ip });
            i += 1;
        }

        if let Some(&(_, ip)) = open.last() {
            return Err(InterpretError::UnmatchedBrackets {
                ip,
                kind: UnmatchedBracketKind::Open,
            });
        }

        debug!(
            source_chars = code.len(),
            instructions = instructions.len(),
            ?optimization,
            "parsed program"
        );
        Ok(Self { instructions })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

fn fold(ch: char, run: usize) -> Op {
    // Cells are bytes, so only the count modulo 256 matters for +/-.
    let delta = (run % 256) as u8;
    match ch {
        '+' => Op::Add(delta),
        '-' => Op::Sub(delta),
        '<' => Op::Left(run),
        _ => Op::Right(run),
    }
}

fn is_clear_loop(code: &[(usize, char)]) -> bool {
    matches!(code, [(_, '['), (_, '-' | '+'), (_, ']'), ..])
}

/// Executes a [`Program`] against a byte tape.
pub struct Interpreter {
    memory: Vec<u8>,
    pointer: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter with a zeroed tape of [`DEFAULT_MEMORY`] cells.
    pub fn new() -> Self {
        Self::with_memory(DEFAULT_MEMORY)
    }

    pub fn with_memory(memory_size: usize) -> Self {
        Self {
            memory: vec![0; memory_size.max(1)],
            pointer: 0,
        }
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Run `program` to completion, reading `,` from `input` and writing `.`
    /// to `output`. Output is flushed before returning, including on error.
    pub fn run<R: Read, W: Write>(
        &mut self,
        program: &Program,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), InterpretError> {
        let result = self.execute(program, input, output);
        let flushed = output
            .flush()
            .map_err(|source| InterpretError::IoError { ip: 0, source });
        result.and(flushed)
    }

    fn execute<R: Read, W: Write>(
        &mut self,
        program: &Program,
        input: &mut R,
        output: &mut W,
    ) -> Result<(), InterpretError> {
        let code = program.instructions();
        let mut pc = 0;

        while pc < code.len() {
            let Instruction { op, ip } = code[pc];
            match op {
                Op::Right(n) => {
                    self.pointer = self
                        .pointer
                        .checked_add(n)
                        .filter(|&p| p < self.memory.len())
                        .ok_or(InterpretError::PointerOutOfBounds {
                            ip,
                            ptr: self.pointer,
                            op: '>',
                        })?;
                }
                Op::Left(n) => {
                    self.pointer = self.pointer.checked_sub(n).ok_or(
                        InterpretError::PointerOutOfBounds {
                            ip,
                            ptr: self.pointer,
                            op: '<',
                        },
                    )?;
                }
                Op::Add(n) => {
                    self.memory[self.pointer] = self.memory[self.pointer].wrapping_add(n);
                }
                Op::Sub(n) => {
                    self.memory[self.pointer] = self.memory[self.pointer].wrapping_sub(n);
                }
                Op::Clear => self.memory[self.pointer] = 0,
                Op::Output => {
                    output
                        .write_all(&[self.memory[self.pointer]])
                        .map_err(|source| InterpretError::IoError { ip, source })?;
                }
                Op::Input => {
                    let mut buf = [0u8; 1];
                    self.memory[self.pointer] = match input.read(&mut buf) {
                        // EOF: common BF behavior is to set cell to 0
                        Ok(0) => 0,
                        Ok(_) => buf[0],
                        Err(source) => return Err(InterpretError::IoError { ip, source }),
                    };
                }
                Op::JumpIfZero(target) if self.memory[self.pointer] == 0 => pc = target,
                Op::JumpUnlessZero(target) if self.memory[self.pointer] != 0 => pc = target,
                Op::JumpIfZero(_) | Op::JumpUnlessZero(_) => {}
            }
            pc += 1;
        }

        Ok(())
    }
}

/// Parse `source` with folding, run it on a fresh tape fed from `input`, and
/// return everything it printed.
pub fn execute(source: &str, input: &[u8]) -> Result<Vec<u8>, InterpretError> {
    let program = Program::parse(source, Optimization::Folded)?;
    let mut output = Vec::new();
    Interpreter::new().run(&program, &mut &input[..], &mut output)?;
    Ok(output)
}
