use std::io::{self, BufRead, Write};

use crate::eval::Interpreter;

pub const BANNER: &str = "Lispy Version 0.1\nPress Ctrl+c to Exit\n";
pub const PROMPT: &str = "Lispy> ";

/// Read-eval-print loop over any line source and sink.
pub struct Repl<R, W> {
    interpreter: Interpreter,
    history: Vec<String>,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            interpreter: Interpreter::new(),
            history: Vec::new(),
            input,
            output,
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Runs until the input is exhausted.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{BANNER}")?;
        let mut line = String::new();
        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(());
            }
            let line = line.trim_end_matches(['\n', '\r']);
            self.step(line)?;
        }
    }

    /// Handles a single line of input.
    pub fn step(&mut self, line: &str) -> io::Result<()> {
        if !line.trim().is_empty() {
            self.history.push(line.to_string());
        }

        match self.interpreter.eval_line(line) {
            Ok(value) => writeln!(self.output, "{value}"),
            Err(e) => {
                tracing::debug!(%e, "parse failed");
                writeln!(self.output, "{e:?}")
            }
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
