use anyhow::Result;
use std::io::{BufRead, Write};

use crate::retriever::RetrievalEngine;

/// Line-oriented chat front end. Each turn is independent; nothing from
/// earlier turns is remembered.
pub struct ChatSession<'a> {
    engine: &'a RetrievalEngine,
    prompt: String,
}

impl<'a> ChatSession<'a> {
    pub fn new(engine: &'a RetrievalEngine) -> Self {
        ChatSession {
            engine,
            prompt: "You: ".to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Runs until EOF or `exit`/`quit`. Returns the number of answered turns.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<usize> {
        let mut turns = 0;
        loop {
            write!(output, "{}", self.prompt)?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break; // EOF (Ctrl+D)
            }

            let query = line.trim();
            if query.is_empty() {
                continue;
            }
            if query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
                break;
            }

            let response = self.engine.get_response(query);
            writeln!(output, "Bot: {}", response)?;
            turns += 1;
        }
        Ok(turns)
    }
}
