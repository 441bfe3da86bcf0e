use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

pub struct CalcHelper {
    commands: Vec<String>,
    functions: Vec<String>,
}

impl CalcHelper {
    pub fn new() -> Self {
        Self {
            commands: vec![
                "mode deg".to_string(),
                "mode rad".to_string(),
                "debug on".to_string(),
                "debug off".to_string(),
                "let".to_string(),
                "const".to_string(),
                "vars".to_string(),
                "frac".to_string(),
                "syntax".to_string(),
                "help".to_string(),
                "quit".to_string(),
                "exit".to_string(),
            ],
            functions: calc_engine::FUNCTIONS
                .iter()
                .map(|f| f.to_string())
                .collect(),
        }
    }
}

impl Completer for CalcHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let (start, word) = extract_word(line, pos);
        let mut matches = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(word) {
                matches.push(Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                });
            }
        }

        for func in &self.functions {
            if func.starts_with(word) {
                matches.push(Pair {
                    display: func.clone(),
                    replacement: func.clone(),
                });
            }
        }

        Ok((start, matches))
    }
}

impl Hinter for CalcHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CalcHelper {}

impl Validator for CalcHelper {}

impl Helper for CalcHelper {}

fn extract_word(line: &str, pos: usize) -> (usize, &str) {
    let line = &line[..pos];
    if line.is_empty() {
        return (0, "");
    }

    let mut start = pos;
    for (i, c) in line.char_indices().rev() {
        if c.is_whitespace() || "(,+-*/^=".contains(c) {
            break;
        }
        start = i;
    }
    (start, &line[start..pos])
}
