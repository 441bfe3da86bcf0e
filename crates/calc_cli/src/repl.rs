use std::collections::HashMap;

use calc_engine::Engine;
use rustyline::error::ReadlineError;

use crate::completer::CalcHelper;
use crate::config::CalcConfig;

pub struct Repl {
    engine: Engine,
    vars: HashMap<String, f64>,
    config: CalcConfig,
}

impl Repl {
    pub fn new() -> Self {
        let config = CalcConfig::load();
        let mut engine = Engine::new();
        engine.radians = config.radians;
        engine.debug = config.debug;
        Self {
            engine,
            vars: HashMap::new(),
            config,
        }
    }

    fn build_prompt(&self) -> String {
        let mode = if self.engine.radians { "rad" } else { "deg" };
        if self.engine.debug {
            format!("[{mode}][dbg] > ")
        } else {
            format!("[{mode}] > ")
        }
    }

    pub fn run(&mut self) -> rustyline::Result<()> {
        println!("calc — arithmetic expression evaluator");
        println!("Enter an expression (e.g. '2(3+4)', 'sin(90)', '√9'), or 'help'.");

        let helper = CalcHelper::new();
        let config = rustyline::Config::builder()
            .max_history_size(100)?
            .completion_type(rustyline::CompletionType::List)
            .build();
        let mut rl = rustyline::Editor::<CalcHelper, rustyline::history::DefaultHistory>::with_config(
            config,
        )?;
        rl.set_helper(Some(helper));

        let history_path = dirs::home_dir()
            .map(|p| p.join(".calc_history"))
            .unwrap_or_else(|| std::path::PathBuf::from(".calc_history"));
        let _ = rl.load_history(&history_path);

        loop {
            let prompt = self.build_prompt();
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line)?;

                    if line == "quit" || line == "exit" {
                        break;
                    }
                    self.handle_line(line);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("Error: {:?}", err);
                    break;
                }
            }
        }

        let _ = rl.save_history(&history_path);
        Ok(())
    }

    fn handle_line(&mut self, line: &str) {
        if line == "help" {
            self.print_help();
            return;
        }

        if line == "mode" {
            println!("mode: {}", if self.engine.radians { "rad" } else { "deg" });
            return;
        }
        if let Some(rest) = line.strip_prefix("mode ") {
            match rest.trim() {
                "deg" => self.set_mode(false),
                "rad" => self.set_mode(true),
                other => println!("Unknown mode '{}'; use 'deg' or 'rad'.", other),
            }
            return;
        }

        if line == "debug" {
            println!("debug: {}", if self.engine.debug { "on" } else { "off" });
            return;
        }
        if let Some(rest) = line.strip_prefix("debug ") {
            match rest.trim() {
                "on" => self.set_debug(true),
                "off" => self.set_debug(false),
                other => println!("Unknown debug setting '{}'; use 'on' or 'off'.", other),
            }
            return;
        }

        if let Some(rest) = line.strip_prefix("let ") {
            self.define_binding(rest, false);
            return;
        }
        if let Some(rest) = line.strip_prefix("const ") {
            self.define_binding(rest, true);
            return;
        }

        if line == "vars" {
            if self.vars.is_empty() {
                println!("No variables defined.");
                return;
            }
            let mut names: Vec<_> = self.vars.iter().collect();
            names.sort_by(|a, b| a.0.cmp(b.0));
            for (name, value) in names {
                println!("{} = {}", name, calc_math::format_number(*value));
            }
            return;
        }

        if let Some(rest) = line.strip_prefix("frac ") {
            match self.engine.solve_with(rest.trim(), &self.vars) {
                Some(value) => {
                    let fraction = calc_math::fractionate(value);
                    println!("{} ≈ {}/{}", value, fraction.numer(), fraction.denom());
                }
                None => self.print_last_error(),
            }
            return;
        }

        if let Some(rest) = line.strip_prefix("syntax ") {
            if self.engine.check_syntax(rest.trim()) {
                println!("ok: {}", self.engine.expression().unwrap_or_default());
            } else {
                self.print_last_error();
            }
            return;
        }

        match self.engine.solve_with(line, &self.vars) {
            Some(value) => println!("= {}", calc_math::format_number(value)),
            None => self.print_last_error(),
        }
    }

    /// `let x = 2+3` or `let x 5`; const additionally registers the name
    /// with the engine so the normalizer substitutes it.
    fn define_binding(&mut self, rest: &str, constant: bool) {
        let rest = rest.trim();
        let (name, value_text) = match rest.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => match rest.split_once(' ') {
                Some((name, value)) => (name.trim(), value.trim()),
                None => {
                    println!("Usage: {} <name> = <expression>", if constant { "const" } else { "let" });
                    return;
                }
            },
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
            println!("Variable names must be letters only, got '{}'.", name);
            return;
        }

        match self.engine.solve_with(value_text, &self.vars) {
            Some(value) => {
                if constant {
                    self.engine.define_constant(name, value);
                } else {
                    self.vars.insert(name.to_string(), value);
                }
                println!("{} = {}", name, calc_math::format_number(value));
            }
            None => self.print_last_error(),
        }
    }

    fn set_mode(&mut self, radians: bool) {
        self.engine.radians = radians;
        self.config.radians = radians;
        let _ = self.config.save();
        println!("mode: {}", if radians { "rad" } else { "deg" });
    }

    fn set_debug(&mut self, debug: bool) {
        self.engine.debug = debug;
        self.config.debug = debug;
        let _ = self.config.save();
        println!("debug: {}", if debug { "on" } else { "off" });
    }

    fn print_last_error(&self) {
        match self.engine.last_error() {
            Some(err) => println!("Error: {}", err),
            None => println!("Error: evaluation failed"),
        }
    }

    fn print_help(&self) {
        println!("Evaluate an expression by typing it, e.g.:");
        println!("  2+3*4        √9       ∛-8      5²");
        println!("  sin(90)      log(100) fact(5)  2pi");
        println!("  1.5E2+1      2(3+4)   sin{{-1}}(1)");
        println!();
        println!("Commands:");
        println!("  mode deg|rad     angle unit for trig functions");
        println!("  debug on|off     engine checkpoint events");
        println!("  let x = <exp>    define a call variable");
        println!("  const g = <exp>  register a constant with the engine");
        println!("  vars             list call variables");
        println!("  frac <exp>       approximate the result as a fraction");
        println!("  syntax <exp>     check syntax and show the canonical form");
        println!("  quit             leave");
    }
}
