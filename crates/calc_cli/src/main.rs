mod completer;
mod config;
mod repl;

use tracing_subscriber::filter::EnvFilter;

fn main() -> rustyline::Result<()> {
    // Engine checkpoints are gated on the engine's debug flag and surface
    // at the engine target; RUST_LOG widens this to the full stage trace.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("calc_engine::engine=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    repl::Repl::new().run()
}
