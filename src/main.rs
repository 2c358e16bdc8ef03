use anyhow::{Context, Result};
use bpaf::Bpaf;
use ecs_lint::analysis::AnalysisEngine;
use ecs_lint::output::{render_json, render_text, Format};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version, fallback_to_usage)]
/// Static analyzer for ECS attribute usage
///
/// Checks #[filter]/#[messager] type arguments against the framework's
/// Component/Message markers and flags get_unique calls on components
/// not marked #[unique]. Exits 1 when any diagnostic is reported.
struct Opts {
    /// Output format [text (default), json]
    #[bpaf(short, long, argument("FORMAT"), fallback(Format::Text))]
    format: Format,

    /// Input files
    #[bpaf(positional("FILE"))]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    use bpaf::Args;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let opts = match opts().run_inner(Args::current_args()) {
        Ok(opts) => opts,
        Err(bpaf::ParseFailure::Stdout(msg, _)) => {
            print!("{}", msg);
            std::process::exit(0);
        }
        Err(bpaf::ParseFailure::Completion(c)) => {
            print!("{}", c);
            std::process::exit(0);
        }
        Err(bpaf::ParseFailure::Stderr(msg)) => {
            eprintln!("{}", msg);
            std::process::exit(1);
        }
    };

    if opts.files.is_empty() {
        anyhow::bail!("at least one input file required");
    }

    let engine = AnalysisEngine::with_default_rules();
    let mut total = 0usize;

    for path in &opts.files {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let diagnostics = engine.analyze(&source);
        total += diagnostics.len();

        let name = path.display().to_string();
        match opts.format {
            Format::Text => print!("{}", render_text(&name, &source, &diagnostics)),
            Format::Json => println!("{}", render_json(&name, &source, &diagnostics)?),
        }
    }

    if total > 0 {
        std::process::exit(1);
    }
    Ok(())
}
