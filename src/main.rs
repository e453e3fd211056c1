use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use orgtree::cli::{execute_command, output, Cli};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    match execute_command(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::error(&e);
            std::process::exit(e.exit_code());
        }
    }
}

/// `-d` count to log level; anything past `-ddd` stays at trace.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Log to stderr so report output on stdout stays clean.
fn setup_logging(verbosity: u8) {
    let level = level_for(verbosity);

    // Dependencies only surface warnings and errors.
    let crate_only = filter_fn(|metadata| {
        metadata.target().starts_with("orgtree") || *metadata.level() <= tracing::Level::WARN
    });

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(level)
        .with_filter(crate_only);

    tracing_subscriber::registry().with(layer).init();
    tracing::debug!(%level, "logging initialised");
}
