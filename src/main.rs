use std::process;

use boxtree::cli::args::Cli;
use boxtree::cli::commands::execute_command;
use boxtree::cli::output;
use boxtree::exitcode;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let code = match execute_command(&cli) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            output::error(&e);
            e.exit_code()
        }
    };
    process::exit(code);
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Logs go to stderr so stdout carries only the rendered trees.
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxtree::util::testing;
    use tracing::info;

    #[ctor::ctor]
    fn init() {
        testing::init_test_setup();
    }

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
        info!("Debug mode: info");
    }

    #[test]
    fn given_dir_flags_when_parsed_then_populates_args() {
        use boxtree::cli::Commands;

        let cli = Cli::try_parse_from([
            "boxtree", "-dd", "dir", "-a", "-L", "2", "-I", "^target$", "src",
        ])
        .expect("parse");
        assert_eq!(cli.debug, 2);
        let Some(Commands::Dir(args)) = cli.command else {
            panic!("expected dir command");
        };
        assert!(args.all);
        assert_eq!(args.max_depth, Some(2));
        assert_eq!(args.exclude, vec!["^target$".to_string()]);
        assert_eq!(args.paths, vec![std::path::PathBuf::from("src")]);
    }

    #[test]
    fn given_dir_without_paths_when_parsed_then_defaults_to_cwd() {
        use boxtree::cli::Commands;

        let cli = Cli::try_parse_from(["boxtree", "dir"]).expect("parse");
        let Some(Commands::Dir(args)) = cli.command else {
            panic!("expected dir command");
        };
        assert_eq!(args.paths, vec![std::path::PathBuf::from(".")]);
    }
}
