use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, DirectoryScanner, ScanReport};
use crate::cli::args::{Cli, Commands, ConfigCommands, DirArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::Tree;
use crate::util::path::expand_path;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Dir(args)) => _dir(args),
        Some(Commands::Demo) => _demo(),
        Some(Commands::Config { command }) => _config(command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Err(CliError::Usage(
            "no command given, run with --help for usage".to_string(),
        )),
    }
}

#[instrument(skip(args), fields(paths = args.paths.len()))]
fn _dir(args: &DirArgs) -> CliResult<()> {
    // Scan and render in parallel, print in argument order.
    let listings: Vec<CliResult<(String, ScanReport)>> = args
        .paths
        .par_iter()
        .map(|path| {
            let report = scan_path(path, args)?;
            Ok((report.tree.render(), report))
        })
        .collect();

    for (idx, listing) in listings.into_iter().enumerate() {
        let (text, report) = listing?;
        if idx > 0 {
            output::info("");
        }
        output::raw(&text);
        if report.errors > 0 {
            output::warning(&format!(
                "{} entr{} could not be read",
                report.errors,
                if report.errors == 1 { "y" } else { "ies" }
            ));
        }
        if !args.noreport {
            output::info("");
            output::info(&report.summary());
        }
    }
    Ok(())
}

fn scan_path(path: &Path, args: &DirArgs) -> CliResult<ScanReport> {
    let path = expand_path(path);
    let local_dir = path.is_dir().then_some(path.as_path());
    let settings = apply_dir_args(Settings::load(local_dir)?, args);
    debug!(path = %path.display(), ?settings, "effective settings");

    let scanner = DirectoryScanner::new(settings.scan_options())?;
    Ok(scanner.scan(&path)?)
}

/// Layer command line flags over loaded settings.
///
/// Boolean flags can only switch a behavior on; `--exclude` patterns are
/// added to the configured ones.
pub fn apply_dir_args(mut settings: Settings, args: &DirArgs) -> Settings {
    settings.show_hidden |= args.all;
    settings.dirs_first |= args.dirs_first;
    settings.follow_links |= args.follow_links;
    settings.classify |= args.classify;
    if let Some(depth) = args.max_depth {
        settings.max_depth = Some(depth);
    }
    if let Some(sort) = args.sort {
        settings.sort = sort;
    }
    if let Some(policy) = args.on_error {
        settings.on_error = policy;
    }
    if !args.exclude.is_empty() {
        settings.exclude = Settings::merge_array(&settings.exclude, &args.exclude);
    }
    settings
}

#[instrument]
fn _demo() -> CliResult<()> {
    output::raw(&demo_tree());
    Ok(())
}

/// Sample discography with nesting and multi-line labels.
pub fn demo_tree() -> Tree {
    let mut artist = Tree::new("Pantera");
    let album = artist.add_child(
        "Far Beyond Driven\nsee https://en.wikipedia.org/wiki/Pantera\n(1994)",
    );
    album
        .add_child("5 minutes Alone")
        .add_child("song by American\ngroove metal");
    album.add_child("I’m Broken");
    album.add_child("Good Friends and a Bottle of Pills");

    artist.add_child("Power Metal\n(1988)");
    artist.add_child("Cowboys from Hell\n(1990)");
    artist
}

#[instrument]
fn _config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show { dir } => {
            let dir = dir.as_deref().map(expand_path);
            let settings = Settings::load(dir.as_deref())?;
            output::raw(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let path = global_config_path().ok_or_else(|| ApplicationError::Config {
                message: "cannot determine config directory".to_string(),
            })?;
            output::info(&path.display());
        }
        ConfigCommands::Template => output::raw(&Settings::template()),
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ErrorPolicy, SortOrder};

    #[test]
    fn given_demo_tree_when_rendered_then_matches_sample_output() {
        let expected = "\
Pantera
├── Far Beyond Driven
│   see https://en.wikipedia.org/wiki/Pantera
│   (1994)
│   ├── 5 minutes Alone
│   │   └── song by American
│   │       groove metal
│   ├── I’m Broken
│   └── Good Friends and a Bottle of Pills
├── Power Metal
│   (1988)
└── Cowboys from Hell
    (1990)
";
        assert_eq!(demo_tree().render(), expected);
    }

    #[test]
    fn given_flags_when_apply_dir_args_then_override_settings() {
        let settings = Settings {
            exclude: vec!["^target$".to_string()],
            max_depth: Some(5),
            ..Default::default()
        };
        let args = DirArgs {
            all: true,
            max_depth: Some(1),
            sort: Some(SortOrder::Unsorted),
            exclude: vec!["^dist$".to_string()],
            on_error: Some(ErrorPolicy::Fail),
            ..Default::default()
        };

        let result = apply_dir_args(settings, &args);

        assert!(result.show_hidden);
        assert_eq!(result.max_depth, Some(1));
        assert_eq!(result.sort, SortOrder::Unsorted);
        assert_eq!(result.on_error, ErrorPolicy::Fail);
        assert_eq!(result.exclude, vec!["^dist$".to_string(), "^target$".to_string()]);
    }

    #[test]
    fn given_no_flags_when_apply_dir_args_then_settings_unchanged() {
        let settings = Settings {
            dirs_first: true,
            classify: true,
            ..Default::default()
        };
        let result = apply_dir_args(settings.clone(), &DirArgs::default());
        assert_eq!(result, settings);
    }
}
