use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use esdata_errors::{ConsoleSink, StringSink};
use esdata_parse::DataFile;
use esdata_tree::quote_token;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Inspect Endless Sky style data files")]
enum Options {
    /// Parse files and print their diagnostics.
    Check {
        #[arg(required = true)]
        paths: Vec<Utf8PathBuf>,
        /// Only set the exit status.
        #[arg(long, short)]
        quiet: bool,
    },
    /// Print the node tree of a file.
    Dump {
        path: Utf8PathBuf,
        /// One node per line, without nesting.
        #[arg(long)]
        flat: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match Options::parse() {
        Options::Check { paths, quiet } => check(&paths, quiet),
        Options::Dump { path, flat } => dump(&path, flat),
    }
}

fn check(paths: &[Utf8PathBuf], quiet: bool) -> anyhow::Result<ExitCode> {
    let failed = check_files(paths, quiet);

    if failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        if !quiet {
            eprintln!("{failed} of {} files reported problems", paths.len());
        }
        Ok(ExitCode::FAILURE)
    }
}

/// Checks every path and returns how many failed to read or reported diagnostics.
fn check_files(paths: &[Utf8PathBuf], quiet: bool) -> usize {
    let mut failed = 0;

    for path in paths {
        let diagnostics = match diagnostics(path) {
            Ok(diagnostics) => diagnostics,
            Err(error) => {
                tracing::warn!(%path, "skipped unreadable file");
                if !quiet {
                    eprintln!("error: {error:#}");
                }
                failed += 1;
                continue;
            }
        };
        if diagnostics.is_empty() {
            continue;
        }

        failed += 1;
        if !quiet {
            println!("{path}:");
            print!("{diagnostics}");
        }
    }

    failed
}

fn diagnostics(path: &Utf8Path) -> anyhow::Result<String> {
    let sink = Arc::new(StringSink::new());
    let file = DataFile::open(path, sink.clone())
        .with_context(|| format!("cannot check `{path}`"))?;
    sink.stop_logging();

    tracing::info!(%path, nodes = file.tree().len() - 1, "checked");
    Ok(sink.contents())
}

fn dump(path: &Utf8Path, flat: bool) -> anyhow::Result<ExitCode> {
    let file = DataFile::open(path, Arc::new(ConsoleSink::stderr()))
        .with_context(|| format!("cannot dump `{path}`"))?;
    let tree = file.tree();

    if !flat {
        print!("{}", tree.dump(tree.root()));
        return Ok(ExitCode::SUCCESS);
    }

    for node in tree.get(tree.root()).children_flattened() {
        let tokens = node.tokens().iter().map(|token| quote_token(token)).collect::<Vec<_>>();
        match node.first_line() {
            Some(line) => println!("{line}\t{}", tokens.join(" ")),
            None => println!("?\t{}", tokens.join(" ")),
        }
    }
    Ok(ExitCode::SUCCESS)
}
