//! studio-gql - render a saved GQL exec response in the terminal
//!
//! Usage:
//!   studio-gql [FILE] [--raw | --plan] [--preserve-raw] [--indent N] [--lang TAG]
//!
//! FILE is a `/gql/exec` response body; omit it or pass `-` to read stdin.
//! Logging goes to stderr and is controlled by RUST_LOG (default: warn).

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use studio_gql::render::{render, Locale, RenderOptions, View};

#[derive(Parser, Debug)]
#[command(name = "studio-gql", version, about = "Render GQL query results from the graph studio console")]
struct Args {
    /// Response body file ("-" or omitted reads stdin)
    file: Option<PathBuf>,

    /// Print rows as pretty JSON instead of a table
    #[arg(long, conflicts_with = "plan")]
    raw: bool,

    /// Print the decoded execution plan
    #[arg(long)]
    plan: bool,

    /// Show typed values as their exact wire strings
    #[arg(long)]
    preserve_raw: bool,

    /// Spaces per indent level for JSON output
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Language of messages, as a tag such as "en" or "zh-CN"
    #[arg(long, value_parser = parse_lang, default_value = "en")]
    lang: Locale,
}

fn parse_lang(tag: &str) -> std::result::Result<Locale, String> {
    Locale::from_tag(tag).ok_or_else(|| format!("unsupported language '{}' (expected en or zh-CN)", tag))
}

fn read_body(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("failed to read stdin")?;
            Ok(body)
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let body = read_body(args.file.as_deref())?;
    tracing::debug!(bytes = body.len(), lang = args.lang.as_str(), "loaded response body");

    let options = RenderOptions {
        preserve_raw: args.preserve_raw,
        indent: args.indent,
        locale: args.lang,
    };
    let view = if args.plan {
        View::Plan
    } else if args.raw {
        View::Raw
    } else {
        View::Table
    };

    match render(&body, view, &options) {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(panel) => {
            println!("{}", panel);
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_tags() {
        let args = Args::try_parse_from(["studio-gql", "--lang", "zh_CN"]).unwrap();
        assert_eq!(args.lang, Locale::ZhCn);

        let args = Args::try_parse_from(["studio-gql"]).unwrap();
        assert_eq!(args.lang, Locale::En);

        assert!(Args::try_parse_from(["studio-gql", "--lang", "fr"]).is_err());
    }
}
