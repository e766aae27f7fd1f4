//! Command-line arguments

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const USAGE: &str =
    "usage: region-export <snapshot-image> <output-dir> [filename.pdf] [--options <options.json>]";

/// Parsed invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub snapshot: PathBuf,
    pub output_dir: PathBuf,
    pub filename: String,
    pub options_file: Option<PathBuf>,
}

impl CliArgs {
    /// Parse arguments, excluding the program name
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut positional = Vec::new();
        let mut options_file = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--options" | "-o" => {
                    let path = args.next().context("--options needs a file path")?;
                    options_file = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => bail!("unknown flag '{}'\n{}", flag, USAGE),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let snapshot = PathBuf::from(positional.next().context(USAGE)?);
        let output_dir = PathBuf::from(positional.next().context(USAGE)?);
        let filename = match positional.next() {
            Some(name) => name,
            None => default_filename(&snapshot)?,
        };
        if let Some(extra) = positional.next() {
            bail!("unexpected argument '{}'\n{}", extra, USAGE);
        }

        Ok(Self {
            snapshot,
            output_dir,
            filename,
            options_file,
        })
    }
}

/// `<snapshot stem>.pdf`
fn default_filename(snapshot: &std::path::Path) -> Result<String> {
    let stem = snapshot
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("cannot derive a file name from {}", snapshot.display()))?;
    Ok(format!("{}.pdf", stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs> {
        CliArgs::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_minimal_arguments() {
        let args = parse(&["renders/invoice-1042.png", "out"]).unwrap();
        assert_eq!(args.snapshot, PathBuf::from("renders/invoice-1042.png"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert_eq!(args.filename, "invoice-1042.pdf");
        assert!(args.options_file.is_none());
    }

    #[test]
    fn test_explicit_filename_and_options() {
        let args = parse(&["a.png", "out", "Invoice-7.pdf", "--options", "letter.json"]).unwrap();
        assert_eq!(args.filename, "Invoice-7.pdf");
        assert_eq!(args.options_file, Some(PathBuf::from("letter.json")));
    }

    #[test]
    fn test_usage_matches_accepted_form() {
        assert!(USAGE.ends_with(
            "region-export <snapshot-image> <output-dir> [filename.pdf] [--options <options.json>]"
        ));
        let args = parse(&["shot.png", "out", "Shot.pdf", "-o", "a4.json"]).unwrap();
        assert_eq!(args.filename, "Shot.pdf");
        assert_eq!(args.options_file, Some(PathBuf::from("a4.json")));
    }

    #[test]
    fn test_missing_output_dir() {
        assert!(parse(&["a.png"]).is_err());
    }

    #[test]
    fn test_unknown_flag() {
        assert!(parse(&["a.png", "out", "--fast"]).is_err());
    }

    #[test]
    fn test_options_flag_needs_value() {
        assert!(parse(&["a.png", "out", "--options"]).is_err());
    }
}
