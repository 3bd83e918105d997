//! Resolution of the spec version stamped into the generated document.
//!
//! An explicit argument always wins; otherwise the version is scraped
//! from a `Version = "<value>"` constant in a known source file. If
//! neither is available the run cannot continue.

use std::{
    fs,
    path::{Path, PathBuf},
};

use regex::Regex;
use snafu::{OptionExt, ResultExt, Snafu};

#[derive(Snafu, Debug)]
pub enum Error {
    #[snafu(display("no version provided, and failed to read {}", path.display()))]
    ReadSource {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display(
        "no version provided, and failed to glean version from {}",
        path.display()
    ))]
    NoMatch { path: PathBuf },
}

const VERSION_PATTERN: &str = r#"Version = "(.*?)""#;

pub fn resolve(arg: Option<String>, source_file: &Path) -> Result<String, Error> {
    if let Some(version) = arg {
        return Ok(version);
    }
    let contents = fs::read_to_string(source_file).context(ReadSourceSnafu { path: source_file })?;
    scrape(&contents).context(NoMatchSnafu { path: source_file })
}

fn scrape(contents: &str) -> Option<String> {
    // The pattern is a literal, so compilation cannot fail at runtime.
    let pattern = Regex::new(VERSION_PATTERN).ok()?;
    Some(pattern.captures(contents)?.get(1)?.as_str().to_owned())
}
