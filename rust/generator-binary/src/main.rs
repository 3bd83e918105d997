use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use snafu::{Report, ResultExt, Snafu};
use tracing_subscriber::EnvFilter;

mod crd;
mod openapi;
mod version;

const API_TITLE: &str = "custom resources api";
const API_DESCRIPTION: &str = "crd2openapi generated openapi v3 spec";

#[derive(clap::Parser)]
#[clap(about, author)]
struct Opts {
    /// Version stamped into the document info block. When omitted, the
    /// version is scraped from the file given by --version-source.
    version: Option<String>,

    /// Directory containing the CRD manifests (*.yaml).
    #[clap(long, default_value = "assets/crd")]
    crd_dir: PathBuf,

    /// Path the generated document is written to.
    #[clap(long, default_value = "generated/openapi/openapi.json")]
    out: PathBuf,

    /// Source file scanned for a `Version = "<value>"` constant when no
    /// version argument is given.
    #[clap(long, default_value = "constants/common.go")]
    version_source: PathBuf,
}

#[derive(Snafu, Debug)]
enum Error {
    #[snafu(display("cannot determine spec version, cannot continue"))]
    ResolveVersion { source: version::Error },

    #[snafu(display("failed to create output directory {}", path.display()))]
    CreateOutDir {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("failed to serialize the spec"))]
    SerializeSpec { source: serde_json::Error },

    #[snafu(display("failed to write spec to {}", path.display()))]
    WriteSpec {
        source: std::io::Error,
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .init();

    match run(Opts::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{}", Report::from_error(err));
            ExitCode::FAILURE
        }
    }
}

fn run(opts: Opts) -> Result<(), Error> {
    let spec_version =
        version::resolve(opts.version, &opts.version_source).context(ResolveVersionSnafu)?;
    let mut document = openapi::Document::new(API_TITLE, API_DESCRIPTION, &spec_version);

    // One linear pass; every version checks the keys registered by the
    // files before it.
    let files = crd::discover(&opts.crd_dir);
    let mut processed = 0usize;
    for path in &files {
        let crd = match crd::load(path) {
            Ok(crd) => crd,
            Err(err) => {
                tracing::warn!(file = %path.display(), %err, "skipping unreadable CRD file");
                continue;
            }
        };
        let resource = match crd.descriptor() {
            Ok(resource) => resource,
            Err(err) => {
                tracing::warn!(file = %path.display(), %err, "skipping CRD file");
                continue;
            }
        };
        for crd_version in &crd.spec.versions {
            if let Err(err) = document.add_resource_version(&resource, crd_version) {
                tracing::warn!(file = %path.display(), %err, "skipping version");
            }
        }
        processed += 1;
    }

    if let Some(parent) = opts.out.parent() {
        fs::create_dir_all(parent).context(CreateOutDirSnafu { path: parent })?;
    }
    let rendered = document.to_json_pretty().context(SerializeSpecSnafu)?;
    fs::write(&opts.out, rendered).context(WriteSpecSnafu { path: &opts.out })?;

    tracing::info!(
        files = files.len(),
        processed,
        schemas = document.schema_count(),
        paths = document.path_count(),
        out = %opts.out.display(),
        "wrote openapi spec"
    );
    Ok(())
}
