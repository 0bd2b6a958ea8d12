//! `lilc unpack` command implementation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::Args;
use lilc_config::{CliSettings, Config};
use lilc_shader::{ContainerUnpacker, PipelineKind, UnpackResult};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the unpack command.
#[derive(Args)]
pub(crate) struct UnpackArgs {
    /// Path to the `.lilcontainer` file.
    container: PathBuf,

    /// Write the shader to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target render pipeline: brp, urp or hdrp (overrides config).
    #[arg(short, long)]
    pipeline: Option<PipelineKind>,

    /// Pipeline package major version (overrides config).
    #[arg(long)]
    major: Option<u32>,

    /// Pipeline package minor version (overrides config).
    #[arg(long)]
    minor: Option<u32>,

    /// Root of the built-in blocks (overrides config).
    #[arg(long)]
    resources_dir: Option<PathBuf>,

    /// Indentation of generated directive lines (overrides config).
    #[arg(long)]
    indent: Option<usize>,

    /// List every file the shader was assembled from.
    #[arg(long)]
    deps: bool,

    /// Path to configuration file (default: auto-discover lilc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl UnpackArgs {
    /// Execute the unpack command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the container cannot be read
    /// or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            pipeline: self.pipeline,
            major: self.major,
            minor: self.minor,
            resources_dir: self.resources_dir.clone(),
            indent: self.indent,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        tracing::info!(
            container = %self.container.display(),
            version = %config.version(),
            "Unpacking container"
        );

        let result = ContainerUnpacker::with_config(config.unpacker_config())
            .unpack(&self.container)?;

        report(&output, &result, self.deps);
        write_shader(&result.shader, self.output.as_deref())?;

        if let Some(path) = &self.output {
            output.success(&format!("Shader written to {}", path.display()));
        }
        Ok(())
    }
}

fn report(output: &Output, result: &UnpackResult, deps: bool) {
    for warning in &result.warnings {
        output.warning(warning);
    }
    if deps {
        output.info("Dependencies:");
        for path in &result.dependencies {
            output.item(&path.display().to_string());
        }
    }
}

/// Write the shader to `path`, or stdout when no path is given.
fn write_shader(shader: &str, path: Option<&Path>) -> io::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, shader)
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(shader.as_bytes())?;
            stdout.flush()
        }
    }
}
