//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

pub use error::{Error, Result};
pub use preprocess::{flatten, Config, Preprocessor, DEFAULT_MAX_INCLUDE_DEPTH};

pub mod conditional;
pub mod error;
pub mod input;
pub mod lexer;
pub mod preprocess;
pub mod symbols;
#[cfg(test)]
mod test_utils;
pub mod wrap;

#[derive(Debug, clap::Parser, Clone)]
#[command(version, about)]
pub struct Args {
    /// Define `name` before the input is processed, as if by `#define name`.
    #[arg(short = 'D', long = "define", value_name = "NAME")]
    pub define: Vec<String>,
    /// Directory that `#include` paths are resolved against. Defaults to the current directory.
    #[arg(short = 'I', long, value_name = "DIR")]
    pub include_root: Option<PathBuf>,
    /// How deeply `#include` directives may nest.
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_INCLUDE_DEPTH)]
    pub max_include_depth: usize,
    /// Write a C++ header declaring the flattened text to this path instead of printing it.
    #[arg(long, value_name = "PATH", requires = "source")]
    pub header: Option<PathBuf>,
    /// Write the C++ source defining the flattened text to this path.
    #[arg(long, value_name = "PATH", requires = "header")]
    pub source: Option<PathBuf>,
    /// The file to flatten.
    pub file: PathBuf,
}

pub fn run<STDOUT: Write, STDERR: Write>(
    stdout: STDOUT,
    mut stderr: STDERR,
    args: Args,
) -> crate::error::Result<()> {
    match run_impl(stdout, args) {
        Ok(_) => Ok(()),
        Err(error) => {
            writeln!(stderr, "shaderpp: {error:#}")?;
            Err(error)
        }
    }
}

pub fn run_impl<STDOUT: Write>(mut stdout: STDOUT, args: Args) -> crate::error::Result<()> {
    let config = Config {
        include_root: args.include_root.unwrap_or_default(),
        max_include_depth: args.max_include_depth,
    };
    let mut preprocessor = Preprocessor::new(config);
    for symbol in &args.define {
        preprocessor.predefine(symbol)?;
    }

    let code = preprocessor.flatten(&args.file)?;

    match (args.header, args.source) {
        (Some(header), Some(source)) => {
            let wrapped = wrap::wrap(&args.file, &code);
            write_outputs(&[(&header, &wrapped.header), (&source, &wrapped.source)])?;
            log::info!(
                "Wrote {} and {}",
                header.display(),
                source.display()
            );
        }
        _ => {
            stdout.write_all(code.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Write every output or none of them. The contents are staged next to their destinations first
/// and only renamed into place once all of them have been written.
fn write_outputs(outputs: &[(&Path, &str)]) -> crate::error::Result<()> {
    let mut staged = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        staged.push((file, *path));
    }

    let mut persisted: Vec<&Path> = Vec::with_capacity(staged.len());
    for (file, path) in staged {
        if let Err(error) = file.persist(path) {
            for path in persisted {
                if let Err(error) = std::fs::remove_file(path) {
                    log::warn!("can't remove {}: {error}", path.display());
                }
            }
            return Err(error.error.into());
        }
        persisted.push(path);
    }
    Ok(())
}
