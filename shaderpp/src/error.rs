//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::fmt;
use std::path::PathBuf;

/// A line within a source file, used to point diagnostics at the offending directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: PathBuf,
    /// 1-based line number.
    pub line: usize,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{location}: can't undefine symbol \"{symbol}\" which is not defined")]
    UnknownSymbol { location: Location, symbol: String },
    #[error("{location}: #endif without a matching #ifdef or #ifndef")]
    UnbalancedEndif { location: Location },
    #[error("{location}: #{keyword} {symbol} is not terminated by #endif")]
    UnterminatedConditional {
        location: Location,
        keyword: &'static str,
        symbol: String,
    },
    #[error("{location}: can't include \"{}\": {source}", include.display())]
    IncludeResolution {
        location: Location,
        include: PathBuf,
        source: std::io::Error,
    },
    #[error("{location}: malformed directive {directive:?}: {reason}")]
    MalformedDirective {
        location: Location,
        directive: String,
        reason: String,
    },
    #[error("{location}: including \"{}\" exceeds the maximum include depth of {max_depth}", include.display())]
    IncludeDepthExceeded {
        location: Location,
        include: PathBuf,
        max_depth: usize,
    },
    #[error("can't open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid symbol name {0:?}")]
    InvalidSymbol(String),
    #[error("can't write output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait GetExitCode {
    fn get_exit_code(&self) -> i32;
}

impl<T> GetExitCode for Result<T> {
    fn get_exit_code(&self) -> i32 {
        match self {
            Ok(_) => 0,
            Err(_) => 1,
        }
    }
}
