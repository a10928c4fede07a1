//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::path::{Path, PathBuf};

use crate::conditional::ConditionalStack;
use crate::error::{Error, Location, Result};
use crate::input::{lines, FileSystem, SourceLoader};
use crate::lexer::{self, Directive};
use crate::symbols::SymbolTable;

pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory that `#include` paths are joined onto. Empty means the current directory.
    pub include_root: PathBuf,
    /// How many `#include` directives may be nested before giving up. There is no cycle
    /// detection, a file that includes itself without a header guard runs into this limit.
    pub max_include_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include_root: PathBuf::new(),
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}

/// Flattens source files by resolving `#define`, `#undef`, `#ifdef`, `#ifndef`, `#endif` and
/// `#include` directives.
///
/// The symbol table lives as long as the preprocessor and is shared by every file it visits.
/// Conditionals on the other hand are scoped to a single file, an `#ifdef` must be closed in the
/// same file that opened it.
pub struct Preprocessor<L = FileSystem> {
    loader: L,
    config: Config,
    symbols: SymbolTable,
}

impl Preprocessor<FileSystem> {
    pub fn new(config: Config) -> Self {
        Self::with_loader(FileSystem, config)
    }
}

impl<L: SourceLoader> Preprocessor<L> {
    pub fn with_loader(loader: L, config: Config) -> Self {
        Self {
            loader,
            config,
            symbols: SymbolTable::new(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Define `symbol` before any input is processed, as if by `#define`.
    pub fn predefine(&mut self, symbol: &str) -> Result<()> {
        if !lexer::is_symbol(symbol) {
            return Err(Error::InvalidSymbol(symbol.to_owned()));
        }
        self.symbols.define(symbol);
        Ok(())
    }

    /// Read the file at `entry` and flatten it.
    pub fn flatten(&mut self, entry: impl AsRef<Path>) -> Result<String> {
        let path = entry.as_ref();
        let source = self.loader.load(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Preprocessor::flatten(): {}", path.display());
        self.process(path, &source, 0)
    }

    /// Flatten `source`, the contents of `path`, which was reached through `depth` nested
    /// includes.
    pub fn process(&mut self, path: &Path, source: &str, depth: usize) -> Result<String> {
        let mut output = String::with_capacity(source.len());
        let mut conditionals = ConditionalStack::new();

        for line in lines(source) {
            let location = || Location::new(path, line.number);
            let content = line.content();
            let directive = match lexer::scan(content) {
                Ok(directive) => directive,
                Err(reason) if conditionals.is_enabled() => {
                    return Err(Error::MalformedDirective {
                        location: location(),
                        directive: content.to_owned(),
                        reason,
                    });
                }
                // Dead branches are never parsed further, like any other suppressed line.
                Err(reason) => {
                    log::trace!("{}: ignoring disabled {content:?}: {reason}", location());
                    continue;
                }
            };

            let Some(directive) = directive else {
                if conditionals.is_enabled() {
                    output.push_str(line.text);
                }
                continue;
            };
            log::trace!("{}: {directive:?}", location());

            // Symbol table changes apply regardless of the enclosing conditionals.
            match directive {
                Directive::Define(symbol) => {
                    if !self.symbols.define(symbol) {
                        log::debug!("{}: {symbol} is already defined", location());
                    }
                }
                Directive::Undef(symbol) => {
                    if !self.symbols.undefine(symbol) {
                        return Err(Error::UnknownSymbol {
                            location: location(),
                            symbol: symbol.to_owned(),
                        });
                    }
                }
                Directive::Ifdef { symbol, negated } => {
                    let defined = self.symbols.is_defined(symbol);
                    conditionals.push(symbol, negated, defined, line.number);
                }
                Directive::Endif => {
                    if conditionals.pop().is_none() {
                        return Err(Error::UnbalancedEndif {
                            location: location(),
                        });
                    }
                }
                Directive::Include(include) => {
                    if !conditionals.is_enabled() {
                        log::trace!("{}: skipping disabled include {include}", location());
                        continue;
                    }
                    let fragment = self.include(location(), Path::new(include), depth + 1)?;
                    output.push_str(&fragment);
                    if !fragment.is_empty() && !fragment.ends_with('\n') {
                        output.push('\n');
                    }
                }
            }
        }

        if let Some(frame) = conditionals.innermost() {
            return Err(Error::UnterminatedConditional {
                location: Location::new(path, frame.line),
                keyword: frame.keyword(),
                symbol: frame.symbol.clone(),
            });
        }

        Ok(output)
    }

    fn include(&mut self, location: Location, include: &Path, depth: usize) -> Result<String> {
        if depth > self.config.max_include_depth {
            return Err(Error::IncludeDepthExceeded {
                location,
                include: include.to_path_buf(),
                max_depth: self.config.max_include_depth,
            });
        }

        let path = self.config.include_root.join(include);
        let source = self
            .loader
            .load(&path)
            .map_err(|source| Error::IncludeResolution {
                location,
                include: include.to_path_buf(),
                source,
            })?;
        log::debug!(
            "Preprocessor::include(): {} at depth {depth}",
            path.display()
        );

        self.process(&path, &source, depth)
    }
}

/// Flatten the file at `entry` with a fresh symbol table, resolving includes relative to the
/// current directory.
pub fn flatten(entry: impl AsRef<Path>) -> Result<String> {
    Preprocessor::new(Config::default()).flatten(entry)
}
