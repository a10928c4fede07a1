//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::collections::HashSet;

/// The set of currently defined symbols.
///
/// A single table is shared by every file visited during one invocation, so a `#define` inside
/// an included file is visible to the files included after it and to the includer.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the symbol was already defined, which is not an error.
    pub fn define(&mut self, symbol: &str) -> bool {
        if self.symbols.contains(symbol) {
            return false;
        }
        self.symbols.insert(symbol.to_owned())
    }

    /// Returns `false` if the symbol was not defined.
    pub fn undefine(&mut self, symbol: &str) -> bool {
        self.symbols.remove(symbol)
    }

    pub fn is_defined(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    /// Defined symbols in lexical order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.symbols.iter().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}
