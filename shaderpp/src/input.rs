//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::path::Path;

/// Where source text is read from. Files are always read whole.
pub trait SourceLoader {
    fn load(&self, path: &Path) -> std::io::Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystem;

impl SourceLoader for FileSystem {
    fn load(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }
}

impl<L: SourceLoader + ?Sized> SourceLoader for &L {
    fn load(&self, path: &Path) -> std::io::Result<String> {
        (**self).load(path)
    }
}

/// A physical line of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based.
    pub number: usize,
    /// The line including its terminator, if it had one.
    pub text: &'a str,
}

impl<'a> Line<'a> {
    /// The line without its `\n` or `\r\n` terminator.
    pub fn content(&self) -> &'a str {
        match self.text.strip_suffix('\n') {
            Some(line) => line.strip_suffix('\r').unwrap_or(line),
            None => self.text,
        }
    }
}

pub fn lines(source: &str) -> impl Iterator<Item = Line<'_>> {
    source
        .split_inclusive('\n')
        .enumerate()
        .map(|(index, text)| Line {
            number: index + 1,
            text,
        })
}
