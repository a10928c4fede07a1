//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::input::SourceLoader;

/// An in-memory file tree which remembers every path it was asked to load.
#[derive(Default)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
    loaded: RefCell<Vec<PathBuf>>,
}

impl MemoryLoader {
    pub fn new<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(path, contents)| (PathBuf::from(path), contents.to_owned()))
                .collect(),
            loaded: RefCell::default(),
        }
    }

    pub fn loaded(&self) -> Vec<PathBuf> {
        self.loaded.borrow().clone()
    }
}

impl SourceLoader for MemoryLoader {
    fn load(&self, path: &Path) -> std::io::Result<String> {
        self.loaded.borrow_mut().push(path.to_path_buf());
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }
}
