//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Wrapping flattened shader text into a C++ header and source pair.
//!
//! The header declares an accessor `<namespace>::Code()`, the source defines the text as a raw
//! string literal. The generated names are derived from the entry file path, plus a digest of the
//! path and text so that two builds of different text never link against each other.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Number of hex digits of the digest that end up in generated names.
pub const HASH_LENGTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    pub header: String,
    pub source: String,
}

/// Replace everything that can't appear in a C++ identifier.
fn sanitize(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if sanitized.is_empty() || sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    sanitized
}

/// `shaders/blur.frag` becomes `SHADERS_BLUR_FRAG_H_`.
pub fn guard_symbol(path: &Path) -> String {
    format!(
        "{}_H_",
        sanitize(&path.to_string_lossy()).to_ascii_uppercase()
    )
}

/// `shaders/blur.frag` becomes `blur_frag`.
pub fn namespace(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    sanitize(&name).to_ascii_lowercase()
}

pub fn content_hash(path: &Path, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    hasher.update(text.as_bytes());
    let mut hash = format!("{:x}", hasher.finalize());
    hash.truncate(HASH_LENGTH);
    hash
}

pub fn render_header(guard_symbol: &str, namespace: &str, hash: &str) -> String {
    format!(
        r#"#ifndef {guard_symbol}
#define {guard_symbol}

namespace {namespace} {{

extern const char* __kCode_{hash};

inline const char* Code() {{
  return __kCode_{hash};
}}

}}

#endif // {guard_symbol}
"#
    )
}

pub fn render_source(namespace: &str, code: &str, hash: &str) -> String {
    format!(
        r#"namespace {namespace} {{

const char* __kCode_{hash} = R"(
{code}
)";

}}
"#
    )
}

/// Wrap the flattened `code` of the file at `path`.
pub fn wrap(path: &Path, code: &str) -> Wrapped {
    let guard_symbol = guard_symbol(path);
    let namespace = namespace(path);
    let hash = content_hash(path, code);
    log::debug!("wrap(): {} as {namespace}::Code() ({hash})", path.display());

    Wrapped {
        header: render_header(&guard_symbol, &namespace, &hash),
        source: render_source(&namespace, code, &hash),
    }
}
