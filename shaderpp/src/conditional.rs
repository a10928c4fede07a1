//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

/// One open `#ifdef` or `#ifndef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub symbol: String,
    pub negated: bool,
    /// Whether the condition held when the frame was pushed.
    pub active: bool,
    /// Line of the opening directive.
    pub line: usize,
}

impl Frame {
    pub fn keyword(&self) -> &'static str {
        if self.negated {
            "ifndef"
        } else {
            "ifdef"
        }
    }
}

/// The conditionals currently open within a single file.
#[derive(Debug, Default)]
pub struct ConditionalStack {
    frames: Vec<Frame>,
}

impl ConditionalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// `defined` is the state of the controlling symbol at the time of the directive.
    pub fn push(&mut self, symbol: &str, negated: bool, defined: bool, line: usize) {
        self.frames.push(Frame {
            symbol: symbol.to_owned(),
            negated,
            active: defined != negated,
            line,
        });
    }

    /// `None` if there is no open conditional to close.
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    /// Lines are only emitted when every enclosing conditional holds, not just the innermost one.
    pub fn is_enabled(&self) -> bool {
        self.frames.iter().all(|frame| frame.active)
    }

    pub fn innermost(&self) -> Option<&Frame> {
        self.frames.last()
    }
}
