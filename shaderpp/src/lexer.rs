//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Directive scanner.
//!
//! Every physical line is classified on its own, there is no line continuation and no comment
//! stripping. Directives must start in the first column:
//!
//! * `#define SYMBOL[ignored text]`
//! * `#undef SYMBOL[ignored text]`
//! * `#ifdef SYMBOL[ignored text]` and `#ifndef SYMBOL[ignored text]`
//! * `#endif[ignored text]`
//! * `#include "path"[ignored text]` and `#include <path>[ignored text]`
//!
//! Anything after the fields of a directive is ignored, which covers trailing comments as well as
//! the value of a `#define`.
//!
//! A line only counts as a directive when the keyword is not immediately followed by another
//! identifier character, so `#defined` or `#include_all` are plain text. Once the keyword has
//! matched, the parsers are wrapped in [`cut`] so that any problem in the remaining fields
//! surfaces as a malformed directive instead of falling back to plain text.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, satisfy, space1},
    combinator::{cut, eof, map, not, recognize, rest, value},
    error::{context, VerboseError, VerboseErrorKind},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};

type ParseResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    Define(&'a str),
    Undef(&'a str),
    /// `#ifdef` when `negated` is false, `#ifndef` otherwise.
    Ifdef {
        symbol: &'a str,
        negated: bool,
    },
    Endif,
    /// Either `#include "path"` or `#include <path>`, the two forms behave the same.
    Include(&'a str),
}

pub fn is_symbol_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/' | '-')
}

/// Symbol names shall consist of letters, digits, and underscores, where the first character is
/// not a digit.
/// `[_a-zA-Z][_a-zA-Z0-9]*`
fn symbol(input: &str) -> ParseResult<'_, &str> {
    context(
        "expected a symbol name",
        recognize(pair(satisfy(is_symbol_start), take_while(is_symbol_char))),
    )(input)
}

/// Whether `name` is usable as a symbol, e.g. when it comes from the command line.
pub fn is_symbol(name: &str) -> bool {
    terminated(symbol, eof)(name).is_ok()
}

fn keyword<'a>(name: &'static str) -> impl FnMut(&'a str) -> ParseResult<'a, &'a str> {
    terminated(tag(name), not(satisfy(is_symbol_char)))
}

fn separator(input: &str) -> ParseResult<'_, &str> {
    context("expected whitespace after the directive", space1)(input)
}

/// Anything after the symbol is ignored, for `#define` that is the definition which we don't keep.
fn symbol_fields(input: &str) -> ParseResult<'_, &str> {
    delimited(separator, symbol, rest)(input)
}

fn path(input: &str) -> ParseResult<'_, &str> {
    take_while1(is_path_char)(input)
}

fn include_path(input: &str) -> ParseResult<'_, &str> {
    context(
        "expected \"path\" or <path>",
        alt((
            delimited(char('"'), path, char('"')),
            delimited(char('<'), path, char('>')),
        )),
    )(input)
}

fn include_fields(input: &str) -> ParseResult<'_, Directive<'_>> {
    map(
        delimited(separator, include_path, rest),
        Directive::Include,
    )(input)
}

fn directive(input: &str) -> ParseResult<'_, Directive<'_>> {
    alt((
        preceded(keyword("#define"), cut(map(symbol_fields, Directive::Define))),
        preceded(keyword("#undef"), cut(map(symbol_fields, Directive::Undef))),
        preceded(
            keyword("#ifdef"),
            cut(map(symbol_fields, |symbol| Directive::Ifdef {
                symbol,
                negated: false,
            })),
        ),
        preceded(
            keyword("#ifndef"),
            cut(map(symbol_fields, |symbol| Directive::Ifdef {
                symbol,
                negated: true,
            })),
        ),
        value(Directive::Endif, preceded(keyword("#endif"), rest)),
        preceded(keyword("#include"), cut(include_fields)),
    ))(input)
}

/// Classify a single line, which must not contain its line terminator.
///
/// Returns `Ok(None)` for plain text, and `Err` with a human readable reason when the line starts
/// with a directive keyword but the rest of it can't be parsed.
pub fn scan(line: &str) -> Result<Option<Directive<'_>>, String> {
    match directive(line) {
        Ok((_, directive)) => Ok(Some(directive)),
        Err(nom::Err::Error(_)) | Err(nom::Err::Incomplete(_)) => Ok(None),
        Err(nom::Err::Failure(error)) => Err(describe(&error)),
    }
}

/// The innermost context attached to the failure is the most specific one.
fn describe(error: &VerboseError<&str>) -> String {
    error
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(context) => Some((*context).to_owned()),
            _ => None,
        })
        .unwrap_or_else(|| "unable to parse directive".to_owned())
}
