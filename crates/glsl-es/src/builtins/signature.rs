//! Line parser for builtin signature lists.
//!
//! Each signature is one line of the form
//! `returnType name(paramType paramName, ...)`. Only the types matter;
//! parameter names and qualifiers are skipped.

use alloc::vec::Vec;

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, space0, space1},
    combinator::{map, recognize},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, tuple},
    IResult,
};

const PARAMETER_QUALIFIERS: &[&str] = &["in", "out", "inout", "const", "highp", "mediump", "lowp"];

/// A signature as written, before generic expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawSignature<'s> {
    pub return_type: &'s str,
    pub name: &'s str,
    pub params: Vec<&'s str>,
}

fn word(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

/// `[qualifiers] type [name]`, yielding the type.
fn parameter(input: &str) -> IResult<&str, &str> {
    map(
        delimited(space0, separated_list1(space1, word), space0),
        |words: Vec<&str>| {
            words
                .into_iter()
                .find(|word| !PARAMETER_QUALIFIERS.contains(word))
                .unwrap_or_default()
        },
    )(input)
}

fn signature(input: &str) -> IResult<&str, RawSignature<'_>> {
    map(
        tuple((
            space0,
            word,
            space1,
            word,
            space0,
            delimited(char('('), separated_list0(char(','), parameter), char(')')),
        )),
        |(_, return_type, _, name, _, mut params)| {
            if params == ["void"] {
                params.clear();
            }
            RawSignature {
                return_type,
                name,
                params,
            }
        },
    )(input)
}

/// Parse one line. Lines that do not start with a signature yield `None`.
pub(crate) fn parse_signature(line: &str) -> Option<RawSignature<'_>> {
    signature(line).ok().map(|(_, sig)| sig)
}
