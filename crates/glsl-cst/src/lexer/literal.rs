//! Numeric literal recognizers.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, hex_digit1, one_of},
    combinator::{map, opt, recognize},
    sequence::{pair, tuple},
    IResult,
};

use crate::token::TokenKind;

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(input)
}

fn float_suffix(input: &str) -> IResult<&str, &str> {
    alt((tag("lf"), tag("LF"), tag("f"), tag("F")))(input)
}

/// `1.`, `1.5`, `.5`, `1e3`, each with an optional exponent and suffix.
pub(super) fn float_literal(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((
            recognize(tuple((digit1, char('.'), digit0, opt(exponent)))),
            recognize(tuple((char('.'), digit1, opt(exponent)))),
            recognize(pair(digit1, exponent)),
        )),
        opt(float_suffix),
    ))(input)
}

/// Decimal, octal or hexadecimal integer, optionally unsigned.
pub(super) fn int_literal(input: &str) -> IResult<&str, (TokenKind, &str)> {
    map(
        recognize(pair(
            alt((
                recognize(tuple((char('0'), one_of("xX"), hex_digit1))),
                digit1,
            )),
            opt(one_of("uU")),
        )),
        |text: &str| {
            let kind = if text.ends_with(|c| c == 'u' || c == 'U') {
                TokenKind::UintLiteral
            } else {
                TokenKind::IntLiteral
            };
            (kind, text)
        },
    )(input)
}
