use nom::combinator::complete;
use nom::error::ParseError;
use nom::multi::many0;
use nom::{Input, Parser};

/// Applies the parser zero or more times, treating incomplete input as
/// end-of-input.  `many0` interprets the wrapped error as "stop and
/// return accumulated results", which is the right behaviour for the
/// repeated value blocks inside capabilities and NLRI fields whose
/// outer length is already known.
pub fn many0_complete<I, O, E, F>(parser: F) -> impl Parser<I, Output = Vec<O>, Error = E>
where
    I: Clone + Input,
    E: ParseError<I>,
    F: Parser<I, Output = O, Error = E>,
{
    many0(complete(parser))
}
