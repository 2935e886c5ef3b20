//! Parsing SNBT (stringified NBT) into NBT data.
//!
//! The inverse direction, printing tags as SNBT, lives on the tag types
//! themselves; see [`NbtTag::to_snbt`] and friends.
//!
//! [`NbtTag::to_snbt`]: crate::tag::NbtTag::to_snbt

mod lexer;


use thiserror::Error;

use crate::settings::DepthLimit;
use crate::tag::{NbtCompound, NbtList, NbtTag, TagId};

use self::lexer::{Lexer, Token, TokenData};


pub use self::lexer::allowed_unquoted;


/// Parses the given string into an NBT tag of any variant, using the default
/// nesting depth limit. The entire input must be consumed.
#[inline]
pub fn parse_any(input: &str) -> Result<NbtTag, SnbtError> {
    parse_any_with_limit(input, DepthLimit::default())
}

/// Parses the given string into an NBT tag of any variant.
pub fn parse_any_with_limit(input: &str, limit: DepthLimit) -> Result<NbtTag, SnbtError> {
    let mut tokens = Lexer::new(input);
    let tag = parse_next_value(&mut tokens, limit, 0)?;
    tokens.assert_end()?;
    Ok(tag)
}

/// Parses the given string into an NBT compound, using the default nesting depth
/// limit. The entire input must be consumed.
#[inline]
pub fn parse_compound(input: &str) -> Result<NbtCompound, SnbtError> {
    parse_compound_with_limit(input, DepthLimit::default())
}

/// Parses the given string into an NBT compound.
pub fn parse_compound_with_limit(
    input: &str,
    limit: DepthLimit,
) -> Result<NbtCompound, SnbtError> {
    let mut tokens = Lexer::new(input);
    let open_curly = tokens.assert_next(&Token::OpenCurly, false)?;
    let compound = parse_compound_tag(&mut tokens, &open_curly, limit, 0)?;
    tokens.assert_end()?;
    Ok(compound)
}

fn parse_next_value(
    tokens:        &mut Lexer<'_>,
    limit:         DepthLimit,
    current_depth: u32,
) -> Result<NbtTag, SnbtError> {
    let token = tokens.next(false).transpose()?;
    parse_value(tokens, token, limit, current_depth)
}

/// Parses a token into a value, committing on the first distinguishing token:
/// `{` opens a compound, `[` opens a list or typed array, and anything else must
/// be a scalar or string token.
fn parse_value(
    tokens:        &mut Lexer<'_>,
    token:         Option<TokenData>,
    limit:         DepthLimit,
    current_depth: u32,
) -> Result<NbtTag, SnbtError> {
    match token {
        Some(td) => match td.token {
            Token::OpenCurly => {
                check_depth(tokens, &td, limit, current_depth)?;
                parse_compound_tag(tokens, &td, limit, current_depth).map(NbtTag::Compound)
            }
            Token::OpenSquare => {
                check_depth(tokens, &td, limit, current_depth)?;
                parse_list(tokens, &td, limit, current_depth)
            }
            _ => td
                .into_tag()
                .map_err(|td| SnbtError::unexpected_token(tokens.raw(), Some(&td), "value")),
        },
        // We expected a value but ran out of input
        None => Err(SnbtError::unexpected_eos("value")),
    }
}

fn check_depth(
    tokens:        &Lexer<'_>,
    td:            &TokenData,
    limit:         DepthLimit,
    current_depth: u32,
) -> Result<(), SnbtError> {
    if current_depth >= limit.0 {
        Err(SnbtError::exceeded_depth_limit(tokens.raw(), td.index, limit))
    } else {
        Ok(())
    }
}

/// Parses a list, which is either a tag list or a typed array of integers.
fn parse_list(
    tokens:        &mut Lexer<'_>,
    open_square:   &TokenData,
    limit:         DepthLimit,
    current_depth: u32,
) -> Result<NbtTag, SnbtError> {
    match tokens.next(false).transpose()? {
        // An empty list with no type specifier is an empty tag list
        Some(TokenData {
            token: Token::ClosedSquare,
            ..
        }) => Ok(NbtTag::List(NbtList::new())),

        // A leading unquoted string can be a type specifier such as in [I; 1, 2],
        // which a following semicolon distinguishes from a list of strings
        // such as ['i', 'j'] or [abc, def]
        Some(TokenData {
            token:
                Token::String {
                    value: string,
                    quoted: false,
                },
            index,
            char_width,
        }) if matches!(
            tokens.peek(false),
            Some(Ok(TokenData {
                token: Token::Semicolon,
                ..
            })),
        ) =>
        {
            // Move past the peeked semicolon
            tokens.next(false);

            match string.as_str() {
                "b" | "B" => parse_array(tokens, open_square, TagId::ByteArray),
                "i" | "I" => parse_array(tokens, open_square, TagId::IntArray),
                "l" | "L" => parse_array(tokens, open_square, TagId::LongArray),
                _ => Err(SnbtError::unexpected_token_at(
                    tokens.raw(),
                    index,
                    char_width,
                    "'B', 'I', or 'L'",
                )),
            }
        }

        // Anything else begins a tag list; its variant fixes the element id
        td => {
            let first_element = parse_value(tokens, td, limit, current_depth + 1)?;
            parse_tag_list(tokens, first_element, limit, current_depth).map(NbtTag::List)
        }
    }
}

/// Parses the elements of `[B; …]`, `[I; …]`, or `[L; …]`. Only integer tokens
/// whose value fits the element width are grammatical; trailing commas are not.
fn parse_array(
    tokens:      &mut Lexer<'_>,
    open_square: &TokenData,
    id:          TagId,
) -> Result<NbtTag, SnbtError> {
    let in_range = match id {
        TagId::ByteArray => |v: i64| i8::try_from(v).is_ok(),
        TagId::IntArray  => |v: i64| i32::try_from(v).is_ok(),
        _ => |_: i64| true,
    };

    let mut values: Vec<i64> = Vec::new();

    let mut element = match tokens.next(false).transpose()? {
        // The specifier may be immediately followed by ']', an empty array
        Some(TokenData {
            token: Token::ClosedSquare,
            ..
        }) => return Ok(finish_array(id, values)),
        Some(td) => td,
        None => return Err(SnbtError::unmatched_brace(tokens.raw(), open_square.index)),
    };

    loop {
        // An unsuffixed literal too large for an Int lexes as a bare word; the
        // array grammar still reads it as an integer (e.g. `[L; 9223372036854775807]`)
        let integer = match &element.token {
            Token::String {
                value,
                quoted: false,
            } => value.parse::<i64>().ok(),
            token => token.integer_value(),
        };

        match integer.filter(|&v| in_range(v)) {
            Some(value) => values.push(value),
            None => {
                return Err(SnbtError::invalid_array_element(
                    tokens.raw(),
                    element.index,
                    element.char_width,
                ));
            }
        }

        let comma_index = match tokens.next(false).transpose()? {
            Some(TokenData {
                token: Token::ClosedSquare,
                ..
            }) => return Ok(finish_array(id, values)),
            Some(TokenData {
                token: Token::Comma,
                index,
                ..
            }) => index,
            td => {
                return Err(SnbtError::unexpected_token(
                    tokens.raw(),
                    td.as_ref(),
                    "',' or ']'",
                ));
            }
        };

        element = match tokens.next(false).transpose()? {
            Some(TokenData {
                token: Token::ClosedSquare,
                ..
            }) => return Err(SnbtError::trailing_comma(tokens.raw(), comma_index)),
            Some(td) => td,
            None => return Err(SnbtError::unmatched_brace(tokens.raw(), open_square.index)),
        };
    }
}

fn finish_array(id: TagId, values: Vec<i64>) -> NbtTag {
    match id {
        TagId::ByteArray => NbtTag::ByteArray(values.into_iter().map(|v| v as i8).collect()),
        TagId::IntArray  => NbtTag::IntArray(values.into_iter().map(|v| v as i32).collect()),
        TagId::LongArray => NbtTag::LongArray(values),
        _ => unreachable!("parse_array called with a non-array id"),
    }
}

/// Parses the remainder of a tag list after its first element. The first element's
/// variant fixes the list's element id; a later element of any other variant is a
/// parse error.
fn parse_tag_list(
    tokens:        &mut Lexer<'_>,
    first_element: NbtTag,
    limit:         DepthLimit,
    current_depth: u32,
) -> Result<NbtList, SnbtError> {
    let element_id = first_element.id();
    let expecting_strings = element_id == TagId::String;
    let mut tags = vec![first_element];

    loop {
        match tokens.next(false).transpose()? {
            Some(TokenData {
                token: Token::ClosedSquare,
                ..
            }) => return Ok(NbtList::from_parts(element_id, tags)),

            Some(TokenData {
                token: Token::Comma,
                ..
            }) => {
                // A closing bracket after the comma is an accepted trailing comma
                if matches!(
                    tokens.peek(expecting_strings),
                    Some(Ok(TokenData {
                        token: Token::ClosedSquare,
                        ..
                    })),
                ) {
                    tokens.next(expecting_strings);
                    return Ok(NbtList::from_parts(element_id, tags));
                }

                let token = tokens.next(expecting_strings).transpose()?;
                let (index, char_width) = match &token {
                    Some(td) => (td.index, td.char_width),
                    None => (0, 0),
                };
                let element = parse_value(tokens, token, limit, current_depth + 1)?;

                if element.id() == element_id {
                    tags.push(element);
                } else {
                    return Err(SnbtError::non_homogeneous_list(
                        tokens.raw(),
                        index,
                        char_width,
                    ));
                }
            }

            td => {
                return Err(SnbtError::unexpected_token(
                    tokens.raw(),
                    td.as_ref(),
                    "',' or ']'",
                ));
            }
        }
    }
}

/// Parses the body of a compound after its opening brace. Duplicate keys are a
/// parse error; trailing commas are accepted.
fn parse_compound_tag(
    tokens:        &mut Lexer<'_>,
    open_curly:    &TokenData,
    limit:         DepthLimit,
    current_depth: u32,
) -> Result<NbtCompound, SnbtError> {
    let mut compound = NbtCompound::new();

    loop {
        match tokens.next(true).transpose()? {
            Some(TokenData {
                token: Token::ClosedCurly,
                ..
            }) => return Ok(compound),

            // A key; both bare words and quoted strings are permitted
            Some(TokenData {
                token: Token::String { value: key, .. },
                index,
                ..
            }) => {
                if compound.contains_key(key.as_str()) {
                    return Err(SnbtError::duplicate_key(tokens.raw(), &key, index));
                }

                tokens.assert_next(&Token::Colon, false)?;
                let value = parse_next_value(tokens, limit, current_depth + 1)?;
                compound.insert(key, value);

                // Entries are separated by commas; a trailing comma before the
                // closing brace is accepted
                match tokens.next(true).transpose()? {
                    Some(TokenData {
                        token: Token::ClosedCurly,
                        ..
                    }) => return Ok(compound),
                    Some(TokenData {
                        token: Token::Comma,
                        ..
                    }) => {}
                    td => {
                        return Err(SnbtError::unexpected_token(
                            tokens.raw(),
                            td.as_ref(),
                            "',' or '}'",
                        ));
                    }
                }
            }

            Some(td) => {
                return Err(SnbtError::unexpected_token(
                    tokens.raw(),
                    Some(&td),
                    "compound key or '}'",
                ));
            }

            None => return Err(SnbtError::unmatched_brace(tokens.raw(), open_curly.index)),
        }
    }
}

/// An error that occurs while parsing SNBT. Most variants carry a copy of the
/// segment of the input where the error occurred.
#[derive(Error, Debug, Clone)]
pub enum SnbtError {
    /// The nesting depth limit for compound and list tags was exceeded.
    #[error("exceeded depth limit {} for nested tags at column {index}", limit.0)]
    ExceededDepthLimit {
        index: usize,
        /// The limit which was exceeded.
        limit: DepthLimit,
    },
    /// The end of the input was encountered before it was expected.
    #[error("reached end of input but expected {expected}")]
    UnexpectedEos {
        /// The expected token or sequence of tokens.
        expected: &'static str,
    },
    /// An unexpected token was encountered.
    #[error("unexpected token at column {index} near '{segment}', expected {expected}")]
    UnexpectedToken {
        segment:  String,
        index:    usize,
        /// The expected token or sequence of tokens.
        expected: &'static str,
    },
    /// A character that may not begin any token, such as `(`, outside a quoted
    /// string.
    #[error("character '{ch}' cannot appear outside quoted strings, at column {index}")]
    InvalidCharacter { index: usize, ch: char },
    /// An escape sequence other than `\\`, `\"`, or `\'`.
    #[error("unknown escape sequence at column {index}: '{segment}'")]
    UnknownEscape { segment: String, index: usize },
    /// An unmatched single or double quote.
    #[error("unmatched quote at column {index} near '{segment}'")]
    UnmatchedQuote { segment: String, index: usize },
    /// An unmatched curly or square bracket.
    #[error("unmatched brace at column {index} near '{segment}'")]
    UnmatchedBrace { segment: String, index: usize },
    /// A trailing comma inside a typed array, where the grammar does not accept one.
    #[error("forbidden trailing comma at column {index}: '{segment}'")]
    TrailingComma { segment: String, index: usize },
    /// A typed array element which is not an integer of the array's width.
    #[error("invalid element in a typed array at column {index} near '{segment}'")]
    InvalidArrayElement { segment: String, index: usize },
    /// A list element whose variant differs from the variant of the first element.
    #[error("non-homogeneous list at column {index} near '{segment}'")]
    NonHomogeneousList { segment: String, index: usize },
    /// A key which appears more than once in one compound.
    #[error("duplicate compound key \"{key}\" at column {index}")]
    DuplicateKey { key: String, index: usize },
}

impl SnbtError {
    fn exceeded_depth_limit(_input: &str, index: usize, limit: DepthLimit) -> Self {
        Self::ExceededDepthLimit { index, limit }
    }

    fn unexpected_eos(expected: &'static str) -> Self {
        Self::UnexpectedEos { expected }
    }

    fn unexpected_token(input: &str, token: Option<&TokenData>, expected: &'static str) -> Self {
        match token {
            Some(token) => {
                Self::unexpected_token_at(input, token.index, token.char_width, expected)
            }
            None => Self::unexpected_eos(expected),
        }
    }

    fn unexpected_token_at(
        input:      &str,
        index:      usize,
        char_width: usize,
        expected:   &'static str,
    ) -> Self {
        Self::UnexpectedToken {
            segment: Self::segment(input, index, char_width, 15, 0),
            index,
            expected,
        }
    }

    fn invalid_character(_input: &str, index: usize, ch: char) -> Self {
        Self::InvalidCharacter { index, ch }
    }

    fn unknown_escape(input: &str, index: usize) -> Self {
        Self::UnknownEscape {
            segment: Self::segment(input, index, 2, 0, 0),
            index,
        }
    }

    fn unmatched_quote(input: &str, index: usize) -> Self {
        Self::UnmatchedQuote {
            segment: Self::segment(input, index, 1, 7, 7),
            index,
        }
    }

    fn unmatched_brace(input: &str, index: usize) -> Self {
        Self::UnmatchedBrace {
            segment: Self::segment(input, index, 1, 0, 15),
            index,
        }
    }

    fn trailing_comma(input: &str, index: usize) -> Self {
        Self::TrailingComma {
            segment: Self::segment(input, index, 1, 15, 1),
            index,
        }
    }

    fn invalid_array_element(input: &str, index: usize, char_width: usize) -> Self {
        Self::InvalidArrayElement {
            segment: Self::segment(input, index, char_width, 15, 0),
            index,
        }
    }

    fn non_homogeneous_list(input: &str, index: usize, char_width: usize) -> Self {
        Self::NonHomogeneousList {
            segment: Self::segment(input, index, char_width, 15, 0),
            index,
        }
    }

    fn duplicate_key(_input: &str, key: &str, index: usize) -> Self {
        Self::DuplicateKey {
            key: key.to_owned(),
            index,
        }
    }

    /// Copies the section of `input` around `index`, with `before` characters of
    /// leading and `after` characters of trailing context.
    fn segment(
        input:      &str,
        index:      usize,
        char_width: usize,
        before:     usize,
        after:      usize,
    ) -> String {
        let start = input[..index]
            .char_indices()
            .rev()
            .nth(before.saturating_sub(1))
            .map(|(index, _)| index)
            .unwrap_or(0);

        let end_len = input[index..]
            .char_indices()
            .nth(char_width.min(20) + after)
            .map(|(index, _)| index)
            .unwrap_or(input.len() - index);

        let end = (index + end_len).min(input.len());

        input[start..end].to_owned()
    }
}
