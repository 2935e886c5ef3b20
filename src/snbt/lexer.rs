use std::mem;
use std::{iter::Peekable, str::CharIndices};

use crate::tag::NbtTag;

use super::SnbtError;


/// Returns whether a character is in `[0-9a-zA-Z]` or is `_`, `-`, `.`, or `+`,
/// which are the characters allowed in unquoted strings and bare compound keys.
pub fn allowed_unquoted(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '+')
}

pub(crate) struct Lexer<'a> {
    raw:    &'a str,
    chars:  Peekable<CharIndices<'a>>,
    index:  usize,
    peeked: Option<Result<TokenData, SnbtError>>,
}

impl<'a> Lexer<'a> {
    pub fn new(raw: &'a str) -> Self {
        Lexer {
            raw,
            chars: raw.char_indices().peekable(),
            index: 0,
            peeked: None,
        }
    }

    #[inline]
    pub fn raw(&self) -> &str {
        self.raw
    }

    /// Peeks at the next token without consuming it. The `expecting_string` flag must
    /// match the one passed to the following `next` call.
    pub fn peek(&mut self, expecting_string: bool) -> Option<&Result<TokenData, SnbtError>> {
        if self.peeked.is_none() {
            self.peeked = self.next(expecting_string);
        }
        self.peeked.as_ref()
    }

    /// Produces the next token, or `None` at the end of the input. When
    /// `expecting_string` is set (compound keys), unquoted words are never
    /// interpreted as numbers or booleans.
    pub fn next(&mut self, expecting_string: bool) -> Option<Result<TokenData, SnbtError>> {
        if let Some(token) = self.peeked.take() {
            return Some(token);
        }

        // Whitespace between tokens is insignificant
        while self.peek_ch()?.is_ascii_whitespace() {
            self.next_ch();
        }

        let single = match self.peek_ch()? {
            '{' => TokenData::new(Token::OpenCurly, self.index, 1),
            '}' => TokenData::new(Token::ClosedCurly, self.index, 1),
            '[' => TokenData::new(Token::OpenSquare, self.index, 1),
            ']' => TokenData::new(Token::ClosedSquare, self.index, 1),
            ',' => TokenData::new(Token::Comma, self.index, 1),
            ':' => TokenData::new(Token::Colon, self.index, 1),
            ';' => TokenData::new(Token::Semicolon, self.index, 1),
            _ => return Some(self.slurp_token(expecting_string)),
        };

        self.next_ch();
        Some(Ok(single))
    }

    /// Asserts that the next token is the same kind as the provided token.
    pub fn assert_next(
        &mut self,
        token:            &Token,
        expecting_string: bool,
    ) -> Result<TokenData, SnbtError> {
        match self.next(expecting_string).transpose()? {
            Some(td) => {
                if mem::discriminant(&td.token) == mem::discriminant(token) {
                    Ok(td)
                } else {
                    Err(SnbtError::unexpected_token(
                        self.raw,
                        Some(&td),
                        token.as_expectation(),
                    ))
                }
            }
            None => Err(SnbtError::unexpected_eos(token.as_expectation())),
        }
    }

    /// Errors unless the input has been fully consumed (apart from whitespace).
    pub fn assert_end(&mut self) -> Result<(), SnbtError> {
        match self.next(false).transpose()? {
            None => Ok(()),
            Some(td) => Err(SnbtError::unexpected_token(
                self.raw,
                Some(&td),
                "end of input",
            )),
        }
    }

    #[inline]
    fn peek_ch(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    #[inline]
    fn next_ch(&mut self) -> Option<char> {
        let next = self.chars.next();
        if let Some((index, ch)) = next {
            self.index = index + ch.len_utf8();
        }
        next.map(|(_, ch)| ch)
    }

    /// Collects a multi-character token: a quoted string, an unquoted word, or a
    /// numeric literal.
    fn slurp_token(&mut self, expecting_string: bool) -> Result<TokenData, SnbtError> {
        let start = self.index;

        match self.next_ch() {
            Some(quote @ ('"' | '\'')) => self.slurp_quoted(quote, start),
            Some(ch) if allowed_unquoted(ch) => {
                let mut char_width = 1;
                while let Some(ch) = self.peek_ch() {
                    if !allowed_unquoted(ch) {
                        break;
                    }
                    self.next_ch();
                    char_width += 1;
                }

                let word = &self.raw[start..self.index];
                let token = if expecting_string {
                    None
                } else {
                    numeric_token(word)
                };
                let token = token.unwrap_or_else(|| Token::String {
                    value:  word.to_owned(),
                    quoted: false,
                });

                Ok(TokenData::new(token, start, char_width))
            }
            Some(ch) => Err(SnbtError::invalid_character(self.raw, start, ch)),
            None => unreachable!("slurp_token called at the end of the input"),
        }
    }

    fn slurp_quoted(&mut self, quote: char, start: usize) -> Result<TokenData, SnbtError> {
        let mut value = String::new();
        // The opening quote
        let mut char_width = 1;

        loop {
            char_width += 1;
            match self.next_ch() {
                Some('\\') => {
                    let escape_index = self.index - 1;
                    char_width += 1;
                    match self.next_ch() {
                        Some(ch @ ('\\' | '"' | '\'')) => value.push(ch),
                        Some(_) => {
                            return Err(SnbtError::unknown_escape(self.raw, escape_index));
                        }
                        None => return Err(SnbtError::unmatched_quote(self.raw, start)),
                    }
                }
                Some(ch) if ch == quote => break,
                Some(ch) => value.push(ch),
                None => return Err(SnbtError::unmatched_quote(self.raw, start)),
            }
        }

        Ok(TokenData::new(
            Token::String {
                value,
                quoted: true,
            },
            start,
            char_width,
        ))
    }
}

/// Interprets an unquoted word as a numeric (or boolean) token. A word that fails
/// every numeric interpretation is not an error: it falls back to an unquoted
/// string, which is how the game's own parser treats words like `1.2.3` or an
/// unsuffixed integer too large for an Int.
fn numeric_token(word: &str) -> Option<Token> {
    match word {
        "true"  => return Some(Token::Byte(1)),
        "false" => return Some(Token::Byte(0)),
        // How Java prints non-finite floats; see MC-200070
        "Infinityf"  => return Some(Token::Float(f32::INFINITY)),
        "-Infinityf" => return Some(Token::Float(f32::NEG_INFINITY)),
        "NaNf"       => return Some(Token::Float(f32::NAN)),
        "Infinityd"  => return Some(Token::Double(f64::INFINITY)),
        "-Infinityd" => return Some(Token::Double(f64::NEG_INFINITY)),
        "NaNd"       => return Some(Token::Double(f64::NAN)),
        _ => {}
    }

    let mut chars = word.chars();
    let last = chars.next_back()?;
    let body = chars.as_str();

    match last {
        'b' | 'B' => parse_int(body)
            .and_then(|v| i8::try_from(v).ok())
            .map(Token::Byte),
        's' | 'S' => parse_int(body)
            .and_then(|v| i16::try_from(v).ok())
            .map(Token::Short),
        'l' | 'L' => parse_int(body).map(Token::Long),
        'f' | 'F' => parse_float(body).map(|v| Token::Float(v as f32)),
        'd' | 'D' => parse_float(body).map(Token::Double),
        _ => {
            if let Some(value) = parse_int(word) {
                return i32::try_from(value).ok().map(Token::Int);
            }
            // An unsuffixed literal with a decimal point or exponent is a Double
            if word.contains(['.', 'e', 'E']) {
                parse_float(word).map(Token::Double)
            } else {
                None
            }
        }
    }
}

fn parse_int(body: &str) -> Option<i64> {
    body.parse::<i64>().ok()
}

fn parse_float(body: &str) -> Option<f64> {
    // Restrict the alphabet so that f64's own parser cannot accept words
    // like "inf" or "NaN" here
    if !body.contains(|ch: char| ch.is_ascii_digit()) {
        return None;
    }
    if !body
        .chars()
        .all(|ch| matches!(ch, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    body.parse::<f64>().ok()
}

#[derive(Debug)]
pub(crate) struct TokenData {
    pub token:      Token,
    pub index:      usize,
    pub char_width: usize,
}

impl TokenData {
    #[inline]
    pub fn new(token: Token, index: usize, char_width: usize) -> Self {
        Self {
            token,
            index,
            char_width,
        }
    }

    /// Converts a value-carrying token into a tag, or hands the token back.
    #[inline]
    pub fn into_tag(self) -> Result<NbtTag, Self> {
        match self.token.into_tag() {
            Ok(tag) => Ok(tag),
            Err(token) => Err(Self::new(token, self.index, self.char_width)),
        }
    }
}

#[derive(Debug)]
pub(crate) enum Token {
    OpenCurly,
    ClosedCurly,
    OpenSquare,
    ClosedSquare,
    Comma,
    Colon,
    Semicolon,
    String { value: String, quoted: bool },
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Token {
    pub fn as_expectation(&self) -> &'static str {
        match self {
            Self::OpenCurly    => "'{'",
            Self::ClosedCurly  => "'}'",
            Self::OpenSquare   => "'['",
            Self::ClosedSquare => "']'",
            Self::Comma        => "','",
            Self::Colon        => "':'",
            Self::Semicolon    => "';'",
            _ => "value",
        }
    }

    pub fn into_tag(self) -> Result<NbtTag, Self> {
        match self {
            Self::String { value, .. } => Ok(NbtTag::String(value)),
            Self::Byte(value)          => Ok(NbtTag::Byte(value)),
            Self::Short(value)         => Ok(NbtTag::Short(value)),
            Self::Int(value)           => Ok(NbtTag::Int(value)),
            Self::Long(value)          => Ok(NbtTag::Long(value)),
            Self::Float(value)         => Ok(NbtTag::Float(value)),
            Self::Double(value)        => Ok(NbtTag::Double(value)),
            token => Err(token),
        }
    }

    /// The integer payload of this token widened to `i64`, for typed-array elements.
    pub fn integer_value(&self) -> Option<i64> {
        match *self {
            Self::Byte(value)  => Some(i64::from(value)),
            Self::Short(value) => Some(i64::from(value)),
            Self::Int(value)   => Some(i64::from(value)),
            Self::Long(value)  => Some(value),
            _ => None,
        }
    }
}
