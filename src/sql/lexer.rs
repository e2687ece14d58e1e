use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'a> {
    /// Any run of characters up to whitespace, a comma, a parenthesis or a
    /// quote. Keywords, names, numbers and operators all lex as words.
    Word(&'a str),
    /// A single-quoted literal, quotes included.
    Quoted(&'a str),

    Comma,
    LeftParen,
    RightParen,
}

/// A token together with its byte range in the query text.
///
/// The parser slices raw clause text (projections, conditions, inserted
/// values) straight out of the query using these offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("unterminated string starting at position {0}")]
    UnterminatedString(usize),
}

pub(crate) struct Lexer<'a> {
    pub rest: &'a str,
    pub position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            position: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        let non_whitespace_pos = self
            .rest
            .char_indices()
            .find(|(_, ch)| !ch.is_whitespace())
            .map(|(pos, _)| pos)
            .unwrap_or(self.rest.len());

        self.advance(non_whitespace_pos);
    }

    fn advance(&mut self, len: usize) -> &'a str {
        let consumed = &self.rest[..len];
        self.position += len;
        self.rest = &self.rest[len..];
        consumed
    }

    fn consume_word(&mut self) -> &'a str {
        let word_index = self
            .rest
            .find(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '\''))
            .unwrap_or(self.rest.len());

        self.advance(word_index)
    }

    fn consume_string(&mut self) -> Result<&'a str, LexError> {
        let start = self.position;
        let closing = self.rest[1..]
            .find('\'')
            .ok_or(LexError::UnterminatedString(start))?;

        Ok(self.advance(closing + 2))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Spanned<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();

        let char = self.rest.chars().next()?;
        let start = self.position;

        let token = match char {
            ',' => {
                self.advance(1);
                Token::Comma
            }
            '(' => {
                self.advance(1);
                Token::LeftParen
            }
            ')' => {
                self.advance(1);
                Token::RightParen
            }
            '\'' => match self.consume_string() {
                Ok(text) => Token::Quoted(text),
                Err(err) => {
                    // Nothing after a broken string can be tokenized reliably.
                    self.advance(self.rest.len());
                    return Some(Err(err));
                }
            },
            _ => Token::Word(self.consume_word()),
        };

        Some(Ok(Spanned {
            token,
            start,
            end: self.position,
        }))
    }
}
