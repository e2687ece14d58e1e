use std::{iter::Peekable, str::FromStr};

use tracing::debug;

use crate::{
    DatabaseError,
    db::table::Schema,
    sql::lexer::{LexError, Lexer, Spanned, Token},
};

pub use ast::*;
pub use keyword::Keyword;
pub use operator::{ArithmeticOp, ComparisonOp};

pub mod ast;
pub mod keyword;
pub mod operator;

/// Collapses every whitespace run to a single space and trims both ends.
pub fn normalize(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes and parses a single query.
pub fn parse(query: &str) -> Result<Statement, DatabaseError> {
    let normalized = normalize(query);
    QueryParser::new(&normalized).parse()
}

/// Recursive descent parser over a normalized query.
///
/// Parsing happens in two stages. The first recognizes the command from its
/// leading keywords; failing that, the whole query is reported as
/// `Malformed query`. The second parses what follows the command, and any
/// failure there is reported as `Malformed <command>` quoting that remainder.
///
/// Projections, `where` clauses and inserted values are not tokenized any
/// further: their raw text is sliced out of the query and split on `,` or
/// ` and ` without regard to quoting.
pub struct QueryParser<'src> {
    source: &'src str,
    lexer: Peekable<Lexer<'src>>,

    /// Command named in syntax errors; `query` until the first stage succeeds.
    command: &'static str,

    /// Query text after the command keywords.
    remainder: &'src str,
}

impl<'src> QueryParser<'src> {
    /// Creates a parser for an already normalized query.
    pub fn new(query: &'src str) -> Self {
        Self {
            source: query,
            lexer: Lexer::new(query).peekable(),
            command: "query",
            remainder: query,
        }
    }

    pub fn parse(mut self) -> Result<Statement, DatabaseError> {
        let command = self.parse_command()?;
        debug!(command = self.command, remainder = self.remainder, "parsing");

        match command {
            Keyword::Create => self.parse_create(),
            Keyword::Drop => Ok(Statement::Drop {
                name: self.parse_single_name()?,
            }),
            Keyword::Load => Ok(Statement::Load {
                name: self.parse_single_name()?,
            }),
            Keyword::Store => Ok(Statement::Store {
                name: self.parse_single_name()?,
            }),
            Keyword::Print => Ok(Statement::Print {
                name: self.parse_single_name()?,
            }),
            Keyword::Insert => self.parse_insert(),
            Keyword::Select => self.parse_select().map(Statement::Select),
            _ => Err(self.malformed()),
        }
    }

    /// First stage: `create table `, `drop table `, `insert into `, `load `,
    /// `store `, `print ` or `select `, each followed by more text.
    fn parse_command(&mut self) -> Result<Keyword, DatabaseError> {
        let source = self.source;
        let unknown = || DatabaseError::malformed("query", source);

        let (first, mut end) = as_word(self.lexer.next()).ok_or_else(unknown)?;
        let keyword = Keyword::from_str(first).map_err(|_| unknown())?;

        let second = match keyword {
            Keyword::Create | Keyword::Drop => Some(Keyword::Table),
            Keyword::Insert => Some(Keyword::Into),
            Keyword::Load | Keyword::Store | Keyword::Print | Keyword::Select => None,
            _ => return Err(unknown()),
        };

        if let Some(expected) = second {
            let (word, word_end) = as_word(self.lexer.next()).ok_or_else(unknown)?;
            if Keyword::from_str(word).ok() != Some(expected) {
                return Err(unknown());
            }
            end = word_end;
        }

        if !source[end..].starts_with(' ') {
            return Err(unknown());
        }

        self.command = keyword.command_name();
        self.remainder = &source[end + 1..];
        Ok(keyword)
    }

    /// `<name> (<col> <type>, ...)` or `<name> as select ...`
    fn parse_create(&mut self) -> Result<Statement, DatabaseError> {
        let name = self.expect_word()?.to_string();

        if self.consume_if(Token::LeftParen)? {
            let schema = self.parse_column_definitions()?;
            self.expect_end()?;
            return Ok(Statement::CreateTable { name, schema });
        }

        self.expect_keyword(Keyword::As)?;
        self.expect_keyword(Keyword::Select)?;
        let select = self.parse_select()?;

        Ok(Statement::CreateFromSelect { name, select })
    }

    /// Column definitions up to and including the closing parenthesis.
    ///
    /// Each comma-separated piece is a run of words. Whether a piece is
    /// exactly `<name> <type>` is checked afterwards, so `(a b c)` is a
    /// malformed definition rather than a syntax error.
    fn parse_column_definitions(&mut self) -> Result<Schema, DatabaseError> {
        let source = self.source;
        let mut definitions = Vec::new();
        let mut piece: Option<(usize, usize)> = None;

        loop {
            let token = self.next_token()?.ok_or_else(|| self.malformed())?;

            match token.token {
                Token::Word(_) => {
                    let start = piece.map_or(token.start, |(start, _)| start);
                    piece = Some((start, token.end));
                    continue;
                }
                Token::Comma | Token::RightParen => {
                    let text = piece.map_or("", |(start, end)| &source[start..end]);
                    definitions.push(text);
                    piece = None;
                }
                _ => return Err(self.malformed()),
            }

            if token.token == Token::RightParen {
                break;
            }
        }

        Schema::parse_definitions(definitions)
    }

    /// `<name> values <v>, ...`
    fn parse_insert(&mut self) -> Result<Statement, DatabaseError> {
        let table = self.expect_word()?.to_string();
        self.expect_keyword(Keyword::Values)?;

        let values = self
            .rest_of_query()?
            .split(',')
            .map(|value| value.trim().to_string())
            .collect();

        Ok(Statement::Insert { table, values })
    }

    /// `<projection> from <table>, ... [where <conditions>]`
    fn parse_select(&mut self) -> Result<SelectStatement, DatabaseError> {
        let start = self.peek_token()?.ok_or_else(|| self.malformed())?.start;

        let from = loop {
            match self.next_token()? {
                Some(token) if is_keyword(&token, Keyword::From) => break token,
                Some(_) => continue,
                None => return Err(self.malformed()),
            }
        };

        let projection = self.source[start..from.start].trim();
        if projection.is_empty() {
            return Err(self.malformed());
        }
        let projection = self.parse_projection(projection)?;

        let mut tables = vec![self.expect_word()?.to_string()];
        while self.consume_if(Token::Comma)? {
            tables.push(self.expect_word()?.to_string());
        }

        let conditions = if self.consume_keyword(Keyword::Where)? {
            let clause = self.rest_of_query()?;
            parse_conditions(clause)?
        } else {
            self.expect_end()?;
            Vec::new()
        };

        Ok(SelectStatement {
            projection,
            tables,
            conditions,
        })
    }

    /// Splits a projection on every comma. `*` alone selects everything.
    fn parse_projection(&self, text: &str) -> Result<Projection, DatabaseError> {
        if text == "*" {
            return Ok(Projection::Star);
        }

        text.split(',')
            .map(|piece| match piece.trim() {
                "" => Err(self.malformed()),
                piece => parse_target(piece),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Projection::Targets)
    }

    /// Load, store, drop and print take exactly one table name.
    fn parse_single_name(&mut self) -> Result<String, DatabaseError> {
        let name = self.expect_word()?;
        self.expect_end()?;
        Ok(name.to_string())
    }

    fn malformed(&self) -> DatabaseError {
        DatabaseError::malformed(self.command, self.remainder)
    }

    fn next_token(&mut self) -> Result<Option<Spanned<'src>>, DatabaseError> {
        match self.lexer.next() {
            None => Ok(None),
            Some(Ok(token)) => Ok(Some(token)),
            Some(Err(err)) => {
                debug!(%err, "lexing failed");
                Err(self.malformed())
            }
        }
    }

    fn peek_token(&mut self) -> Result<Option<Spanned<'src>>, DatabaseError> {
        match self.lexer.peek().cloned() {
            None => Ok(None),
            Some(Ok(token)) => Ok(Some(token)),
            Some(Err(_)) => Err(self.malformed()),
        }
    }

    fn expect_word(&mut self) -> Result<&'src str, DatabaseError> {
        match self.next_token()?.map(|t| t.token) {
            Some(Token::Word(word)) => Ok(word),
            _ => Err(self.malformed()),
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), DatabaseError> {
        let word = self.expect_word()?;
        if Keyword::from_str(word).ok() == Some(keyword) {
            Ok(())
        } else {
            Err(self.malformed())
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<bool, DatabaseError> {
        let found = self
            .peek_token()?
            .is_some_and(|token| is_keyword(&token, keyword));
        if found {
            self.lexer.next();
        }
        Ok(found)
    }

    fn consume_if(&mut self, expected: Token) -> Result<bool, DatabaseError> {
        let found = self
            .peek_token()?
            .is_some_and(|token| token.token == expected);
        if found {
            self.lexer.next();
        }
        Ok(found)
    }

    fn expect_end(&mut self) -> Result<(), DatabaseError> {
        match self.next_token()? {
            None => Ok(()),
            Some(_) => Err(self.malformed()),
        }
    }

    /// The raw text from the next token to the end of the query, which must
    /// not be empty. Consumes every remaining token.
    fn rest_of_query(&mut self) -> Result<&'src str, DatabaseError> {
        let start = self.peek_token()?.ok_or_else(|| self.malformed())?.start;
        let source = self.source;
        while self.next_token()?.is_some() {}
        Ok(&source[start..])
    }
}

fn as_word<'src>(token: Option<Result<Spanned<'src>, LexError>>) -> Option<(&'src str, usize)> {
    match token {
        Some(Ok(Spanned {
            token: Token::Word(word),
            end,
            ..
        })) => Some((word, end)),
        _ => None,
    }
}

fn is_keyword(token: &Spanned<'_>, keyword: Keyword) -> bool {
    matches!(token.token, Token::Word(word) if Keyword::from_str(word).ok() == Some(keyword))
}

/// Parses one projection item.
///
/// An item containing ` as ` is `<left> <op> <right> as <alias>`, where the
/// operator is the first of `* + - /` found anywhere in the expression. Any
/// other item is a bare column name.
fn parse_target(piece: &str) -> Result<SelectTarget, DatabaseError> {
    let mut parts = piece.split(" as ");
    let (Some(expression), Some(alias)) = (parts.next(), parts.next()) else {
        return Ok(SelectTarget::Column(piece.to_string()));
    };

    let op = ArithmeticOp::detect(expression)
        .ok_or_else(|| DatabaseError::InvalidExpression(expression.to_string()))?;

    let mut operands = expression.split(op.to_symbol());
    let left = operands.next().unwrap_or_default().trim();
    let right = operands.next().unwrap_or_default().trim();

    Ok(SelectTarget::Computed {
        left: left.to_string(),
        op,
        right: right.to_string(),
        alias: alias.trim().to_string(),
    })
}

/// Splits a `where` clause on ` and ` and parses each conjunct.
fn parse_conditions(clause: &str) -> Result<Vec<Condition>, DatabaseError> {
    clause.split(" and ").map(parse_condition).collect()
}

/// Parses `<left> <op> <right>`, splitting on the first operator spelling
/// found in the conjunct.
fn parse_condition(conjunct: &str) -> Result<Condition, DatabaseError> {
    let (op, spelling) = ComparisonOp::detect(conjunct)
        .ok_or_else(|| DatabaseError::InvalidWhere(conjunct.to_string()))?;

    let mut operands = conjunct.split(spelling);
    let left = operands.next().unwrap_or_default().trim();
    let right = operands.next().unwrap_or_default().trim();

    Ok(Condition {
        left: left.to_string(),
        op,
        right: right.to_string(),
    })
}
