use strum::EnumString;

/// Words with a fixed role in the query grammar.
///
/// Matching is case-sensitive: `select` is a keyword, `SELECT` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Keyword {
    Create,
    Table,
    Drop,
    Load,
    Store,
    Print,

    Insert,
    Into,
    Values,

    Select,
    From,
    Where,
    As,
}

impl Keyword {
    /// The command name used in `Malformed <command>: ...` messages.
    pub fn command_name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Drop => "drop",
            Self::Load => "load",
            Self::Store => "store",
            Self::Print => "print",
            Self::Insert => "insert",
            Self::Select => "select",
            _ => "query",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(Keyword::from_str("select"), Ok(Keyword::Select));
        assert_eq!(Keyword::from_str("values"), Ok(Keyword::Values));
        assert!(Keyword::from_str("SELECT").is_err());
        assert!(Keyword::from_str("Select").is_err());
    }
}
