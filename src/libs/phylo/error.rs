use thiserror::Error;

/// Reasons the tree-description state machine gives up.
///
/// Each kind carries a stable nonzero code, so callers that only want a
/// number (zero meaning success) can keep using one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("Syntax error")]
    Syntax,
    #[error("Unexpected end of input")]
    UnexpectedEnd,
    #[error("Missing '('")]
    MissingLeftParen,
    #[error("Unbalanced parentheses")]
    Unbalanced,
    #[error("Stack not empty")]
    StackNotEmpty,
    #[error("Expecting a semicolon")]
    ExpectedSemicolon,
    #[error("Too many states in SIMMAP code")]
    TooManyCategories,
}

impl ParseErrorKind {
    pub fn code(&self) -> i32 {
        match self {
            ParseErrorKind::Syntax => 1,
            ParseErrorKind::UnexpectedEnd => 2,
            ParseErrorKind::MissingLeftParen => 3,
            ParseErrorKind::Unbalanced => 4,
            ParseErrorKind::StackNotEmpty => 5,
            ParseErrorKind::ExpectedSemicolon => 6,
            ParseErrorKind::TooManyCategories => 7,
        }
    }
}

/// A rejected tree description: what went wrong and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset of the offending token in the description
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The description could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    /// A structural edit was asked to do something it cannot
    #[error("Tree logic error: {0}")]
    Logic(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct() {
        let kinds = [
            ParseErrorKind::Syntax,
            ParseErrorKind::UnexpectedEnd,
            ParseErrorKind::MissingLeftParen,
            ParseErrorKind::Unbalanced,
            ParseErrorKind::StackNotEmpty,
            ParseErrorKind::ExpectedSemicolon,
            ParseErrorKind::TooManyCategories,
        ];
        let mut codes: Vec<i32> = kinds.iter().map(|k| k.code()).collect();
        codes.dedup();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_error_display() {
        let e = ParseError {
            kind: ParseErrorKind::StackNotEmpty,
            offset: 4,
        };
        assert_eq!(e.to_string(), "Stack not empty at byte 4");

        let te: TreeError = e.into();
        assert_eq!(te.to_string(), "Parse error: Stack not empty at byte 4");
    }
}
