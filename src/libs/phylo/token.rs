use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{anychar, char},
    combinator::{map, recognize, value},
    multi::many0,
    sequence::delimited,
    IResult, Parser,
};

/// Lexical classes seen by the tree-description state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Space,
    Tab,
    Newline,
    /// Bare or quoted identifier
    String,
    Number,
    LPar,
    RPar,
    Comma,
    Colon,
    Semicolon,
    /// Any character the grammar has no class for, e.g. `{` or `[`
    Other,
    EndOfString,
}

impl Token {
    pub fn is_blank(&self) -> bool {
        matches!(self, Token::Space | Token::Tab | Token::Newline)
    }
}

/// Single-token lookahead over a tree description.
///
/// Each call to [`Tokenizer::next_token`] classifies the next lexeme and
/// advances; the text of the lexeme stays available through
/// [`Tokenizer::lexeme`] until the following call.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    start: usize,
    lexeme: String,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            lexeme: String::new(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        let rest = &self.input[self.pos..];
        self.start = self.pos;
        self.lexeme.clear();

        if rest.is_empty() {
            return Token::EndOfString;
        }

        match lex(rest) {
            Ok((remaining, (token, text))) => {
                let consumed = rest.len() - remaining.len();
                self.lexeme = text.unwrap_or_else(|| rest[..consumed].to_string());
                self.pos += consumed;
                token
            }
            // `lex` ends with an any-char fallback, so this only guards the impossible
            Err(_) => {
                self.pos = self.input.len();
                Token::EndOfString
            }
        }
    }

    /// Text of the current token. Quoted identifiers are unescaped and
    /// underscores in bare identifiers already read as spaces.
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Byte offset where the current token starts
    pub fn position(&self) -> usize {
        self.start
    }

    /// Byte offset of the read position
    pub fn offset(&self) -> usize {
        self.pos
    }
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !"()[]{},:;'\"".contains(c)
}

fn punctuation(input: &str) -> IResult<&str, Token> {
    alt((
        value(Token::LPar, char('(')),
        value(Token::RPar, char(')')),
        value(Token::Comma, char(',')),
        value(Token::Colon, char(':')),
        value(Token::Semicolon, char(';')),
        value(Token::Space, char(' ')),
        value(Token::Tab, char('\t')),
        value(Token::Newline, alt((tag("\r\n"), tag("\n"), tag("\r")))),
    ))
    .parse(input)
}

// 'Homo sapiens', with '' standing for one quote: 'O''Brien' -> O'Brien
fn quoted(input: &str) -> IResult<&str, String> {
    map(
        delimited(
            char('\''),
            recognize(many0(alt((is_not("'"), tag("''"))))),
            char('\''),
        ),
        |s: &str| s.replace("''", "'"),
    )
    .parse(input)
}

// A run of word characters is a number when it reads as a finite float,
// an identifier otherwise. Underscores in identifiers are blanks.
fn bare(input: &str) -> IResult<&str, (Token, Option<String>)> {
    map(take_while1(is_word_char), |s: &str| {
        let is_number = s.parse::<f64>().map(|f| f.is_finite()).unwrap_or(false);
        if is_number {
            (Token::Number, None)
        } else {
            (Token::String, Some(s.replace('_', " ")))
        }
    })
    .parse(input)
}

fn lex(input: &str) -> IResult<&str, (Token, Option<String>)> {
    alt((
        map(punctuation, |t| (t, None)),
        map(quoted, |s| (Token::String, Some(s))),
        bare,
        map(anychar, |_| (Token::Other, None)),
    ))
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<(Token, String)> {
        let mut t = Tokenizer::new(input);
        let mut out = vec![];
        loop {
            let tok = t.next_token();
            if tok == Token::EndOfString {
                break;
            }
            out.push((tok, t.lexeme().to_string()));
        }
        out
    }

    #[test]
    fn test_tokens_simple() {
        let tokens = collect("(A:1,B:2.5e-1);");
        let kinds: Vec<Token> = tokens.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            kinds,
            vec![
                Token::LPar,
                Token::String,
                Token::Colon,
                Token::Number,
                Token::Comma,
                Token::String,
                Token::Colon,
                Token::Number,
                Token::RPar,
                Token::Semicolon,
            ]
        );
        assert_eq!(tokens[3].1, "1");
        assert_eq!(tokens[7].1, "2.5e-1");
    }

    #[test]
    fn test_tokens_labels() {
        let tokens = collect("'O''Brien' Homo_sapiens 'a_b'");
        assert_eq!(tokens[0], (Token::String, "O'Brien".to_string()));
        assert_eq!(tokens[1], (Token::Space, " ".to_string()));
        assert_eq!(tokens[2], (Token::String, "Homo sapiens".to_string()));
        assert_eq!(tokens[4], (Token::String, "a_b".to_string()));
    }

    #[test]
    fn test_tokens_whitespace_and_other() {
        let tokens = collect("\t\r\n{0,1}");
        assert_eq!(tokens[0].0, Token::Tab);
        assert_eq!(tokens[1], (Token::Newline, "\r\n".to_string()));
        assert_eq!(tokens[2], (Token::Other, "{".to_string()));
        assert_eq!(tokens[3].0, Token::Number);
        assert_eq!(tokens[4].0, Token::Comma);
        assert_eq!(tokens[6], (Token::Other, "}".to_string()));
    }

    #[test]
    fn test_tokens_number_like_words() {
        let tokens = collect("12 1e nan -3");
        assert_eq!(tokens[0].0, Token::Number);
        assert_eq!(tokens[2].0, Token::String);
        assert_eq!(tokens[4].0, Token::String);
        assert_eq!(tokens[6], (Token::Number, "-3".to_string()));
    }

    #[test]
    fn test_positions() {
        let mut t = Tokenizer::new("(Ab,C)");
        assert_eq!(t.next_token(), Token::LPar);
        assert_eq!(t.next_token(), Token::String);
        assert_eq!(t.position(), 1);
        assert_eq!(t.offset(), 3);
        assert_eq!(t.next_token(), Token::Comma);
        assert_eq!(t.position(), 3);
    }

    #[test]
    fn test_unterminated_quote() {
        let tokens = collect("'abc");
        assert_eq!(tokens[0], (Token::Other, "'".to_string()));
        assert_eq!(tokens[1], (Token::String, "abc".to_string()));
    }
}
