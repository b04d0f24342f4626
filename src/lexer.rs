//! Token stream for the TabQL dialect.
//!
//! The lexer is deliberately small: keywords, commas, parentheses, `*` and
//! the six comparison operators. Everything else (identifiers, dotted column
//! references, numbers, quoted literals) is a single `Word` token — the
//! dialect passes literals through unparsed, so quote characters are ordinary
//! word characters. Each token carries its byte span in the source so the
//! parser can recover clause text verbatim.

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Keywords
    Select,
    From,
    Where,

    // Joins
    Inner,
    Left,
    Right,
    Join,
    On,

    // Grouping
    Group,
    By,

    // Logical connectives (collapsed by the parser, but lexed distinctly)
    And,
    Or,

    // Aggregates
    Count,
    Avg,
    Sum,
    Min,
    Max,

    // Comparison operators; the two-character forms are atomic, so `>=`
    // never lexes as `>` followed by `=`
    Equal,         // =
    NotEqual,      // !=
    LessThan,      // <
    LessThanEq,    // <=
    GreaterThan,   // >
    GreaterThanEq, // >=
    Bang,          // ! not followed by =; never a comparison operator

    // Delimiters
    Comma,      // ,
    Star,       // *
    LeftParen,  // (
    RightParen, // )

    // Any other run of non-delimiter characters (identifiers, dotted
    // references, numbers, quoted text)
    Word(String),

    // Special
    Eof,
}

/// A token plus its byte span in the source string.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

pub struct QueryLexer {
    input: Vec<char>,
    position: usize,
    byte_pos: usize,
    current_char: Option<char>,
}

impl QueryLexer {
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let current_char = chars.first().copied();

        Self {
            input: chars,
            position: 0,
            byte_pos: 0,
            current_char,
        }
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char {
            self.byte_pos += ch.len_utf8();
        }
        self.position += 1;
        self.current_char = self.input.get(self.position).copied();
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Characters that terminate a word.
    fn is_delimiter(ch: char) -> bool {
        ch.is_whitespace() || matches!(ch, ',' | '(' | ')' | '*' | '=' | '!' | '<' | '>')
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(ch) = self.current_char {
            if Self::is_delimiter(ch) {
                break;
            }
            word.push(ch);
            self.advance();
        }

        // Check for keywords (case-insensitive)
        match word.to_uppercase().as_str() {
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            "WHERE" => Token::Where,
            "INNER" => Token::Inner,
            "LEFT" => Token::Left,
            "RIGHT" => Token::Right,
            "JOIN" => Token::Join,
            "ON" => Token::On,
            "GROUP" => Token::Group,
            "BY" => Token::By,
            "AND" => Token::And,
            "OR" => Token::Or,
            "COUNT" => Token::Count,
            "AVG" => Token::Avg,
            "SUM" => Token::Sum,
            "MIN" => Token::Min,
            "MAX" => Token::Max,
            _ => Token::Word(word),
        }
    }

    fn next_token(&mut self) -> Spanned {
        self.skip_whitespace();

        let start = self.byte_pos;
        let token = match self.current_char {
            None => Token::Eof,

            Some('=') => {
                self.advance();
                Token::Equal
            }

            Some('!') => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::NotEqual
                } else {
                    Token::Bang
                }
            }

            Some('<') => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::LessThanEq
                } else {
                    Token::LessThan
                }
            }

            Some('>') => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    Token::GreaterThanEq
                } else {
                    Token::GreaterThan
                }
            }

            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some('*') => {
                self.advance();
                Token::Star
            }
            Some('(') => {
                self.advance();
                Token::LeftParen
            }
            Some(')') => {
                self.advance();
                Token::RightParen
            }

            Some(_) => self.read_word(),
        };

        Spanned {
            token,
            start,
            end: self.byte_pos,
        }
    }

    pub fn tokenize(&mut self) -> Vec<Spanned> {
        let mut tokens = Vec::new();

        loop {
            let spanned = self.next_token();
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                break;
            }
        }

        tokens
    }
}
