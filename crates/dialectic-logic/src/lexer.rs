// Lexer for formal expressions
// Accepts the Unicode connectives and their ASCII spellings. Offsets are
// character offsets into the source string.

use dialectic_error::{FormulaError, FormulaResult};

/// Token types for the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Not,
    And,
    Or,
    Implies,
    Iff,
    LeftParen,
    RightParen,
    Comma,
    /// Comparison operator, stored in canonical ASCII form
    Compare(&'static str),
    Const(bool),
    Ident(String),
    Eof,
}

/// Token with its position in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

impl PositionedToken {
    pub fn new(token: Token, start: usize, end: usize) -> Self {
        Self { token, start, end }
    }

    /// Format token for error messages
    pub fn format_for_error(&self) -> String {
        match &self.token {
            Token::Not => "'¬'".to_string(),
            Token::And => "'∧'".to_string(),
            Token::Or => "'∨'".to_string(),
            Token::Implies => "'→'".to_string(),
            Token::Iff => "'↔'".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Compare(op) => format!("operator '{}'", op),
            Token::Const(b) => format!("constant {}", b),
            Token::Ident(name) => format!("name '{}'", name),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// Lexer over a formal-expression string
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    pub fn tokenize(&mut self) -> FormulaResult<Vec<PositionedToken>> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let start = self.position;
            let Some(ch) = self.peek(0) else {
                break;
            };

            let token = match ch {
                '(' => self.single(Token::LeftParen),
                ')' => self.single(Token::RightParen),
                ',' => self.single(Token::Comma),
                '¬' | '~' => self.single(Token::Not),
                '∧' => self.single(Token::And),
                '∨' => self.single(Token::Or),
                '→' | '⇒' => self.single(Token::Implies),
                '↔' | '⇔' => self.single(Token::Iff),
                '⊤' => self.single(Token::Const(true)),
                '⊥' => self.single(Token::Const(false)),
                '≥' => self.single(Token::Compare(">=")),
                '≤' => self.single(Token::Compare("<=")),
                '≠' => self.single(Token::Compare("!=")),
                '&' => self.repeatable('&', Token::And),
                '|' => self.repeatable('|', Token::Or),
                '!' => {
                    if self.peek(1) == Some('=') {
                        self.take(2, Token::Compare("!="))
                    } else {
                        self.single(Token::Not)
                    }
                }
                '<' => match (self.peek(1), self.peek(2)) {
                    (Some('-'), Some('>')) | (Some('='), Some('>')) => self.take(3, Token::Iff),
                    (Some('='), _) => self.take(2, Token::Compare("<=")),
                    _ => self.single(Token::Compare("<")),
                },
                '=' => match self.peek(1) {
                    Some('>') => self.take(2, Token::Implies),
                    Some('=') => self.take(2, Token::Compare("=")),
                    _ => self.single(Token::Compare("=")),
                },
                '>' => match self.peek(1) {
                    Some('=') => self.take(2, Token::Compare(">=")),
                    _ => self.single(Token::Compare(">")),
                },
                '-' if self.peek(1) == Some('>') => self.take(2, Token::Implies),
                ch if is_ident_char(ch) || ch == '-' => self.read_ident(),
                ch => {
                    return Err(FormulaError::UnexpectedChar { ch, offset: start });
                }
            };
            tokens.push(PositionedToken::new(token, start, self.position));
        }

        tokens.push(PositionedToken::new(Token::Eof, self.position, self.position));
        Ok(tokens)
    }

    /// Source text from `offset` to the end, trimmed
    pub fn fragment_from(&self, offset: usize) -> String {
        self.chars
            .get(offset..)
            .map(|rest| rest.iter().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.position + ahead).copied()
    }

    fn single(&mut self, token: Token) -> Token {
        self.take(1, token)
    }

    fn take(&mut self, width: usize, token: Token) -> Token {
        self.position += width;
        token
    }

    /// `&` and `&&` both mean the same connective
    fn repeatable(&mut self, ch: char, token: Token) -> Token {
        let width = if self.peek(1) == Some(ch) { 2 } else { 1 };
        self.take(width, token)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(0), Some(c) if c.is_whitespace()) {
            self.position += 1;
        }
    }

    fn read_ident(&mut self) -> Token {
        let mut value = String::new();
        while let Some(ch) = self.peek(0) {
            let hyphen = ch == '-' && self.peek(1) != Some('>');
            if is_ident_char(ch) || hyphen {
                value.push(ch);
                self.position += 1;
            } else {
                break;
            }
        }

        match value.as_str() {
            "true" | "True" | "TRUE" => Token::Const(true),
            "false" | "False" | "FALSE" => Token::Const(false),
            _ => Token::Ident(value),
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '.' | '\'' | '$' | '%' | '@' | '#')
}
