//! Lexer (tokenizer) for script source code
//!
//! Converts raw source text into a lazy [`Token`] stream consumed by the
//! parser. Illegal characters never abort the scan: each one is recorded as a
//! [`LexError`] in the lexer's diagnostics buffer, skipped, and scanning
//! resumes with the next character.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;

/// Kinds of tokens produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // Literals
    Identifier,
    Number,
    String,

    // Keywords
    Function,
    While,
    Var,
    Let,
    Const,
    True,
    False,
    Return,
    Try,
    Catch,
    Finally,

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Comma,     // ,
    Equals,    // =
    Plus,      // +
    Minus,     // -
    Semicolon, // ;
    Star,      // *
    Slash,     // /
    Greater,   // >
    Less,      // <
    Colon,     // :

    // End of file
    Eof,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Function
                | TokenKind::While
                | TokenKind::Var
                | TokenKind::Let
                | TokenKind::Const
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Return
                | TokenKind::Try
                | TokenKind::Catch
                | TokenKind::Finally
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Function => "'function'",
            TokenKind::While => "'while'",
            TokenKind::Var => "'var'",
            TokenKind::Let => "'let'",
            TokenKind::Const => "'const'",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Return => "'return'",
            TokenKind::Try => "'try'",
            TokenKind::Catch => "'catch'",
            TokenKind::Finally => "'finally'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Equals => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Semicolon => "';'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Greater => "'>'",
            TokenKind::Less => "'<'",
            TokenKind::Colon => "':'",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// A classified, positioned lexical unit.
///
/// For string literals `lexeme` holds the content without the quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        self.location
    }

    /// Length of the token's source text in characters, quotes included.
    pub fn width(&self) -> usize {
        match self.kind {
            TokenKind::String => self.lexeme.chars().count() + 2,
            TokenKind::Eof => 0,
            _ => self.lexeme.chars().count(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.lexeme),
            TokenKind::Number => write!(f, "number {}", self.lexeme),
            TokenKind::String => write!(f, "string \"{}\"", self.lexeme),
            kind => write!(f, "{}", kind),
        }
    }
}

/// Recoverable lexical error: a character no token rule accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Illegal character '{character}' at line {}, column {}",
    .location.line,
    .location.column
)]
pub struct LexError {
    pub character: char,
    pub location: SourceLocation,
}

/// Lexer options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerConfig {
    /// Accept `.` after the first character of an identifier, so that
    /// `console.log` lexes as a single identifier.
    pub dotted_identifiers: bool,
}

impl LexerConfig {
    pub fn with_dotted_identifiers(mut self) -> Self {
        self.dotted_identifiers = true;
        self
    }
}

fn reserved_words() -> FxHashMap<&'static str, TokenKind> {
    [
        ("function", TokenKind::Function),
        ("while", TokenKind::While),
        ("var", TokenKind::Var),
        ("let", TokenKind::Let),
        ("const", TokenKind::Const),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("return", TokenKind::Return),
        ("try", TokenKind::Try),
        ("catch", TokenKind::Catch),
        ("finally", TokenKind::Finally),
    ]
    .into_iter()
    .collect()
}

/// Lexer for script source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    config: LexerConfig,
    keywords: FxHashMap<&'static str, TokenKind>,
    diagnostics: Vec<LexError>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self::with_config(input, LexerConfig::default())
    }

    pub fn with_config(input: &str, config: LexerConfig) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            config,
            keywords: reserved_words(),
            diagnostics: Vec::new(),
        }
    }

    /// Illegal characters reported so far, in scan order.
    pub fn diagnostics(&self) -> &[LexError] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<LexError> {
        self.diagnostics
    }

    /// Produce the next token. Once the input is exhausted this keeps
    /// returning an `Eof` token.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let loc = self.current_location();
            let Some(ch) = self.advance() else {
                return Token::new(TokenKind::Eof, "", loc);
            };

            let kind = match ch {
                '"' => {
                    if let Some(token) = self.string_literal(loc) {
                        return token;
                    }
                    self.report_illegal(ch, loc);
                    continue;
                }
                '0'..='9' => return self.number_literal(ch, loc),
                'a'..='z' | 'A'..='Z' | '_' => return self.identifier_or_keyword(ch, loc),
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ',' => TokenKind::Comma,
                '=' => TokenKind::Equals,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                ';' => TokenKind::Semicolon,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '>' => TokenKind::Greater,
                '<' => TokenKind::Less,
                ':' => TokenKind::Colon,
                _ => {
                    self.report_illegal(ch, loc);
                    continue;
                }
            };

            return Token::new(kind, ch.to_string(), loc);
        }
    }

    fn report_illegal(&mut self, character: char, location: SourceLocation) {
        self.diagnostics.push(LexError {
            character,
            location,
        });
    }

    /// Scan a string literal whose opening quote has been consumed.
    ///
    /// Returns `None` and rewinds to just after the opening quote when no
    /// closing quote exists.
    fn string_literal(&mut self, loc: SourceLocation) -> Option<Token> {
        let saved = (self.position, self.line, self.column);
        let mut content = String::new();

        while let Some(ch) = self.advance() {
            if ch == '"' {
                return Some(Token::new(TokenKind::String, content, loc));
            }
            content.push(ch);
        }

        (self.position, self.line, self.column) = saved;
        None
    }

    /// Parse numeric literal (decimal digits only)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut digits = String::new();
        digits.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(TokenKind::Number, digits, loc)
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric()
                || ch == '_'
                || (ch == '.' && self.config.dotted_identifiers)
            {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = self
            .keywords
            .get(ident.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);

        Token::new(kind, ident, loc)
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}

/// Tokenize a whole source string eagerly.
///
/// The returned tokens do not include the trailing `Eof`.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LexError>) {
    tokenize_with(source, LexerConfig::default())
}

pub fn tokenize_with(source: &str, config: LexerConfig) -> (Vec<Token>, Vec<LexError>) {
    let mut lexer = Lexer::with_config(source, config);
    let tokens = lexer.by_ref().collect();
    (tokens, lexer.into_diagnostics())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let (tokens, diagnostics) = tokenize("function add(x, y){ return 1; }");
        assert!(diagnostics.is_empty());

        let expected = [
            TokenKind::Function,
            TokenKind::Identifier,
            TokenKind::LParen,
            TokenKind::Identifier,
            TokenKind::Comma,
            TokenKind::Identifier,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::RBrace,
        ];
        let actual: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(actual, expected);
        assert_eq!(tokens[1].lexeme, "add");
        assert_eq!(tokens[9].lexeme, "1");
    }

    #[test]
    fn test_keywords_win_over_identifiers() {
        assert_eq!(kinds("while"), vec![TokenKind::While]);
        assert_eq!(
            kinds("function while var let const true false return try catch finally"),
            vec![
                TokenKind::Function,
                TokenKind::While,
                TokenKind::Var,
                TokenKind::Let,
                TokenKind::Const,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Return,
                TokenKind::Try,
                TokenKind::Catch,
                TokenKind::Finally,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        let (tokens, _) = tokenize("variable returned trying");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
        assert_eq!(tokens[0].lexeme, "variable");
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("( ) { } , = + - ; * / > < :"),
            vec![
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::Equals,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Semicolon,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Greater,
                TokenKind::Less,
                TokenKind::Colon,
            ]
        );
    }

    #[test]
    fn test_string_literal_strips_quotes() {
        let (tokens, _) = tokenize(r#""hello world""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "hello world");
        assert_eq!(tokens[0].width(), 13);
    }

    #[test]
    fn test_unterminated_string_is_illegal_quote() {
        let (tokens, diagnostics) = tokenize("\"abc");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].character, '"');
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "abc");
        assert_eq!(tokens[0].location, SourceLocation::new(1, 2));
    }

    #[test]
    fn test_illegal_character_recovery() {
        let (tokens, diagnostics) = tokenize("x @ y;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].character, '@');
        assert_eq!(diagnostics[0].location, SourceLocation::new(1, 3));

        let lexemes: Vec<_> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["x", "y", ";"]);
    }

    #[test]
    fn test_line_tracking() {
        let (tokens, _) = tokenize("a\n\n  b \"multi\nline\" c");
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(3, 3));
        assert_eq!(tokens[2].location, SourceLocation::new(3, 5));
        assert_eq!(tokens[3].location.line, 4);
    }

    #[test]
    fn test_dotted_identifiers_are_opt_in() {
        let (plain, plain_diags) = tokenize("console.log");
        assert_eq!(plain.len(), 2);
        assert_eq!(plain_diags.len(), 1);
        assert_eq!(plain_diags[0].character, '.');

        let config = LexerConfig::default().with_dotted_identifiers();
        let (dotted, dotted_diags) = tokenize_with("console.log", config);
        assert!(dotted_diags.is_empty());
        assert_eq!(dotted.len(), 1);
        assert_eq!(dotted[0].lexeme, "console.log");
    }

    #[test]
    fn test_next_token_repeats_eof() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_numbers_are_raw_digits() {
        let (tokens, _) = tokenize("007 42abc");
        assert_eq!(tokens[0].lexeme, "007");
        assert_eq!(tokens[1].lexeme, "42");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }
}
