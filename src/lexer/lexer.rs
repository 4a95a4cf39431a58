use log::{debug, trace};
use logos::Logos;

use crate::diagnostic::Diagnostic;

use super::{classify_identifier, LexError, Token, TokenKind};

#[derive(Debug)]
pub struct Lexer {
    tokens: Vec<Token>,
    errors: Vec<Diagnostic>,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new() -> Self {
        Self {
            tokens: vec![],
            errors: vec![],
            line: 1,
            column: 1,
        }
    }

    fn new_token(&mut self, kind: TokenKind, s: &str) {
        trace!("{}:{} {} {:?}", self.line, self.column, kind, s);
        self.tokens.push(Token {
            kind,
            value: s.to_string(),
            line: self.line,
            column: self.column,
        });
    }

    /// Moves the line/column cursor over a lexeme, emitted or not.
    fn advance(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn _tokenize(&mut self, s: &str) {
        let mut lex = TokenKind::lexer(s);

        while let Some(result) = lex.next() {
            let slice = lex.slice();
            match result {
                Ok(kind) if kind.is_trivia() => (),
                Ok(TokenKind::Identifier) => self.new_token(classify_identifier(slice), slice),
                Ok(kind) => self.new_token(kind, slice),
                Err(LexError::UnknownCharacter) => {
                    self.errors.push(Diagnostic::lexical(
                        self.line,
                        self.column,
                        format!("unrecognized character '{}'", slice),
                    ));
                    self.new_token(TokenKind::Unknown, slice);
                }
                Err(LexError::UnterminatedComment) => {
                    self.errors.push(Diagnostic::lexical(
                        self.line,
                        self.column,
                        "unterminated block comment",
                    ));
                }
            }
            self.advance(slice);
        }
    }

    /// Scans the whole input. Never fails: malformed input turns into
    /// `Unknown` tokens plus lexical errors.
    pub fn tokenize(s: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut lexer = Lexer::new();
        lexer._tokenize(s);
        debug!(
            "lexed {} tokens over {} lines, {} lexical errors",
            lexer.tokens.len(),
            lexer.line,
            lexer.errors.len()
        );

        (lexer.tokens, lexer.errors)
    }
}
