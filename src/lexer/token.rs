use std::fmt;

use logos::Logos;
use phf::phf_set;
use serde::Serialize;

/// Reserved words, stored lower case. Lookups are case-insensitive.
pub static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "robot",
    // arm components
    "base", "hombro", "codo", "garra", "muneca", "velocidad",
    // legacy motion commands
    "girai", "giraf", "abre", "cierra", "mueve", "rotara", "posicion",
    "parar", "continuar",
    // routines and timing
    "espera", "inicio", "fin", "repetir", "veces",
    // directions and positions
    "arriba", "abajo", "izquierda", "derecha", "adelante", "atras",
    "centro", "home", "inicial",
    // conditions
    "si", "entonces", "sino", "mientras", "cuando", "hasta",
    // sensors and actuators
    "sensor", "motor", "servomotor", "encoder", "limite",
    // units
    "grados", "radianes", "mm", "cm", "segundos", "milisegundos",
    "rpm", "velocidad_max", "velocidad_min",
};

pub static BOOLEAN_LITERALS: phf::Set<&'static str> = phf_set! {
    "verdadero", "falso", "activado", "desactivado",
};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum LexError {
    #[default]
    UnknownCharacter,
    UnterminatedComment,
}

fn block_comment(lex: &mut logos::Lexer<TokenKind>) -> Result<(), LexError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexError::UnterminatedComment)
        }
    }
}

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[logos(error = LexError)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    // Produced by reclassifying identifiers, never matched directly.
    Keyword,
    BooleanLiteral,
    Unknown,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"-?[0-9]+")]
    IntegerLiteral,
    #[regex(r"-?[0-9]+\.[0-9]+")]
    FloatLiteral,

    #[token("=")]
    AssignOp,
    #[regex(r"==|!=|<=|>=|<|>")]
    ComparisonOp,
    #[regex(r"[+\-*/%]")]
    ArithmeticOp,
    #[regex(r"&&|\|\||!")]
    LogicalOp,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,

    #[regex(r"[ \t\r]+")]
    Whitespace,
    #[token("\n")]
    Newline,
    #[token("/*", block_comment)]
    #[regex(r"//[^\n]*")]
    #[regex(r"#[^\n]*")]
    Comment,
}

impl TokenKind {
    /// Kinds that move the cursor but never reach the parser.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment
        )
    }

    pub fn is_number(&self) -> bool {
        matches!(self, TokenKind::IntegerLiteral | TokenKind::FloatLiteral)
    }

    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "reserved word",
            TokenKind::Identifier => "user-defined identifier",
            TokenKind::IntegerLiteral => "integer number",
            TokenKind::FloatLiteral => "decimal number",
            TokenKind::BooleanLiteral => "boolean value",
            TokenKind::AssignOp => "assignment operator",
            TokenKind::ComparisonOp => "comparison operator",
            TokenKind::ArithmeticOp => "arithmetic operator",
            TokenKind::LogicalOp => "logical operator",
            TokenKind::LBrace => "block opening",
            TokenKind::RBrace => "block closing",
            TokenKind::LParen => "left parenthesis",
            TokenKind::RParen => "right parenthesis",
            TokenKind::LBracket => "left bracket",
            TokenKind::RBracket => "right bracket",
            TokenKind::Semicolon => "statement terminator",
            TokenKind::Comma => "separator",
            TokenKind::Dot => "member access",
            TokenKind::Colon => "colon",
            TokenKind::Unknown => "UNKNOWN CHARACTER",
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::Comment => "ignored",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::IntegerLiteral => "INTEGER_LITERAL",
            TokenKind::FloatLiteral => "FLOAT_LITERAL",
            TokenKind::BooleanLiteral => "BOOLEAN_LITERAL",
            TokenKind::AssignOp => "ASSIGN_OP",
            TokenKind::ComparisonOp => "COMPARISON_OP",
            TokenKind::ArithmeticOp => "ARITHMETIC_OP",
            TokenKind::LogicalOp => "LOGICAL_OP",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Colon => "COLON",
            TokenKind::Unknown => "UNKNOWN",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Comment => "COMMENT",
        };
        write!(f, "{name}")
    }
}

/// Promotes an identifier lexeme to a keyword or boolean literal when it
/// matches a reserved word, ignoring case.
pub fn classify_identifier(lexeme: &str) -> TokenKind {
    let lower = lexeme.to_ascii_lowercase();
    if BOOLEAN_LITERALS.contains(lower.as_str()) {
        TokenKind::BooleanLiteral
    } else if KEYWORDS.contains(lower.as_str()) {
        TokenKind::Keyword
    } else {
        TokenKind::Identifier
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.value.eq_ignore_ascii_case(word)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({}, '{}', {}:{})",
            self.kind, self.value, self.line, self.column
        )
    }
}
