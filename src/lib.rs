pub mod analyzer;
pub mod codegen;
pub mod diagnostic;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod report;

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use analyzer::{SemanticVisitor, Symbol, SymbolTable};
use codegen::{Codegen, Quadruple};
use diagnostic::Diagnostic;
pub use error::Error;
use lexer::{Lexer, Token, TokenKind};
use parser::{Parser, Program};
use report::Report;

/// Snapshot of one `analyze` run. Nothing is shared between runs.
#[derive(Clone, Debug, Serialize)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub syntax_valid: bool,
    /// Whether the semantic pass ran. It needs at least one symbol.
    pub semantic_checked: bool,
    /// False when the semantic pass found errors or never ran.
    pub semantic_valid: bool,
    pub program: Program,
    pub symbol_table: SymbolTable,
    /// Empty unless the run finished without any error.
    pub quadruples: Vec<Quadruple>,
    pub lines: usize,
}

impl Analysis {
    pub fn symbol_table(&self) -> &[Symbol] {
        self.symbol_table.symbols()
    }

    pub fn quadruples(&self) -> &[Quadruple] {
        &self.quadruples
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn token_statistics(&self) -> BTreeMap<TokenKind, usize> {
        let mut stats = BTreeMap::new();
        for t in &self.tokens {
            *stats.entry(t.kind).or_insert(0) += 1;
        }
        stats
    }

    pub fn formatted_report(&self) -> String {
        Report(self).to_string()
    }
}

/// Lexes, parses, validates and, when no error was found, lowers `source`
/// to quadruples. Problems in the source are reported through
/// [`Analysis::errors`]; `Err` means the pipeline itself broke an
/// invariant.
pub fn analyze(source: &str) -> Result<Analysis, Error> {
    let (tokens, mut errors) = Lexer::tokenize(source);

    let mut parser = Parser::new(&tokens);
    let syntax_valid = parser.parse();
    let parsed = parser.into_output();
    errors.extend(parsed.errors);
    let mut warnings = parsed.warnings;

    // Symbols recorded before a syntax error are still checked.
    let semantic_checked = !parsed.symbol_table.is_empty();
    let mut semantic_valid = false;
    if semantic_checked {
        let mut visitor = SemanticVisitor::new();
        semantic_valid = if syntax_valid {
            visitor.visit_program(&parsed.program, &parsed.symbol_table)
        } else {
            visitor.visit_partial_program(&parsed.program, &parsed.symbol_table)
        };
        let (semantic_errors, semantic_warnings) = visitor.into_diagnostics();
        errors.extend(semantic_errors);
        warnings.extend(semantic_warnings);
    }

    let quadruples = if errors.is_empty() {
        Codegen::new().generate(&parsed.program)?
    } else {
        debug!("{} errors, skipping intermediate code", errors.len());
        vec![]
    };

    Ok(Analysis {
        tokens,
        errors,
        warnings,
        syntax_valid,
        semantic_checked,
        semantic_valid,
        program: parsed.program,
        symbol_table: parsed.symbol_table,
        quadruples,
        lines: source.matches('\n').count() + 1,
    })
}
