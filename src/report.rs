use std::fmt;

use crate::{codegen::Quadruple, lexer::TokenKind, Analysis};

const RULE_WIDTH: usize = 85;

/// Plain-text rendering of one analysis run.
///
/// With errors present only the status, the errors, the warnings and any
/// unknown characters are shown. Empty input is always an error, so the
/// full listing never renders without tokens. Otherwise the tokens, symbol table,
/// quadruples and warnings follow in that order, then per-robot listings
/// and token statistics.
pub struct Report<'a>(pub &'a Analysis);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;

        writeln!(f, "=== ROBOT ARM LANGUAGE ANALYZER ===")?;
        self.fmt_status(f)?;

        if !analysis.errors.is_empty() {
            self.fmt_errors(f)?;
            self.fmt_warnings(f)?;
            return self.fmt_unknown_tokens(f);
        }

        self.fmt_tokens(f)?;
        self.fmt_symbols(f)?;
        self.fmt_quadruples(f)?;
        self.fmt_warnings(f)?;
        self.fmt_robots(f)?;
        self.fmt_statistics(f)
    }
}

impl Report<'_> {
    fn fmt_status(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;
        let syntax = if analysis.syntax_valid { "OK" } else { "ERRORS FOUND" };
        let semantic = match (analysis.semantic_checked, analysis.semantic_valid) {
            (false, _) => "NOT RUN (no symbols recorded)",
            (true, true) => "OK",
            (true, false) => "ERRORS FOUND",
        };
        writeln!(f, "syntax analysis:   {syntax}")?;
        writeln!(f, "semantic analysis: {semantic}")?;
        writeln!(f)
    }

    fn fmt_errors(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== ERRORS ===")?;
        for e in &self.0.errors {
            writeln!(f, "{e}")?;
        }
        writeln!(f)
    }

    fn fmt_warnings(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.warnings.is_empty() {
            return Ok(());
        }
        writeln!(f, "=== WARNINGS ===")?;
        for w in &self.0.warnings {
            writeln!(f, "{w}")?;
        }
        writeln!(f)
    }

    fn fmt_unknown_tokens(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unknown: Vec<_> = self
            .0
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Unknown)
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }

        writeln!(f, "=== UNKNOWN TOKENS ===")?;
        writeln!(f, "{:<10} {:<6} {:<8}", "char", "line", "column")?;
        writeln!(f, "{}", "-".repeat(26))?;
        for t in unknown {
            writeln!(f, "{:<10} {:<6} {:<8}", format!("{:?}", t.value), t.line, t.column)?;
        }
        writeln!(f)
    }

    fn fmt_tokens(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== TOKENS ===")?;
        writeln!(
            f,
            "{:<20} {:<15} {:<6} {:<8} {}",
            "type", "value", "line", "column", "description"
        )?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        for t in &self.0.tokens {
            writeln!(
                f,
                "{:<20} {:<15} {:<6} {:<8} {}",
                t.kind.to_string(),
                format!("{:?}", t.value),
                t.line,
                t.column,
                t.kind.description()
            )?;
        }
        writeln!(f)
    }

    fn fmt_symbols(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== SYMBOL TABLE ===")?;
        writeln!(
            f,
            "| {:<6} | {:<11} | {:<9} | {:<5} |",
            "ID", "METHOD", "PARAMETER", "VALUE"
        )?;
        writeln!(f, "|--------|-------------|-----------|-------|")?;
        for s in self.0.symbol_table.symbols() {
            writeln!(f, "{s}")?;
        }
        writeln!(f)
    }

    fn fmt_quadruples(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== QUADRUPLES ===")?;
        writeln!(
            f,
            "{:<4} {:<20} {:<10} {:<10} {:<10}",
            "#", "operation", "arg1", "arg2", "result"
        )?;
        writeln!(f, "{}", "-".repeat(58))?;
        for (i, q) in self.0.quadruples.iter().enumerate() {
            writeln!(
                f,
                "{:<4} {:<20} {:<10} {:<10} {:<10}",
                i,
                q.op.to_string(),
                Quadruple::column(&q.arg1),
                Quadruple::column(&q.arg2),
                Quadruple::column(&q.result)
            )?;
        }
        writeln!(f)
    }

    fn fmt_robots(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = &self.0.program;
        writeln!(f, "=== ROBOTS ===")?;
        for robot in program.robot_names() {
            let assignments: Vec<_> = program.assignments_for(robot).collect();
            writeln!(f, "robot {robot}: {} instructions", assignments.len())?;
            for a in assignments {
                writeln!(f, "    {a} (line {})", a.line)?;
            }
        }
        writeln!(f)
    }

    fn fmt_statistics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let analysis = self.0;
        let stats = analysis.token_statistics();
        let total = analysis.tokens.len();

        writeln!(f, "=== STATISTICS ===")?;
        writeln!(f, "tokens:      {total}")?;
        writeln!(f, "lines:       {}", analysis.lines)?;
        writeln!(f, "assignments: {}", analysis.program.assignments.len())?;
        writeln!(f, "symbols:     {}", analysis.symbol_table.len())?;
        writeln!(f, "quadruples:  {}", analysis.quadruples.len())?;
        writeln!(f)?;
        for (kind, count) in stats {
            let percentage = count as f64 / total as f64 * 100.0;
            writeln!(f, "{kind}: {count} ({percentage:.1}%)")?;
        }
        Ok(())
    }
}
