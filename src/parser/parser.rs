use log::{debug, trace};

use crate::{
    analyzer::SymbolTable,
    diagnostic::Diagnostic,
    lexer::{Token, TokenKind},
};

use super::{Assignment, Component, Declaration, Program};

/// Values outside this interval parse, but draw a warning.
const TYPICAL_RANGE: (f64, f64) = (0.0, 360.0);

type ParseResult<T> = Result<T, Diagnostic>;

/// Everything a parse run accumulated, including what was recorded
/// before a structural error stopped it.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub program: Program,
    pub symbol_table: SymbolTable,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

#[derive(Debug)]
pub struct Parser<'a> {
    tokens: &'a [Token],
    index: usize,
    output: ParseOutput,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            index: 0,
            output: ParseOutput::default(),
        }
    }

    /// Returns false as soon as a structural error is found, or when there
    /// is nothing to parse. The error is kept in the output and nothing
    /// after it is parsed.
    pub fn parse(&mut self) -> bool {
        if self.tokens.is_empty() {
            self.output
                .errors
                .push(Diagnostic::syntax(1, 1, "no code to analyze"));
            return false;
        }

        match self.parse_program() {
            Ok(()) => {
                debug!(
                    "parsed {} declarations and {} assignments",
                    self.output.program.declarations.len(),
                    self.output.program.assignments.len()
                );
                true
            }
            Err(e) => {
                debug!("parse aborted: {}", e);
                self.output.errors.push(e);
                false
            }
        }
    }

    pub fn program(&self) -> &Program {
        &self.output.program
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.output.symbol_table
    }

    pub fn into_output(self) -> ParseOutput {
        self.output
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.index)
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        match self.peek() {
            Some(t) if t.kind == kind => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<&'a Token> {
        match self.peek() {
            Some(t) if t.kind == kind => {
                self.index += 1;
                Ok(t)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Diagnostic for the token under the cursor, or for end of input.
    fn unexpected(&self, expected: &str) -> Diagnostic {
        match self.peek() {
            Some(t) => Diagnostic::syntax(
                t.line,
                t.column,
                format!("expected {}, found {} '{}'", expected, t.kind, t.value),
            ),
            None => {
                let (line, column) = self
                    .tokens
                    .last()
                    .map(|t| (t.line, t.column + t.value.chars().count()))
                    .unwrap_or((1, 1));
                Diagnostic::syntax(
                    line,
                    column,
                    format!("expected {}, found end of input", expected),
                )
            }
        }
    }

    /// program = robot_decl*
    fn parse_program(&mut self) -> ParseResult<()> {
        while let Some(t) = self.peek() {
            if t.is_keyword("robot") {
                self.parse_robot_decl()?;
            } else if t.kind == TokenKind::Identifier {
                // Instruction outside its robot's declaration. Recorded so the
                // semantic pass can accept or reject the robot name.
                self.parse_instruction()?;
            } else {
                return Err(self.unexpected("'Robot' or a robot instruction"));
            }
        }

        Ok(())
    }

    /// robot_decl = "Robot" ident instruction*
    fn parse_robot_decl(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::Keyword, "'Robot'")?;
        let name = self.expect(TokenKind::Identifier, "robot name (identifier)")?;
        trace!("declaration of {} at line {}", name.value, name.line);

        self.output.symbol_table.declare_robot(&name.value, name.line);
        self.output.program.declarations.push(Declaration {
            robot: name.value.clone(),
            line: name.line,
        });

        while let Some(t) = self.peek() {
            if t.kind != TokenKind::Identifier || t.value != name.value {
                break;
            }
            self.parse_instruction()?;
        }

        Ok(())
    }

    /// instruction = ident "." component "=" number
    ///             | ident "." ("inicio" | "fin") ("=" number)?
    fn parse_instruction(&mut self) -> ParseResult<()> {
        let robot = self.expect(TokenKind::Identifier, "robot name")?;
        self.expect(TokenKind::Dot, "'.'")?;
        let component = self.parse_component()?;

        let value = if component.is_block_marker() {
            if self.consume(TokenKind::AssignOp) {
                self.parse_number()?;
            }
            0.0
        } else {
            self.expect(TokenKind::AssignOp, "'='")?;
            self.parse_number()?
        };

        let assignment = Assignment {
            robot: robot.value.clone(),
            component,
            value,
            line: robot.line,
        };
        trace!("assignment {} at line {}", assignment, assignment.line);
        self.output.symbol_table.record_assignment(&assignment);
        self.output.program.assignments.push(assignment);

        Ok(())
    }

    fn parse_component(&mut self) -> ParseResult<Component> {
        let Some(t) = self.peek().filter(|t| t.kind == TokenKind::Keyword) else {
            return Err(self.unexpected("component keyword"));
        };
        let Some(component) = Component::from_name(&t.value) else {
            let valid = Component::ALL.map(|c| c.name()).join(", ");
            return Err(Diagnostic::syntax(
                t.line,
                t.column,
                format!(
                    "'{}' is not a valid component (valid components: {})",
                    t.value, valid
                ),
            ));
        };

        self.index += 1;
        Ok(component)
    }

    /// number = INTEGER_LITERAL | FLOAT_LITERAL
    fn parse_number(&mut self) -> ParseResult<f64> {
        let Some(t) = self.peek().filter(|t| t.kind.is_number()) else {
            return Err(self.unexpected("numeric value"));
        };
        let value: f64 = t.value.parse().map_err(|_| {
            Diagnostic::syntax(t.line, t.column, format!("invalid number '{}'", t.value))
        })?;
        self.index += 1;

        let (min, max) = TYPICAL_RANGE;
        if value < min || value > max {
            self.output.warnings.push(
                Diagnostic::syntax(
                    t.line,
                    t.column,
                    format!("value {} outside the typical range ({}-{})", value, min, max),
                )
                .into_warning(),
            );
        }

        Ok(value)
    }
}
