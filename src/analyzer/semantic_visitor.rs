use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{
    diagnostic::Diagnostic,
    parser::{Assignment, Component, Program},
};

use super::{value_range, SymbolTable};

/// Several assignments to the same joint are how motion sequences are
/// written, so repeated assignment is accepted.
const ALLOW_REASSIGNMENT: bool = true;

/// Runs every semantic check to completion and collects all findings.
pub struct SemanticVisitor {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl SemanticVisitor {
    pub fn new() -> Self {
        Self {
            errors: vec![],
            warnings: vec![],
        }
    }

    /// Returns true when no semantic error was found.
    pub fn visit_program(&mut self, program: &Program, symbol_table: &SymbolTable) -> bool {
        self.visit_symbols(program, symbol_table);
        self.check_blocks(program);
        self.summary()
    }

    /// Checks what a parse recorded before it was cut short. Block balance
    /// is skipped: a truncated program leaves blocks open.
    pub fn visit_partial_program(
        &mut self,
        program: &Program,
        symbol_table: &SymbolTable,
    ) -> bool {
        self.visit_symbols(program, symbol_table);
        self.summary()
    }

    fn visit_symbols(&mut self, program: &Program, symbol_table: &SymbolTable) {
        self.check_unique_declarations(symbol_table);
        self.check_reassignments(program);
        self.check_value_ranges(program);
        self.check_declared_before_use(symbol_table);
    }

    fn summary(&self) -> bool {
        debug!(
            "semantic pass: {} errors, {} warnings",
            self.errors.len(),
            self.warnings.len()
        );
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn into_diagnostics(self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        (self.errors, self.warnings)
    }

    fn check_unique_declarations(&mut self, symbol_table: &SymbolTable) {
        let mut first_seen: HashMap<&str, usize> = HashMap::new();

        for symbol in symbol_table.declarations() {
            if let Some(first) = first_seen.get(symbol.id.as_str()) {
                self.errors.push(Diagnostic::semantic(
                    symbol.line,
                    format!(
                        "robot '{}' declared more than once (first declared at line {})",
                        symbol.id, first
                    ),
                ));
            } else {
                first_seen.insert(&symbol.id, symbol.line);
            }
        }
    }

    fn check_reassignments(&mut self, program: &Program) {
        let mut seen: HashMap<(&str, Component), usize> = HashMap::new();

        for a in &program.assignments {
            if a.component.is_block_marker() {
                continue;
            }
            match seen.get(&(a.robot.as_str(), a.component)) {
                Some(first) if !ALLOW_REASSIGNMENT => self.errors.push(Diagnostic::semantic(
                    a.line,
                    format!(
                        "'{}.{}' already assigned at line {}",
                        a.robot, a.component, first
                    ),
                )),
                Some(_) => (),
                None => {
                    seen.insert((a.robot.as_str(), a.component), a.line);
                }
            }
        }
    }

    fn check_value_ranges(&mut self, program: &Program) {
        for a in &program.assignments {
            let Some(range) = value_range(a.component) else {
                continue;
            };

            if !range.contains(a.value) {
                self.errors.push(Diagnostic::semantic(
                    a.line,
                    format!(
                        "value {} out of valid range [{}, {}] for '{}.{}' ({})",
                        a.value, range.min, range.max, a.robot, a.component, range.description
                    ),
                ));
            } else if range.is_boundary(a.value) {
                self.warnings.push(
                    Diagnostic::semantic(
                        a.line,
                        format!(
                            "value {} is at the boundary of the valid range for '{}.{}'",
                            a.value, a.robot, a.component
                        ),
                    )
                    .into_warning(),
                );
            }

            if a.component == Component::Repetir && a.value.fract() != 0.0 {
                self.errors.push(Diagnostic::semantic(
                    a.line,
                    format!(
                        "repeat count {} for '{}' must be a whole number",
                        a.value, a.robot
                    ),
                ));
            }
        }
    }

    fn check_declared_before_use(&mut self, symbol_table: &SymbolTable) {
        let mut declared: HashSet<&str> = HashSet::new();

        for symbol in symbol_table.symbols() {
            if symbol.is_declaration() {
                declared.insert(&symbol.id);
            } else if !declared.contains(symbol.id.as_str()) {
                self.errors.push(Diagnostic::semantic(
                    symbol.line,
                    format!("robot '{}' used without prior declaration", symbol.id),
                ));
            }
        }
    }

    /// `inicio`/`fin` must pair up per robot, and `repetir` only means
    /// something right before an `inicio`.
    fn check_blocks(&mut self, program: &Program) {
        for (robot, assignments) in program.assignments_by_robot() {
            let mut open: Vec<usize> = vec![];

            for (i, a) in assignments.iter().enumerate() {
                match a.component {
                    Component::Inicio => open.push(a.line),
                    Component::Fin => {
                        if open.pop().is_none() {
                            self.errors.push(Diagnostic::semantic(
                                a.line,
                                format!("'{}.fin' without a matching 'inicio'", robot),
                            ));
                        }
                    }
                    Component::Repetir if !starts_block(assignments.get(i + 1)) => {
                        self.warnings.push(
                            Diagnostic::semantic(
                                a.line,
                                format!(
                                    "repeat count for '{}' is ignored: no 'inicio' follows",
                                    robot
                                ),
                            )
                            .into_warning(),
                        );
                    }
                    _ => (),
                }
            }

            for line in open {
                self.errors.push(Diagnostic::semantic(
                    line,
                    format!("block opened by '{}.inicio' is never closed", robot),
                ));
            }
        }
    }
}

fn starts_block(next: Option<&&Assignment>) -> bool {
    next.is_some_and(|a| a.component == Component::Inicio)
}
