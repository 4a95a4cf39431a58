use std::fmt;

use serde::Serialize;

use crate::parser::Assignment;

pub const DECLARATION_METHOD: &str = "DECLARACION";

/// Parameter recorded for every assignment symbol.
const ASSIGNMENT_ARITY: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Symbol {
    /// Robot name.
    pub id: String,
    /// `DECLARACION` or a component name.
    pub method: String,
    /// `None` for declarations, rendered as `-`.
    pub parameter: Option<u32>,
    /// Assigned value truncated toward zero; `None` renders as `-`.
    pub value: Option<i64>,
    pub line: usize,
}

impl Symbol {
    pub fn is_declaration(&self) -> bool {
        self.method == DECLARATION_METHOD
    }
}

fn dash_or<T: fmt::Display>(v: &Option<T>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "| {:<6} | {:<11} | {:<9} | {:<5} |",
            self.id,
            self.method,
            dash_or(&self.parameter),
            dash_or(&self.value)
        )
    }
}

/// Append-only record of declarations and assignments, in source order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn declare_robot(&mut self, name: &str, line: usize) {
        self.symbols.push(Symbol {
            id: name.to_string(),
            method: DECLARATION_METHOD.to_string(),
            parameter: None,
            value: None,
            line,
        });
    }

    pub fn record_assignment(&mut self, assignment: &Assignment) {
        let value = if assignment.component.is_block_marker() {
            None
        } else {
            Some(assignment.value.trunc() as i64)
        };
        self.symbols.push(Symbol {
            id: assignment.robot.clone(),
            method: assignment.component.name().to_string(),
            parameter: Some(ASSIGNMENT_ARITY),
            value,
            line: assignment.line,
        });
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|s| s.is_declaration())
    }
}
