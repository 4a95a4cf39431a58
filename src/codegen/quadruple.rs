use std::fmt;

use serde::Serialize;

/// The closed set of operations the machine-code stage understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpCode {
    Declarar,
    Asig,
    Call,
    Comparar,
    SaltoCondicional,
    SaltoIncondicional,
    Decremento,
    DeclararEtiqueta,
    Fin,
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpCode::Declarar => "DECLARAR",
            OpCode::Asig => "ASIG",
            OpCode::Call => "CALL",
            OpCode::Comparar => "COMPARAR",
            OpCode::SaltoCondicional => "SALTO_CONDICIONAL",
            OpCode::SaltoIncondicional => "SALTO_INCONDICIONAL",
            OpCode::Decremento => "DECREMENTO",
            OpCode::DeclararEtiqueta => "DECLARAR_ETIQUETA",
            OpCode::Fin => "FIN",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    Number(f64),
    /// Robot, component, temporary (`Tk`), counter (`CXk`) or label (`Lk`).
    Name(String),
}

impl Operand {
    pub fn name(s: impl Into<String>) -> Self {
        Operand::Name(s.into())
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(s) => Some(s),
            Operand::Number(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Name(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Quadruple {
    pub op: OpCode,
    pub arg1: Option<Operand>,
    pub arg2: Option<Operand>,
    pub result: Option<Operand>,
}

impl Quadruple {
    pub fn new(
        op: OpCode,
        arg1: Option<Operand>,
        arg2: Option<Operand>,
        result: Option<Operand>,
    ) -> Self {
        Self {
            op,
            arg1,
            arg2,
            result,
        }
    }

    /// Operand as printed in tables; absent operands print as `-`.
    pub fn column(operand: &Option<Operand>) -> String {
        match operand {
            Some(o) => o.to_string(),
            None => "-".to_string(),
        }
    }
}

impl fmt::Display for Quadruple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.op,
            Self::column(&self.arg1),
            Self::column(&self.arg2),
            Self::column(&self.result)
        )
    }
}
