use log::{debug, trace};

use crate::{
    error::Error,
    parser::{Assignment, Component, Program},
};

use super::{build_blocks, Block, OpCode, Operand, Quadruple, Stmt};

/// Lowers a validated program to quadruples.
///
/// Temporaries, counters and labels are numbered from 1 in the order they
/// are first needed and are never reused within one generator, even
/// across robots.
pub struct Codegen {
    quadruples: Vec<Quadruple>,
    temp_index: usize,
    counter_index: usize,
    label_index: usize,
}

impl Codegen {
    pub fn new() -> Self {
        Self {
            quadruples: vec![],
            temp_index: 0,
            counter_index: 0,
            label_index: 0,
        }
    }

    pub fn generate(mut self, program: &Program) -> Result<Vec<Quadruple>, Error> {
        let robots = program.robot_names();
        if let Some(a) = program
            .assignments
            .iter()
            .find(|a| !robots.contains(&a.robot.as_str()))
        {
            return Err(Error::UndeclaredRobot {
                robot: a.robot.clone(),
                line: a.line,
            });
        }

        for robot in robots {
            let stmts = build_blocks(robot, program.assignments_for(robot))?;
            self.gen_robot(robot, &stmts);
        }

        debug!("generated {} quadruples", self.quadruples.len());
        Ok(self.quadruples)
    }

    fn new_temp(&mut self) -> Operand {
        self.temp_index += 1;
        Operand::Name(format!("T{}", self.temp_index))
    }

    fn new_counter(&mut self) -> Operand {
        self.counter_index += 1;
        Operand::Name(format!("CX{}", self.counter_index))
    }

    fn new_label(&mut self) -> Operand {
        self.label_index += 1;
        Operand::Name(format!("L{}", self.label_index))
    }

    fn emit(
        &mut self,
        op: OpCode,
        arg1: Option<Operand>,
        arg2: Option<Operand>,
        result: Option<Operand>,
    ) {
        let q = Quadruple::new(op, arg1, arg2, result);
        trace!("{:>3}: {}", self.quadruples.len(), q);
        self.quadruples.push(q);
    }

    fn gen_robot(&mut self, robot: &str, stmts: &[Stmt]) {
        self.emit(
            OpCode::Declarar,
            Some(Operand::name("robot")),
            None,
            Some(Operand::name(robot)),
        );
        self.gen_stmts(robot, stmts);
    }

    fn gen_stmts(&mut self, robot: &str, stmts: &[Stmt]) {
        for stmt in stmts {
            match stmt {
                Stmt::Action(a) => self.gen_action(robot, a),
                Stmt::Block(b) => self.gen_block(robot, b),
            }
        }
    }

    fn gen_action(&mut self, robot: &str, a: &Assignment) {
        let value = Operand::Number(a.value);
        match a.component {
            c if c.is_motor() => {
                self.emit(OpCode::Asig, Some(value.clone()), None, Some(Operand::name(c.name())));
                self.emit(
                    OpCode::Call,
                    Some(Operand::name(c.name())),
                    Some(value),
                    Some(Operand::name(robot)),
                );
            }
            Component::Velocidad => {
                self.emit(OpCode::Asig, Some(value), None, Some(Operand::name("velocidad")));
            }
            Component::Espera => {
                let temp = self.new_temp();
                self.emit(OpCode::Asig, Some(value.clone()), None, Some(temp));
                self.emit(
                    OpCode::Call,
                    Some(Operand::name("espera")),
                    Some(value),
                    Some(Operand::name(robot)),
                );
            }
            // Folded into the block tree by build_blocks.
            _ => unreachable!("{} is not an action", a.component),
        }
    }

    /// Repeated block:
    ///
    /// ```text
    /// ASIG N -> CXk
    /// DECLARAR_ETIQUETA Ls
    ///   body
    /// DECREMENTO CXk -> CXk
    /// COMPARAR CXk, 0 -> Tm        Tm is set while CXk != 0
    /// SALTO_CONDICIONAL Tm -> Ls
    /// DECLARAR_ETIQUETA Le
    /// FIN Le
    /// ```
    ///
    /// A plain block is its label, its body and `FIN` on the same label.
    fn gen_block(&mut self, robot: &str, block: &Block) {
        let Some(count) = block.repeat else {
            let label = self.new_label();
            self.emit(OpCode::DeclararEtiqueta, None, None, Some(label.clone()));
            self.gen_stmts(robot, &block.body);
            self.emit(OpCode::Fin, None, None, Some(label));
            return;
        };

        let counter = self.new_counter();
        self.emit(
            OpCode::Asig,
            Some(Operand::Number(count as f64)),
            None,
            Some(counter.clone()),
        );
        let start = self.new_label();
        self.emit(OpCode::DeclararEtiqueta, None, None, Some(start.clone()));

        self.gen_stmts(robot, &block.body);

        self.emit(
            OpCode::Decremento,
            Some(counter.clone()),
            None,
            Some(counter.clone()),
        );
        let cond = self.new_temp();
        self.emit(
            OpCode::Comparar,
            Some(counter),
            Some(Operand::Number(0.0)),
            Some(cond.clone()),
        );
        self.emit(OpCode::SaltoCondicional, Some(cond), None, Some(start));
        let end = self.new_label();
        self.emit(OpCode::DeclararEtiqueta, None, None, Some(end.clone()));
        self.emit(OpCode::Fin, None, None, Some(end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::Lexer, parser::Parser};

    fn generate(source: &str) -> Vec<Quadruple> {
        let (tokens, _) = Lexer::tokenize(source);
        let mut parser = Parser::new(&tokens);
        assert!(parser.parse());
        Codegen::new().generate(parser.program()).unwrap()
    }

    fn name(s: &str) -> Option<Operand> {
        Some(Operand::name(s))
    }

    fn num(n: f64) -> Option<Operand> {
        Some(Operand::Number(n))
    }

    #[test]
    fn straight_line_program() {
        let quads = generate("Robot r1\nr1.base = 90\nr1.velocidad = 2\nr1.espera = 0.5");
        assert_eq!(
            quads,
            vec![
                Quadruple::new(OpCode::Declarar, name("robot"), None, name("r1")),
                Quadruple::new(OpCode::Asig, num(90.0), None, name("base")),
                Quadruple::new(OpCode::Call, name("base"), num(90.0), name("r1")),
                Quadruple::new(OpCode::Asig, num(2.0), None, name("velocidad")),
                Quadruple::new(OpCode::Asig, num(0.5), None, name("T1")),
                Quadruple::new(OpCode::Call, name("espera"), num(0.5), name("r1")),
            ]
        );
    }

    #[test]
    fn repeated_block() {
        let quads = generate("Robot r1\nr1.repetir = 2\nr1.inicio\nr1.base = 90\nr1.fin");
        assert_eq!(
            quads,
            vec![
                Quadruple::new(OpCode::Declarar, name("robot"), None, name("r1")),
                Quadruple::new(OpCode::Asig, num(2.0), None, name("CX1")),
                Quadruple::new(OpCode::DeclararEtiqueta, None, None, name("L1")),
                Quadruple::new(OpCode::Asig, num(90.0), None, name("base")),
                Quadruple::new(OpCode::Call, name("base"), num(90.0), name("r1")),
                Quadruple::new(OpCode::Decremento, name("CX1"), None, name("CX1")),
                Quadruple::new(OpCode::Comparar, name("CX1"), num(0.0), name("T1")),
                Quadruple::new(OpCode::SaltoCondicional, name("T1"), None, name("L1")),
                Quadruple::new(OpCode::DeclararEtiqueta, None, None, name("L2")),
                Quadruple::new(OpCode::Fin, None, None, name("L2")),
            ]
        );
    }

    #[test]
    fn nested_repeated_blocks() {
        let quads = generate(
            "Robot r1\nr1.repetir = 2\nr1.inicio\nr1.repetir = 3\nr1.inicio\n\
             r1.base = 10\nr1.fin\nr1.fin",
        );
        assert_eq!(
            quads,
            vec![
                Quadruple::new(OpCode::Declarar, name("robot"), None, name("r1")),
                Quadruple::new(OpCode::Asig, num(2.0), None, name("CX1")),
                Quadruple::new(OpCode::DeclararEtiqueta, None, None, name("L1")),
                Quadruple::new(OpCode::Asig, num(3.0), None, name("CX2")),
                Quadruple::new(OpCode::DeclararEtiqueta, None, None, name("L2")),
                Quadruple::new(OpCode::Asig, num(10.0), None, name("base")),
                Quadruple::new(OpCode::Call, name("base"), num(10.0), name("r1")),
                Quadruple::new(OpCode::Decremento, name("CX2"), None, name("CX2")),
                Quadruple::new(OpCode::Comparar, name("CX2"), num(0.0), name("T1")),
                Quadruple::new(OpCode::SaltoCondicional, name("T1"), None, name("L2")),
                Quadruple::new(OpCode::DeclararEtiqueta, None, None, name("L3")),
                Quadruple::new(OpCode::Fin, None, None, name("L3")),
                Quadruple::new(OpCode::Decremento, name("CX1"), None, name("CX1")),
                Quadruple::new(OpCode::Comparar, name("CX1"), num(0.0), name("T2")),
                Quadruple::new(OpCode::SaltoCondicional, name("T2"), None, name("L1")),
                Quadruple::new(OpCode::DeclararEtiqueta, None, None, name("L4")),
                Quadruple::new(OpCode::Fin, None, None, name("L4")),
            ]
        );
    }

    #[test]
    fn plain_block_still_closes() {
        let quads = generate("Robot r1\nr1.inicio\nr1.codo = 10\nr1.fin");
        assert_eq!(quads[1], Quadruple::new(OpCode::DeclararEtiqueta, None, None, name("L1")));
        assert_eq!(quads.last(), Some(&Quadruple::new(OpCode::Fin, None, None, name("L1"))));
    }

    #[test]
    fn names_are_not_reused_across_robots() {
        let quads = generate(
            "Robot r1\nr1.repetir = 2\nr1.inicio\nr1.espera = 1\nr1.fin\n\
             Robot r2\nr2.repetir = 3\nr2.inicio\nr2.garra = 45\nr2.fin",
        );
        let counters: Vec<_> = quads
            .iter()
            .filter(|q| q.op == OpCode::Decremento)
            .filter_map(|q| q.result.as_ref().and_then(Operand::as_name))
            .collect();
        assert_eq!(counters, vec!["CX1", "CX2"]);

        let labels: Vec<_> = quads
            .iter()
            .filter(|q| q.op == OpCode::DeclararEtiqueta)
            .filter_map(|q| q.result.as_ref().and_then(Operand::as_name))
            .collect();
        assert_eq!(labels, vec!["L1", "L2", "L3", "L4"]);

        // T1 is the wait inside r1's loop, T2 its comparison.
        let compare_temps: Vec<_> = quads
            .iter()
            .filter(|q| q.op == OpCode::Comparar)
            .filter_map(|q| q.result.as_ref().and_then(Operand::as_name))
            .collect();
        assert_eq!(compare_temps, vec!["T2", "T3"]);
    }

    #[test]
    fn robots_follow_declaration_order() {
        let quads = generate("Robot r1\nRobot r2\nr2.hombro = 45\nr1.base = 90");
        let order: Vec<_> = quads.iter().map(|q| q.op).collect();
        assert_eq!(
            order,
            vec![
                OpCode::Declarar,
                OpCode::Asig,
                OpCode::Call,
                OpCode::Declarar,
                OpCode::Asig,
                OpCode::Call,
            ]
        );
        assert_eq!(quads[2].result, name("r1"));
        assert_eq!(quads[5].result, name("r2"));
    }

    #[test]
    fn deterministic() {
        let source = "Robot r1\nr1.repetir = 4\nr1.inicio\nr1.muneca = 30\nr1.espera = 2\nr1.fin";
        assert_eq!(generate(source), generate(source));
    }

    #[test]
    fn undeclared_robot_is_a_contract_violation() {
        let (tokens, _) = Lexer::tokenize("r9.base = 10");
        let mut parser = Parser::new(&tokens);
        assert!(parser.parse());
        assert_eq!(
            Codegen::new().generate(parser.program()),
            Err(Error::UndeclaredRobot {
                robot: "r9".to_string(),
                line: 1
            })
        );
    }
}
