use std::fmt;

use phf::phf_map;
use serde::Serialize;

static COMPONENTS: phf::Map<&'static str, Component> = phf_map! {
    "base" => Component::Base,
    "hombro" => Component::Hombro,
    "codo" => Component::Codo,
    "garra" => Component::Garra,
    "muneca" => Component::Muneca,
    "velocidad" => Component::Velocidad,
    "repetir" => Component::Repetir,
    "inicio" => Component::Inicio,
    "fin" => Component::Fin,
    "espera" => Component::Espera,
};

/// Assignable attribute of a robot, including the block markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Base,
    Hombro,
    Codo,
    Garra,
    Muneca,
    Velocidad,
    Repetir,
    Inicio,
    Fin,
    Espera,
}

impl Component {
    pub const ALL: [Component; 10] = [
        Component::Base,
        Component::Hombro,
        Component::Codo,
        Component::Garra,
        Component::Muneca,
        Component::Velocidad,
        Component::Repetir,
        Component::Inicio,
        Component::Fin,
        Component::Espera,
    ];

    pub fn from_name(name: &str) -> Option<Component> {
        COMPONENTS.get(name.to_ascii_lowercase().as_str()).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Component::Base => "base",
            Component::Hombro => "hombro",
            Component::Codo => "codo",
            Component::Garra => "garra",
            Component::Muneca => "muneca",
            Component::Velocidad => "velocidad",
            Component::Repetir => "repetir",
            Component::Inicio => "inicio",
            Component::Fin => "fin",
            Component::Espera => "espera",
        }
    }

    /// Joints and the gripper: assigning one moves a motor.
    pub fn is_motor(&self) -> bool {
        matches!(
            self,
            Component::Base
                | Component::Hombro
                | Component::Codo
                | Component::Garra
                | Component::Muneca
        )
    }

    /// `inicio` and `fin` delimit a block and take no value.
    pub fn is_block_marker(&self) -> bool {
        matches!(self, Component::Inicio | Component::Fin)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// `Robot <name>` header.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Declaration {
    pub robot: String,
    pub line: usize,
}

/// One accepted `<robot>.<component> = <value>` instruction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assignment {
    pub robot: String,
    pub component: Component,
    /// Block markers carry 0.
    pub value: f64,
    pub line: usize,
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.component.is_block_marker() {
            write!(f, "{}.{}", self.robot, self.component)
        } else {
            write!(f, "{}.{} = {}", self.robot, self.component, self.value)
        }
    }
}

/// Everything the parser recognized, in source order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub assignments: Vec<Assignment>,
}

impl Program {
    /// Robot names in first-declaration order, without repeats.
    pub fn robot_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = vec![];
        for d in &self.declarations {
            if !names.contains(&d.robot.as_str()) {
                names.push(&d.robot);
            }
        }
        names
    }

    pub fn assignments_for<'a>(&'a self, robot: &'a str) -> impl Iterator<Item = &'a Assignment> {
        self.assignments.iter().filter(move |a| a.robot == robot)
    }

    /// Assignments grouped per robot name, groups in order of first use.
    pub fn assignments_by_robot(&self) -> Vec<(&str, Vec<&Assignment>)> {
        let mut groups: Vec<(&str, Vec<&Assignment>)> = vec![];
        for a in &self.assignments {
            match groups.iter_mut().find(|(robot, _)| *robot == a.robot) {
                Some((_, group)) => group.push(a),
                None => groups.push((&a.robot, vec![a])),
            }
        }
        groups
    }
}
