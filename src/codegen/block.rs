use crate::{
    error::Error,
    parser::{Assignment, Component},
};

/// A robot's instructions with `repetir`/`inicio`/`fin` folded into a tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt<'a> {
    /// Motor move, speed change or wait.
    Action(&'a Assignment),
    Block(Block<'a>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block<'a> {
    /// Set when a `repetir` immediately precedes the `inicio`.
    pub repeat: Option<u32>,
    pub body: Vec<Stmt<'a>>,
    pub line: usize,
}

/// Builds the block tree for one robot's assignments, in source order.
///
/// A `repetir` applies only to an `inicio` that follows it directly; any
/// other instruction in between discards it.
pub fn build_blocks<'a, I>(robot: &str, assignments: I) -> Result<Vec<Stmt<'a>>, Error>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut root = vec![];
    let mut open: Vec<Block<'a>> = vec![];
    let mut pending_repeat: Option<u32> = None;

    for a in assignments {
        match a.component {
            Component::Repetir => pending_repeat = Some(a.value as u32),
            Component::Inicio => open.push(Block {
                repeat: pending_repeat.take(),
                body: vec![],
                line: a.line,
            }),
            Component::Fin => {
                pending_repeat = None;
                let Some(block) = open.pop() else {
                    return Err(Error::UnmatchedBlockEnd {
                        robot: robot.to_string(),
                        line: a.line,
                    });
                };
                open.last_mut()
                    .map_or(&mut root, |parent| &mut parent.body)
                    .push(Stmt::Block(block));
            }
            _ => {
                pending_repeat = None;
                open.last_mut()
                    .map_or(&mut root, |parent| &mut parent.body)
                    .push(Stmt::Action(a));
            }
        }
    }

    if let Some(block) = open.first() {
        return Err(Error::UnclosedBlock {
            robot: robot.to_string(),
            line: block.line,
        });
    }

    Ok(root)
}
