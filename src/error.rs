use thiserror::Error;

/// Contract violations: the generator was handed input that the semantic
/// pass should have rejected. Never part of the diagnostic lists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("'{robot}.fin' at line {line} closes no block")]
    UnmatchedBlockEnd { robot: String, line: usize },

    #[error("block opened by '{robot}.inicio' at line {line} is never closed")]
    UnclosedBlock { robot: String, line: usize },

    #[error("robot '{robot}' at line {line} has no declaration")]
    UndeclaredRobot { robot: String, line: usize },
}
