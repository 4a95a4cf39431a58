mod block;
mod codegen;
mod quadruple;

pub use block::*;
pub use codegen::*;
pub use quadruple::*;
