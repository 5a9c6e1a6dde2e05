pub mod ast;
pub mod lexer;
pub mod parser;

/// Recursive descent over the tree grows the stack onto the heap once less
/// than this much is left.
pub const STACK_RED_ZONE: usize = 128 * 1024;
pub const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;
