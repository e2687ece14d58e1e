pub(crate) mod evaluator;
pub(crate) mod lexer;
pub(crate) mod parser;
