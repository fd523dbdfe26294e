pub mod openai_compatible;
pub mod parse;
pub mod runtime;
