pub mod output;
pub mod prompt;
