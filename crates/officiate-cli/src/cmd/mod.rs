pub mod check;
pub mod experiment;
pub mod generate;
