pub mod check;
pub mod env;
pub mod run;
