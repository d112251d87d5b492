mod commands;
mod logging;
mod print;
mod setup;

pub use commands::run;
