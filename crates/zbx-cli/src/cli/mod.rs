//! Argument parsing and command handlers

pub mod args;
pub mod handlers;
pub mod token_args;

pub use args::{resolve_kinds, Args, TypeSelection};
pub use token_args::TokenArgs;
