// SplitScreen shared type definitions
// Each submodule defines types used across the crate.

pub mod errors;
pub mod layout;
pub mod page;
pub mod settings;
