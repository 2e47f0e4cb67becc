//! File sources feeding the check.
//!
//! The check itself accepts any iterator of `FileRecord`s. The filesystem
//! source here is the one the CLI uses; hosts with their own file delivery
//! build records directly.

pub mod fs;
