//! Import planning for php-nsr.
//!
//! Decides how a `use` statement is added (plain, aliased or replacing an
//! existing one), sorts the `use` block and rewrites the namespace
//! statement. Everything here produces [`php_nsr_types::TextEdit`]s and never
//! touches the document itself.

pub mod namespace_stmt;
pub mod planner;
pub mod sorter;
