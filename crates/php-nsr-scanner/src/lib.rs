//! Lexical PHP scanning for php-nsr.
//!
//! Works on raw source text without a grammar: finds class names referenced
//! by a document, classifies the lines of its declaration block, and keeps a
//! line-addressable copy of open documents.

pub mod declarations;
pub mod document;
pub mod references;
