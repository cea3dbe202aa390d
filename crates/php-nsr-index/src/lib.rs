//! Namespace index for php-nsr.
//!
//! Maps short class names to fully qualified candidates by scanning the
//! files that declare them, knows which classes live in the global
//! namespace, and derives a file's namespace from composer.json PSR-4
//! autoload configuration.

pub mod builtins;
pub mod composer;
pub mod derive;
pub mod resolver;
