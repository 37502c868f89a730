//! Document-level constants shared by the orchestrator, the reference
//! adjuster and host utilities.

/// Prefix carried by every continuation line of a multi-line result.
pub const CONTINUATION_PREFIX: &str = "> ";

/// Prefix of a comment line.
pub const COMMENT_PREFIX: char = '#';

/// Marker written after `=` when a line cannot be evaluated.
pub const ERROR_MARKER: &str = "ERR";

/// Result separator between an expression and its computed value.
pub const RESULT_SEPARATOR: char = '=';

/// Sigil introducing a positional line reference (`\3`).
pub const REFERENCE_SIGIL: char = '\\';

/// Sigil marking a currency literal (`$12.50`).
pub const CURRENCY_SIGIL: char = '$';
