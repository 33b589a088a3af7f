//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so debug
//! builds stay readable. All flags are further gated by `cfg(debug_assertions)`.

/// Emit the signal outcome of every index visited by the repeat-signal scan.
pub const PRINT_REPEAT_SCAN: bool = false;

/// Emit accept/reject decisions for every weekly V-point candidate.
pub const PRINT_REVERSAL_SCAN: bool = false;

/// Emit the rendered message before it is handed to the notifier.
pub const PRINT_MESSAGE: bool = false;
