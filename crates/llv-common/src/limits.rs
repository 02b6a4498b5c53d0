//! Centralized limits for the analysis passes.

/// Upper bound on fixed-point passes over pending continuations.
///
/// Each productive pass resolves at least one name, so the bound only
/// matters for pathological batches.
pub const MAX_SETTLE_PASSES: usize = 256;

/// Maximum syntax nesting depth the walker descends into before pruning.
pub const MAX_VISIT_DEPTH: u32 = 1_000;

/// Packages implicitly imported by every source file.
pub const IMPLICIT_PACKAGES: &[&str] = &["java.lang"];

/// Remaining stack below which a recursive pass moves to a fresh segment.
pub const STACK_RED_ZONE: usize = 64 * 1024;

/// Size of each stack segment allocated for deep recursion.
pub const STACK_GROW_SIZE: usize = 1024 * 1024;
