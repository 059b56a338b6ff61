//! Stack growth for the recursive parser and evaluator.

/// Space that must remain before a recursive step runs.
const RED_ZONE: usize = 128 * 1024;

/// Size of each extra stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Runs `f`, moving onto a fresh stack segment first when the current one
/// is nearly exhausted.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
