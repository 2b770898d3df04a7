//! Account Lock Ordering Policy
//!
//! Two concurrent transfers A→B and B→A that each lock account rows in
//! request order can block on each other's lock forever. Acquiring locks in
//! a globally consistent order (smaller account id first) makes circular
//! wait impossible: any two transactions requesting overlapping locks
//! request them in the same relative order, so at most one can be ahead.

/// Order an account pair for lock acquisition: `(first, second)` with
/// `first <= second` by numeric id. Pure and infallible.
pub fn lock_order(a: i64, b: i64) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}
