//! Property-based tests for scheduling invariants

mod invariants;
