//! Property-based tests for dispatch guarantees

mod dispatch;
