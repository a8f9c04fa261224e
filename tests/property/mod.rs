//! Property-based tests for the decision table and plan builder
