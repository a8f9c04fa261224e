//! Integration tests for the trimerge 3-way merge engine

mod apply_scenarios;
mod hasher_verification;
mod install_status_recovery;
mod plan_scenarios;
mod test_utils;
