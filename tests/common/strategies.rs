//! Proptest strategies for registry property tests.

#![allow(dead_code)]

use proptest::prelude::*;

/// Non-empty manager names drawn from a small alphabet so duplicates occur
pub fn manager_name_strategy() -> impl Strategy<Value = String> {
    "[a-e][a-e0-2]{0,2}"
}

/// Sequence of registration attempts, duplicates included
pub fn registration_sequence_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(manager_name_strategy(), 0..24)
}

#[derive(Debug, Clone)]
pub enum RegistryOp {
    Add(String),
    Remove(String),
    SetDefault(String),
}

pub fn registry_op_strategy() -> impl Strategy<Value = RegistryOp> {
    prop_oneof![
        3 => manager_name_strategy().prop_map(RegistryOp::Add),
        1 => manager_name_strategy().prop_map(RegistryOp::Remove),
        1 => manager_name_strategy().prop_map(RegistryOp::SetDefault),
    ]
}

pub fn registry_ops_strategy() -> impl Strategy<Value = Vec<RegistryOp>> {
    prop::collection::vec(registry_op_strategy(), 0..32)
}
