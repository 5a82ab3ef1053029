#![cfg(test)]

pub mod common;
pub mod workflow_tests;
