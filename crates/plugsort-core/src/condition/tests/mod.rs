// Condition test modules
#[cfg(test)]
mod evaluator_tests;
