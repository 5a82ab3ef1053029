// Cross-module test suites
#[cfg(test)]
mod integration;
