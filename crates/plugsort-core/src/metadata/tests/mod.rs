// Metadata test modules
#[cfg(test)]
mod element_tests;
#[cfg(test)]
mod merge_tests;
