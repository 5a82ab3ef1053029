#[cfg(test)]
mod game_tests;
