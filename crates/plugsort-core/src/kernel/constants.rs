/// Name of the group every plugin belongs to unless its metadata says otherwise
pub const DEFAULT_GROUP: &str = "default";

/// Language code of message content that has no explicit language
pub const DEFAULT_LANGUAGE: &str = "en";

/// Suffix given to plugin files that have been hidden from the game
pub const GHOST_FILE_EXTENSION: &str = ".ghost";

/// File extensions recognised as plugins (lowercase)
pub const PLUGIN_EXTENSIONS: [&str; 3] = [".esp", ".esm", ".esl"];

/// Characters whose presence marks a plugin name or file name as a regex
pub const REGEX_CHARS: [char; 5] = [':', '\\', '*', '?', '|'];

/// Top-level masterlist key replaced by the contents of a prelude file
pub const PRELUDE_KEY: &str = "prelude:";

/// Returns true if the file name has a plugin extension, ignoring any ghost suffix.
pub fn is_plugin_file_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    let trimmed = lower.strip_suffix(GHOST_FILE_EXTENSION).unwrap_or(&lower);
    PLUGIN_EXTENSIONS.iter().any(|ext| trimmed.ends_with(ext))
}

/// Returns true if the name should be interpreted as a regular expression.
pub fn is_regex_name(name: &str) -> bool {
    name.contains(&REGEX_CHARS[..])
}
