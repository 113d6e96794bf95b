pub mod path;
pub mod testing;

/// Terminal libraries that log every key stroke at debug level.
pub const NOISY_MODULES: [&str; 3] = ["skim", "tuikit", "rustyline"];

pub fn is_noisy(target: &str) -> bool {
    NOISY_MODULES.iter().any(|name| target.starts_with(name))
}
