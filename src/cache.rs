//! Thread-local compilation cache for rule regexes.
//!
//! Folder batches run the same ruleset against every file, so each rule
//! would otherwise be recompiled once per file. Compiled regexes are cheap
//! to clone (reference counted), so hits hand out a clone.
//! Cache is capped at 256 entries; when full it is cleared.

use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;

const MAX_CACHE_ENTRIES: usize = 256;

thread_local! {
    // Key is "<flags>\0<pattern>"; flags never contain NUL so keys cannot collide.
    static REGEX_CACHE: RefCell<HashMap<String, Regex>> = RefCell::new(HashMap::new());
}

/// Get a compiled regex from cache, or build it with `compile` and cache it.
///
/// Build failures are returned as is and never cached.
pub fn get_or_compile<E, F>(pattern: &str, flags: &str, compile: F) -> Result<Regex, E>
where
    F: FnOnce() -> Result<Regex, E>,
{
    let cache_key = format!("{flags}\0{pattern}");

    REGEX_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();

        if let Some(regex) = cache.get(&cache_key) {
            return Ok(regex.clone());
        }

        if cache.len() >= MAX_CACHE_ENTRIES {
            cache.clear();
        }

        let compiled = compile()?;
        cache.insert(cache_key, compiled.clone());
        Ok(compiled)
    })
}

/// Clear the regex cache (mainly for testing).
pub fn clear_cache() {
    REGEX_CACHE.with(|cache| {
        cache.borrow_mut().clear();
    });
}

/// Number of cached regexes on this thread.
pub fn cache_size() -> usize {
    REGEX_CACHE.with(|cache| cache.borrow().len())
}
