//! Slug generation with collision handling.
//!
//! A slug is the filesystem- and URL-safe identifier derived from a page
//! title. Uniqueness is scoped to one sync run: the registry is constructed at
//! run start, passed by mutable reference into the emission step, and dropped
//! at run end. It is not thread-safe; the orchestrator serialises all calls.

use std::collections::HashMap;

use regex::Regex;

/// Normalize a title into its base slug form.
///
/// Lowercases, turns whitespace runs into single hyphens, strips everything
/// outside word characters, hyphens and Hangul syllables, collapses repeated
/// hyphens, and trims hyphens from both ends. Idempotent.
pub fn normalize(title: &str) -> String {
    let whitespace = Regex::new(r"\s+").unwrap();
    let disallowed = Regex::new(r"[^\w\-가-힣]").unwrap();
    let hyphen_runs = Regex::new(r"-{2,}").unwrap();

    let slug = title.to_lowercase();
    let slug = whitespace.replace_all(&slug, "-");
    let slug = disallowed.replace_all(&slug, "");
    let slug = hyphen_runs.replace_all(&slug, "-");
    slug.trim_matches('-').to_string()
}

/// Run-scoped registry mapping normalized titles to their occurrence counts.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    counts: HashMap<String, u32>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a slug for `title`, unique within this registry's lifetime.
    ///
    /// The first occurrence of a normalized base returns the base unmodified;
    /// the n-th repeat returns `base-<n>`, n starting at 1.
    pub fn assign_unique(&mut self, title: &str) -> String {
        let base = normalize(title);
        match self.counts.get_mut(&base) {
            None => {
                self.counts.insert(base.clone(), 1);
                base
            }
            Some(count) => {
                let slug = format!("{}-{}", base, count);
                *count += 1;
                slug
            }
        }
    }
}
