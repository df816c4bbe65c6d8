use notion_sync::slug::{normalize, SlugRegistry};

#[test]
fn normalize_lowercases_and_hyphenates_whitespace() {
    assert_eq!(normalize("My First Post"), "my-first-post");
    assert_eq!(normalize("  Spaced\t\tOut  Title "), "spaced-out-title");
}

#[test]
fn normalize_strips_symbols_and_collapses_hyphens() {
    assert_eq!(normalize("Hello, World!"), "hello-world");
    assert_eq!(normalize("a -- b --- c"), "a-b-c");
    assert_eq!(normalize("--edgy--"), "edgy");
}

#[test]
fn normalize_keeps_hangul() {
    assert_eq!(normalize("안녕 세상"), "안녕-세상");
}

#[test]
fn normalize_is_idempotent() {
    for title in ["My First Post", "Hello, World!", "안녕 세상", "--edgy--"] {
        let once = normalize(title);
        assert_eq!(normalize(&once), once, "normalize must be idempotent for {title:?}");
    }
}

#[test]
fn assign_unique_suffixes_repeated_titles() {
    let mut registry = SlugRegistry::new();

    assert_eq!(registry.assign_unique("Notes"), "notes");
    assert_eq!(registry.assign_unique("Notes"), "notes-1");
    assert_eq!(registry.assign_unique("Notes"), "notes-2");
    // A different title normalizing to the same base still collides.
    assert_eq!(registry.assign_unique("NOTES!"), "notes-3");
}

#[test]
fn assign_unique_returns_distinct_slugs_for_long_collision_runs() {
    let mut registry = SlugRegistry::new();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..20 {
        let slug = registry.assign_unique("Same Title");
        assert!(seen.insert(slug.clone()), "duplicate slug returned: {slug}");
    }
    assert!(seen.contains("same-title"));
    assert!(seen.contains("same-title-19"));
}

#[test]
fn registries_are_independent_per_run() {
    let mut first = SlugRegistry::new();
    assert_eq!(first.assign_unique("Post"), "post");
    drop(first);

    let mut second = SlugRegistry::new();
    assert_eq!(second.assign_unique("Post"), "post");
}
