use std::env;
use std::path::PathBuf;

use serial_test::serial;

use notion_sync::load_config::load_config;

fn clear_sync_env() {
    for var in [
        "NOTION_TOKEN",
        "NOTION_ROOT_PAGE_ID",
        "SYNC_CONTENT_DIR",
        "SYNC_IMAGES_DIR",
        "SYNC_PUBLISHED_IMAGE_BASE",
    ] {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn load_config_uses_defaults_when_only_required_vars_are_set() {
    clear_sync_env();
    env::set_var("NOTION_TOKEN", "secret-token");
    env::set_var("NOTION_ROOT_PAGE_ID", "root-page-id");

    let config = load_config().expect("config should load");

    assert_eq!(config.token, "secret-token");
    assert_eq!(config.root_page_id, "root-page-id");
    assert_eq!(config.content_dir, PathBuf::from("src/content/posts"));
    assert_eq!(config.images_dir, PathBuf::from("public/images/notion"));
    assert_eq!(config.published_image_base, "/notion-blog/images/notion");
}

#[test]
#[serial]
fn load_config_honours_directory_overrides() {
    clear_sync_env();
    env::set_var("NOTION_TOKEN", "secret-token");
    env::set_var("NOTION_ROOT_PAGE_ID", "root-page-id");
    env::set_var("SYNC_CONTENT_DIR", "out/posts");
    env::set_var("SYNC_IMAGES_DIR", "out/images");
    env::set_var("SYNC_PUBLISHED_IMAGE_BASE", "/img");

    let config = load_config().expect("config should load");

    assert_eq!(config.content_dir, PathBuf::from("out/posts"));
    assert_eq!(config.images_dir, PathBuf::from("out/images"));
    assert_eq!(config.published_image_base, "/img");
}

#[test]
#[serial]
fn load_config_errors_on_missing_token() {
    clear_sync_env();
    env::set_var("NOTION_ROOT_PAGE_ID", "root-page-id");

    let err = load_config().unwrap_err();
    assert!(
        err.to_string().contains("NOTION_TOKEN"),
        "must name the missing variable, got: {err}"
    );
}

#[test]
#[serial]
fn load_config_errors_on_missing_root_page_id() {
    clear_sync_env();
    env::set_var("NOTION_TOKEN", "secret-token");

    let err = load_config().unwrap_err();
    assert!(
        err.to_string().contains("NOTION_ROOT_PAGE_ID"),
        "must name the missing variable, got: {err}"
    );
}

#[test]
#[serial]
fn load_config_rejects_empty_required_values() {
    clear_sync_env();
    env::set_var("NOTION_TOKEN", "");
    env::set_var("NOTION_ROOT_PAGE_ID", "root-page-id");

    assert!(load_config().is_err());
}
