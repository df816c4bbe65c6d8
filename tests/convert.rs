use mockall::predicate::eq;
use notion_sync::contract::MockAssetFetcher;
use notion_sync::convert::{extract_description, localise_images, DESCRIPTION_MAX_LEN};

#[tokio::test]
async fn localise_images_replaces_in_textual_order() {
    let markdown = "intro\n\
        ![one](https://example.com/a.png)\n\
        middle\n\
        ![two](https://example.com/b.jpg)\n";

    let mut fetcher = MockAssetFetcher::new();
    fetcher
        .expect_fetch()
        .with(eq("https://example.com/a.png"), eq("page1"), eq(1usize))
        .returning(|_, _, _| Ok("/img/page1/image-1.png".to_string()));
    fetcher
        .expect_fetch()
        .with(eq("https://example.com/b.jpg"), eq("page1"), eq(2usize))
        .returning(|_, _, _| Ok("/img/page1/image-2.jpg".to_string()));

    let result = localise_images(markdown, "page1", &fetcher).await;

    assert!(result.contains("![one](/img/page1/image-1.png)"));
    assert!(result.contains("![two](/img/page1/image-2.jpg)"));
    assert!(!result.contains("https://example.com"));
}

#[tokio::test]
async fn failed_download_leaves_reference_untouched_and_continues() {
    let markdown = "\
        ![first](https://example.com/1.png)\n\
        ![second](https://example.com/2.png)\n\
        ![third](https://example.com/3.png)\n";

    let mut fetcher = MockAssetFetcher::new();
    fetcher
        .expect_fetch()
        .with(eq("https://example.com/1.png"), eq("p"), eq(1usize))
        .returning(|_, _, _| Ok("/img/p/image-1.png".to_string()));
    fetcher
        .expect_fetch()
        .with(eq("https://example.com/2.png"), eq("p"), eq(2usize))
        .returning(|_, _, _| Err("connection reset".into()));
    fetcher
        .expect_fetch()
        .with(eq("https://example.com/3.png"), eq("p"), eq(3usize))
        .returning(|_, _, _| Ok("/img/p/image-3.png".to_string()));

    let result = localise_images(markdown, "p", &fetcher).await;

    assert!(result.contains("![first](/img/p/image-1.png)"));
    // The failed match must remain byte-identical to the input.
    assert!(result.contains("![second](https://example.com/2.png)"));
    assert!(result.contains("![third](/img/p/image-3.png)"));
}

#[tokio::test]
async fn duplicate_references_are_replaced_by_position() {
    // Two byte-identical references: the first download fails, the second
    // succeeds. Only the second occurrence may be rewritten.
    let markdown = "\
        ![pic](https://example.com/same.png)\n\
        middle\n\
        ![pic](https://example.com/same.png)\n";

    let mut fetcher = MockAssetFetcher::new();
    fetcher
        .expect_fetch()
        .with(eq("https://example.com/same.png"), eq("p"), eq(1usize))
        .returning(|_, _, _| Err("connection reset".into()));
    fetcher
        .expect_fetch()
        .with(eq("https://example.com/same.png"), eq("p"), eq(2usize))
        .returning(|_, _, _| Ok("/img/p/image-2.png".to_string()));

    let result = localise_images(markdown, "p", &fetcher).await;

    assert_eq!(
        result,
        "\
        ![pic](https://example.com/same.png)\n\
        middle\n\
        ![pic](/img/p/image-2.png)\n"
    );
}

#[tokio::test]
async fn non_image_links_are_not_touched() {
    let markdown = "a [link](https://example.com/page) and no images";
    let fetcher = MockAssetFetcher::new();

    let result = localise_images(markdown, "p", &fetcher).await;
    assert_eq!(result, markdown);
}

#[test]
fn extract_description_strips_markdown_syntax() {
    let text = "# Heading\n\
        Some **bold** and *italic* text with `code`.\n\
        ![shot](https://example.com/a.png)\n\
        A [link](https://example.com) too.\n";

    let description = extract_description(text, DESCRIPTION_MAX_LEN);

    assert_eq!(
        description,
        "Heading Some bold and italic text with . A link too."
    );
}

#[test]
fn extract_description_truncates_with_ellipsis() {
    let long: String = "a".repeat(200);
    let description = extract_description(&long, 150);

    assert!(description.len() <= 154);
    assert!(description.ends_with("..."));
    assert_eq!(description, format!("{}...", "a".repeat(150)));
}

#[test]
fn extract_description_returns_short_text_unchanged() {
    let short: String = "b".repeat(100);
    let description = extract_description(&short, 150);
    assert_eq!(description, short);
}
