mod common;

use std::sync::Arc;

use url::Url;

use common::{FakeCatalog, catalog_font};
use fontpick::{
    Font, MemoryRegistry, PickerError, ResourceCoordinator, ResourceState, Script, StyleRegistry,
    StylesheetKind, Variant,
};

fn coordinator(catalog: &Arc<FakeCatalog>, registry: &Arc<MemoryRegistry>) -> ResourceCoordinator {
    ResourceCoordinator::new(
        catalog.clone() as Arc<dyn fontpick::CatalogProvider>,
        registry.clone() as Arc<dyn StyleRegistry>,
        vec![Script::latin()],
        vec![Variant::regular()],
        String::new(),
    )
}

fn custom_font(family: &str, url: &str) -> Font {
    Font::custom(family, Url::parse(url).expect("valid url"))
}

#[tokio::test]
async fn test_preview_load_creates_one_slot_with_one_fetch() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    let font = catalog_font("Alegreya");
    coordinator
        .load_previews(std::slice::from_ref(&font))
        .await
        .expect("preview load should succeed");

    assert_eq!(registry.state("alegreya"), ResourceState::PreviewReady);
    assert_eq!(registry.slot_count(), 1);
    let text = registry.stylesheet_text("alegreya").expect("css written");
    assert!(!text.is_empty());
    assert_eq!(catalog.fetch_count(), 1);
}

#[tokio::test]
async fn test_second_instance_does_not_refetch() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let first = coordinator(&catalog, &registry);
    let second = coordinator(&catalog, &registry);

    let font = catalog_font("Alegreya");
    first
        .load_previews(std::slice::from_ref(&font))
        .await
        .expect("first load");
    second
        .load_previews(std::slice::from_ref(&font))
        .await
        .expect("second load");

    // The second instance observes the slot and skips the network.
    assert_eq!(catalog.fetch_count(), 1);
    assert_eq!(registry.slot_count(), 1);
}

#[tokio::test]
async fn test_pending_slot_from_another_instance_blocks_fetch() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    // Another instance has claimed the id and is mid-fetch: the slot exists
    // but no CSS has been written yet.
    registry.create_stylesheet("alegreya", StylesheetKind::Preview);

    let font = catalog_font("Alegreya");
    coordinator
        .load_previews(std::slice::from_ref(&font))
        .await
        .expect("load should succeed without fetching");

    assert_eq!(catalog.fetch_count(), 0);
    assert_eq!(registry.state("alegreya"), ResourceState::PreviewPending);
}

#[tokio::test]
async fn test_activate_promotes_preview_slot_in_place() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    let font = catalog_font("Alegreya");
    coordinator
        .load_previews(std::slice::from_ref(&font))
        .await
        .expect("preview load");
    assert_eq!(registry.state("alegreya"), ResourceState::PreviewReady);

    coordinator
        .activate(&font, Some("Open Sans"))
        .await
        .expect("activation");

    assert_eq!(registry.state("alegreya"), ResourceState::FullReady);
    assert_eq!(registry.slot_count(), 1);
    let text = registry.stylesheet_text("alegreya").expect("css written");
    assert!(text.contains("alegreya-full"));
    // One preview batch plus one full-weight request.
    assert_eq!(catalog.fetch_count(), 2);
}

#[tokio::test]
async fn test_activate_on_full_slot_only_updates_selector() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    let font = catalog_font("Alegreya");
    coordinator.activate(&font, None).await.expect("first activation");
    assert_eq!(catalog.fetch_count(), 1);

    coordinator
        .activate(&font, Some("Lato"))
        .await
        .expect("second activation");

    assert_eq!(catalog.fetch_count(), 1);
    let rule = registry.active_rule("").expect("active rule declared");
    assert!(rule.contains("\"Alegreya\", \"Lato\""));
}

#[tokio::test]
async fn test_active_selector_declared_before_full_fetch_completes() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    let font = catalog_font("Alegreya");
    coordinator
        .activate(&font, Some("Open Sans"))
        .await
        .expect("activation");

    let rule = registry.active_rule("").expect("active rule declared");
    assert!(rule.contains("font-family: \"Alegreya\", \"Open Sans\";"));
    assert_eq!(registry.state("alegreya"), ResourceState::FullReady);
}

#[tokio::test]
async fn test_custom_font_never_touches_the_catalog() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    let font = custom_font("MyFont", "https://example.com/f.woff2");
    coordinator
        .load_previews(std::slice::from_ref(&font))
        .await
        .expect("preview load");

    assert_eq!(catalog.fetch_count(), 0);
    assert_eq!(registry.state("myfont"), ResourceState::PreviewReady);
    let text = registry.stylesheet_text("myfont").expect("css written");
    assert!(text.contains("@font-face"));
    assert!(text.contains("src: url(https://example.com/f.woff2);"));

    coordinator.activate(&font, None).await.expect("activation");
    assert_eq!(catalog.fetch_count(), 0);
    assert_eq!(registry.state("myfont"), ResourceState::FullReady);
}

#[tokio::test]
async fn test_batch_fetch_covers_only_absent_catalog_fonts() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    let alegreya = catalog_font("Alegreya");
    coordinator
        .load_previews(std::slice::from_ref(&alegreya))
        .await
        .expect("first load");

    let batch = vec![
        alegreya.clone(),
        catalog_font("Barlow"),
        custom_font("MyFont", "https://example.com/f.woff2"),
    ];
    coordinator.load_previews(&batch).await.expect("batch load");

    // One earlier call for Alegreya, then exactly one batched call covering
    // only the catalog-sourced font that was still absent.
    let batches = catalog.recorded_batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1], vec!["Barlow".to_string()]);
    assert_eq!(registry.state("myfont"), ResourceState::PreviewReady);
}

#[tokio::test]
async fn test_preview_selectors_declared_for_every_batch_member() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    let batch = vec![catalog_font("Alegreya"), catalog_font("Barlow")];
    coordinator.load_previews(&batch).await.expect("batch load");
    // A second call redeclares; the rules are append-only and idempotent in
    // effect, so this must not fail or refetch.
    coordinator.load_previews(&batch).await.expect("repeat load");

    assert_eq!(catalog.fetch_count(), 1);
    let declared = registry.preview_rules();
    assert_eq!(declared.len(), 4);
    assert!(declared[0].contains("#font-button-alegreya"));
    assert!(declared[1].contains("#font-button-barlow"));
}

#[tokio::test]
async fn test_missing_id_in_response_skips_only_that_font() {
    common::init_test_logging();
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    catalog.omit_id("barlow");
    let batch = vec![catalog_font("Alegreya"), catalog_font("Barlow")];
    coordinator
        .load_previews(&batch)
        .await
        .expect("per-item inconsistency must not fail the batch");

    assert_eq!(registry.state("alegreya"), ResourceState::PreviewReady);
    // The omitted font's slot was discarded, so a later call can retry it.
    assert_eq!(registry.state("barlow"), ResourceState::Absent);

    catalog.clear_omissions();
    coordinator
        .load_previews(&[catalog_font("Barlow")])
        .await
        .expect("retry load");
    assert_eq!(registry.state("barlow"), ResourceState::PreviewReady);
}

#[tokio::test]
async fn test_failed_batch_unwinds_created_slots() {
    common::init_test_logging();
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    let alegreya = catalog_font("Alegreya");
    coordinator
        .load_previews(std::slice::from_ref(&alegreya))
        .await
        .expect("seed load");

    catalog.set_fail_fetches(true);
    let batch = vec![alegreya.clone(), catalog_font("Barlow")];
    let err = coordinator
        .load_previews(&batch)
        .await
        .expect_err("fetch failure must propagate");
    assert!(matches!(err, PickerError::Catalog(_)));

    // The slot created by the failing call is gone; the pre-existing one is
    // untouched.
    assert_eq!(registry.state("barlow"), ResourceState::Absent);
    assert_eq!(registry.state("alegreya"), ResourceState::PreviewReady);

    catalog.set_fail_fetches(false);
    coordinator
        .load_previews(&[catalog_font("Barlow")])
        .await
        .expect("retry after failure");
    assert_eq!(registry.state("barlow"), ResourceState::PreviewReady);
}

#[tokio::test]
async fn test_failed_activation_keeps_promoted_slot_full() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    let font = catalog_font("Alegreya");
    coordinator
        .load_previews(std::slice::from_ref(&font))
        .await
        .expect("preview load");

    catalog.set_fail_fetches(true);
    coordinator
        .activate(&font, None)
        .await
        .expect_err("fetch failure must propagate");

    // Promotion is one-directional, so the slot stays full-tagged even
    // though the full weight never arrived.
    assert_eq!(registry.state("alegreya"), ResourceState::FullReady);
}

#[tokio::test]
async fn test_failed_activation_unwinds_fresh_slot() {
    let catalog = Arc::new(FakeCatalog::default());
    let registry = Arc::new(MemoryRegistry::new());
    let coordinator = coordinator(&catalog, &registry);

    catalog.set_fail_fetches(true);
    let font = catalog_font("Alegreya");
    coordinator
        .activate(&font, None)
        .await
        .expect_err("fetch failure must propagate");
    assert_eq!(registry.state("alegreya"), ResourceState::Absent);

    catalog.set_fail_fetches(false);
    coordinator.activate(&font, None).await.expect("retry");
    assert_eq!(registry.state("alegreya"), ResourceState::FullReady);
}
