//! Integration tests for register / load / unload
//!
//! These tests verify that:
//! - Loading mounts exactly one marked element per call
//! - Every failed check is reported and nothing is mounted
//! - Styles are injected once per registration
//! - Unload removes the first or every instance
//! - Loads requested before the body exists complete once it appears

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use plaintag_core::{
    parse, CollectingSink, ComponentInstance, ComponentManager, LifecycleConfig, LifecycleError,
    Position, Props, Severity,
};
use plaintag_dom::{helpers, Document, ElementId};
use pretty_assertions::assert_eq;
use serde_json::json;

fn card(doc: &mut Document, props: Option<&Props>) -> Option<ComponentInstance> {
    let root = helpers::make(doc, "div")?;
    let title = props
        .and_then(|p| p.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("anonymous");
    helpers::insert_in(doc, root, "h2", Some(&format!("Hello {title}")));
    helpers::class_set(doc, root, "card");
    parse(Some(root))
}

fn manager_with(doc: Document, config: LifecycleConfig) -> (ComponentManager, CollectingSink) {
    let sink = CollectingSink::new();
    let manager = ComponentManager::new(doc.into_shared())
        .with_config(config)
        .with_sink(sink.clone());
    (manager, sink)
}

fn manager() -> (ComponentManager, CollectingSink) {
    manager_with(Document::new(), LifecycleConfig::default())
}

fn body_children(manager: &ComponentManager) -> Vec<ElementId> {
    let doc = manager.document().lock().unwrap();
    let body = doc.body().unwrap();
    doc.get(body).unwrap().children().to_vec()
}

#[tokio::test]
async fn test_load_mounts_one_marked_element_under_body() {
    let (mut manager, sink) = manager();
    manager.register("A", card, || Some(".a{color:red}".to_string()));

    manager.load_default("A", Some(json!({ "name": "Ada" }))).await;

    let children = body_children(&manager);
    assert_eq!(children.len(), 1);
    assert_eq!(manager.mounted("A"), children);

    let doc = manager.document().lock().unwrap();
    let el = doc.get(children[0]).unwrap();
    assert_eq!(el.classes(), &["card", "A"]);
    assert_eq!(
        doc.outer_html(children[0]).unwrap(),
        "<div class=\"card A\"><h2>Hello Ada</h2></div>"
    );
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_load_unregistered_reports_object_missing() {
    let (manager, sink) = manager();

    manager.load_default("ghost", None).await;

    assert!(body_children(&manager).is_empty());
    assert_eq!(
        sink.errors(),
        vec![LifecycleError::ComponentObjectMissing("ghost".into())]
    );
}

#[tokio::test]
async fn test_load_with_missing_parent_reports_parent_missing() {
    let (mut manager, sink) = manager();
    manager.register("A", card, || Some(".a{}".to_string()));
    let before = manager.document().lock().unwrap().len();

    manager.load("A", None, "#nowhere", "append").await;

    assert!(manager.mounted("A").is_empty());
    assert_eq!(
        sink.errors(),
        vec![LifecycleError::ParentMissing("A".into())]
    );
    // The orphaned instance is dropped again
    assert_eq!(manager.document().lock().unwrap().len(), before);
}

#[tokio::test]
async fn test_invalid_parent_selector_reports_parent_missing() {
    let (mut manager, sink) = manager();
    manager.register("A", card, || Some(".a{}".to_string()));

    manager.load("A", None, "div >", Position::Append).await;

    assert!(manager.mounted("A").is_empty());
    assert_eq!(
        sink.errors(),
        vec![LifecycleError::ParentMissing("A".into())]
    );
}

#[tokio::test]
async fn test_missing_registry_and_parent_are_both_reported() {
    let (manager, sink) = manager();

    manager.load("ghost", None, ".missing", Position::Append).await;

    assert_eq!(
        sink.errors(),
        vec![
            LifecycleError::ComponentObjectMissing("ghost".into()),
            LifecycleError::ParentMissing("ghost".into()),
        ]
    );
}

#[tokio::test]
async fn test_builder_without_element_reports_element_missing() {
    let (mut manager, sink) = manager();
    manager.register("empty", |_, _| None, || Some(".empty{}".to_string()));
    manager.register(
        "stale",
        |doc, _| {
            let el = doc.create_element("div").ok()?;
            doc.remove(el).ok()?;
            parse(Some(el))
        },
        || Some(".stale{}".to_string()),
    );

    manager.load_default("empty", None).await;
    manager.load_default("stale", None).await;

    assert!(body_children(&manager).is_empty());
    assert_eq!(
        sink.errors(),
        vec![
            LifecycleError::ComponentElementMissing("empty".into()),
            LifecycleError::ComponentElementMissing("stale".into()),
        ]
    );
}

#[tokio::test]
async fn test_style_injected_once_across_loads() {
    let (mut manager, _sink) = manager();
    let style_calls = Arc::new(AtomicUsize::new(0));
    let calls = style_calls.clone();
    manager.register("A", card, move || {
        calls.fetch_add(1, Ordering::SeqCst);
        Some(".a{color:red}".to_string())
    });

    for _ in 0..3 {
        manager.load_default("A", None).await;
    }

    assert_eq!(style_calls.load(Ordering::SeqCst), 1);
    assert_eq!(manager.mounted("A").len(), 3);
    let doc = manager.document().lock().unwrap();
    assert_eq!(doc.style_sheets(), vec![".a{color:red}"]);
}

#[tokio::test]
async fn test_register_without_style_warns_and_still_registers() {
    let (mut manager, sink) = manager();
    manager.register("plain", card, || None);

    let diagnostics = sink.take();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(
        diagnostics[0].error,
        LifecycleError::StyleMissing("plain".into())
    );

    manager.load_default("plain", None).await;
    assert_eq!(manager.mounted("plain").len(), 1);
    assert!(sink.is_empty());
}

#[test]
fn test_register_rejects_invalid_names() {
    let (mut manager, sink) = manager();
    manager.register("", card, || Some(".x{}".to_string()));
    manager.register("two words", card, || Some(".x{}".to_string()));

    assert!(manager.registry().is_empty());
    assert!(manager.document().lock().unwrap().style_sheets().is_empty());
    assert!(sink
        .errors()
        .iter()
        .all(|e| matches!(e, LifecycleError::InvalidArgumentType { .. })));
    assert_eq!(sink.errors().len(), 2);
}

#[tokio::test]
async fn test_last_registration_wins() {
    let (mut manager, _sink) = manager();
    manager.register("A", card, || Some(".a{}".to_string()));
    manager.register(
        "A",
        |doc, _| parse(helpers::make(doc, "section")),
        || Some(".a2{}".to_string()),
    );

    manager.load_default("A", None).await;

    let mounted = manager.mounted("A");
    let doc = manager.document().lock().unwrap();
    assert_eq!(doc.get(mounted[0]).unwrap().tag_name(), "section");
    assert_eq!(doc.style_sheets(), vec![".a{}", ".a2{}"]);
}

#[tokio::test]
async fn test_unload_single_then_noop() {
    let (mut manager, sink) = manager();
    manager.register("A", card, || Some(".a{}".to_string()));
    manager.load_default("A", None).await;

    manager.unload("A", false);
    assert!(manager.mounted("A").is_empty());
    assert!(body_children(&manager).is_empty());

    manager.unload("A", false);
    assert!(sink.is_empty(), "a second unload is silent");
}

#[tokio::test]
async fn test_unload_all_and_unload_one() {
    let (mut manager, _sink) = manager();
    manager.register("B", card, || Some(".b{}".to_string()));

    for _ in 0..3 {
        manager.load_default("B", None).await;
    }
    let mounted = manager.mounted("B");
    assert_eq!(mounted.len(), 3);

    manager.unload("B", false);
    assert_eq!(manager.mounted("B"), mounted[1..].to_vec());

    manager.unload("B", true);
    assert!(manager.mounted("B").is_empty());

    for _ in 0..3 {
        manager.load_default("B", None).await;
    }
    manager.unload("B", true);
    assert!(manager.mounted("B").is_empty());
}

#[tokio::test]
async fn test_unload_default_uses_config() {
    let config = LifecycleConfig {
        unload_all: true,
        ..Default::default()
    };
    let (mut manager, _sink) = manager_with(Document::new(), config);
    manager.register("B", card, || Some(".b{}".to_string()));
    manager.load_default("B", None).await;
    manager.load_default("B", None).await;

    manager.unload_default("B");
    assert!(manager.mounted("B").is_empty());
}

#[tokio::test]
async fn test_unload_leaves_other_components() {
    let (mut manager, _sink) = manager();
    manager.register("A", card, || Some(".a{}".to_string()));
    manager.register("B", card, || Some(".b{}".to_string()));
    manager.load_default("A", None).await;
    manager.load_default("B", None).await;

    manager.unload("A", true);

    assert!(manager.mounted("A").is_empty());
    assert_eq!(manager.mounted("B").len(), 1);
}

#[tokio::test]
async fn test_unload_deregistered_reports_and_still_removes() {
    let (mut manager, sink) = manager();
    manager.register("A", card, || Some(".a{}".to_string()));
    manager.load_default("A", None).await;
    assert!(manager.deregister("A"));

    manager.unload("A", false);

    assert!(manager.mounted("A").is_empty());
    assert_eq!(
        sink.errors(),
        vec![LifecycleError::ComponentObjectMissing("A".into())]
    );
}

#[tokio::test]
async fn test_load_into_custom_parent() {
    let (mut manager, _sink) = manager();
    manager.register(
        "host",
        |doc, _| {
            let root = helpers::make(doc, "section")?;
            helpers::tag(doc, root, "app");
            parse(Some(root))
        },
        || Some("#app{}".to_string()),
    );
    manager.register("A", card, || Some(".a{}".to_string()));

    manager.load_default("host", None).await;
    manager.load("A", None, "#app", "append").await;

    let doc = manager.document().lock().unwrap();
    let app = doc.get_element_by_id("app").unwrap();
    let a = doc.query_selector("section#app > .A").unwrap().unwrap();
    assert_eq!(doc.get(a).unwrap().parent(), Some(app));
}

#[tokio::test]
async fn test_unsupported_position_is_accepted_without_mounting() {
    let (mut manager, sink) = manager();
    manager.register("A", card, || Some(".a{}".to_string()));
    let before = manager.document().lock().unwrap().len();

    for _ in 0..10 {
        manager.load("A", None, "body", "prepend").await;
    }

    assert!(manager.mounted("A").is_empty());
    assert!(sink.is_empty());
    assert_eq!(manager.document().lock().unwrap().len(), before);
}

#[tokio::test]
async fn test_load_waits_for_body() {
    let (mut manager, _sink) = manager_with(Document::loading(), LifecycleConfig::default());
    manager.register("A", card, || Some(".a{}".to_string()));
    let manager = Arc::new(manager);

    let load = {
        let manager = manager.clone();
        tokio::spawn(async move {
            manager.load_default("A", None).await;
            manager.mounted("A").len()
        })
    };

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(!load.is_finished(), "load must suspend until the body exists");

    manager.document().lock().unwrap().attach_body();

    let mounted = tokio::time::timeout(Duration::from_millis(500), load)
        .await
        .expect("load should resume once the body is attached")
        .unwrap();
    assert_eq!(mounted, 1);
}

#[tokio::test]
async fn test_concurrent_loads_are_not_deduplicated() {
    let (mut manager, _sink) = manager_with(Document::loading(), LifecycleConfig::default());
    manager.register("A", card, || Some(".a{}".to_string()));

    let attach = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        manager.document().lock().unwrap().attach_body();
    };
    tokio::join!(
        manager.load_default("A", None),
        manager.load_default("A", None),
        attach
    );

    assert_eq!(manager.mounted("A").len(), 2);
}

#[tokio::test]
async fn test_mount_timeout_reports_and_mounts_nothing() {
    let config = LifecycleConfig {
        mount_timeout_ms: Some(20),
        ..Default::default()
    };
    let (mut manager, sink) = manager_with(Document::loading(), config);
    manager.register("A", card, || Some(".a{}".to_string()));

    manager.load_default("A", None).await;

    assert_eq!(
        sink.errors(),
        vec![LifecycleError::MountTimeout("A".into())]
    );
    assert!(manager.mounted("A").is_empty());
}

fn hooked(
    log: Arc<Mutex<Vec<String>>>,
) -> impl Fn(&mut Document, Option<&Props>) -> Option<ComponentInstance> + Send + Sync + 'static {
    move |doc: &mut Document, _: Option<&Props>| {
        let root = helpers::make(doc, "div")?;
        let mounted = log.clone();
        let unmounted = log.clone();
        Some(
            ComponentInstance::new(root)
                .with_mounted(move |doc, el| {
                    let connected = doc.is_connected(el);
                    mounted.lock().unwrap().push(format!("mounted:{connected}"));
                })
                .with_unmounted(move |doc, el| {
                    let alive = doc.contains(el);
                    unmounted.lock().unwrap().push(format!("unmounted:{alive}"));
                }),
        )
    }
}

#[tokio::test]
async fn test_hooks_are_ignored_by_default() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (mut manager, _sink) = manager();
    manager.register("H", hooked(log.clone()), || Some(".h{}".to_string()));

    manager.load_default("H", None).await;
    manager.unload("H", true);

    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_hooks_run_when_enabled() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let config = LifecycleConfig {
        run_hooks: true,
        ..Default::default()
    };
    let (mut manager, _sink) = manager_with(Document::new(), config);
    manager.register("H", hooked(log.clone()), || Some(".h{}".to_string()));

    manager.load_default("H", None).await;
    manager.load_default("H", None).await;
    manager.unload("H", false);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["mounted:true", "mounted:true", "unmounted:false"]
    );

    manager.unload("H", true);
    assert_eq!(log.lock().unwrap().len(), 4);
}
