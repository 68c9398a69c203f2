//! Workers Push Use Case Tests

use super::*;
use crate::application::test_support::{
    FailingBundler, MapReader, MockBundler, RecordingEventSink,
};
use crate::domain::entities::{Binding, DurableObjectNamespace, Zone};
use crate::domain::ports::{
    NamespaceUpdate, NoopEventSink, PushEvent, ScriptUpload, WorkersApi, WorkersDomain,
};
use crate::domain::value_objects::{PushState, ScriptName};
use crate::error::{EdgeError, EdgeResult};
use indexmap::IndexMap;
use std::cell::RefCell;

// Mock implementations for testing

#[derive(Default)]
struct MockWorkersApi {
    calls: RefCell<Vec<String>>,
    uploads: RefCell<Vec<ScriptUpload>>,
    namespaces: RefCell<Vec<DurableObjectNamespace>>,
    zones: Vec<Zone>,
    domains: RefCell<Vec<WorkersDomain>>,
    subdomain_enabled: RefCell<bool>,
    fail_upload: bool,
}

impl MockWorkersApi {
    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl WorkersApi for MockWorkersApi {
    fn list_durable_object_namespaces(&self) -> EdgeResult<Vec<DurableObjectNamespace>> {
        self.record("list_namespaces");
        Ok(self.namespaces.borrow().clone())
    }

    fn create_durable_object_namespace(&self, name: &str) -> EdgeResult<DurableObjectNamespace> {
        self.record(format!("create_namespace {name}"));
        let ns = DurableObjectNamespace {
            id: format!("ns-{name}"),
            name: name.to_string(),
            script: None,
            class: None,
        };
        self.namespaces.borrow_mut().push(ns.clone());
        Ok(ns)
    }

    fn update_durable_object_namespace(
        &self,
        update: &NamespaceUpdate,
    ) -> EdgeResult<DurableObjectNamespace> {
        self.record(format!("update_namespace {}", update.name));
        let mut namespaces = self.namespaces.borrow_mut();
        let ns = namespaces
            .iter_mut()
            .find(|ns| ns.id == update.id)
            .expect("updated namespace exists");
        ns.script = Some(update.script.clone());
        ns.class = Some(update.class.clone());
        Ok(ns.clone())
    }

    fn put_script(&self, upload: &ScriptUpload) -> EdgeResult<()> {
        self.record("put_script");
        if self.fail_upload {
            return Err(EdgeError::RemoteCallFailed {
                method: "PUT".to_string(),
                url: "workers/scripts/foo".to_string(),
                status: Some(400),
                body: "10021: script invalid".to_string(),
            });
        }
        self.uploads.borrow_mut().push(upload.clone());
        Ok(())
    }

    fn list_zones(&self, per_page: u32) -> EdgeResult<Vec<Zone>> {
        assert!(per_page >= 1000);
        self.record("list_zones");
        Ok(self.zones.clone())
    }

    fn put_workers_domain(&self, domain: &WorkersDomain) -> EdgeResult<()> {
        self.record(format!("put_domain {}", domain.hostname));
        let mut domains = self.domains.borrow_mut();
        if !domains.contains(domain) {
            domains.push(domain.clone());
        }
        Ok(())
    }

    fn get_workers_subdomain(&self) -> EdgeResult<String> {
        self.record("get_subdomain");
        Ok("acme".to_string())
    }

    fn get_service_subdomain_enabled(&self, _script: &str) -> EdgeResult<bool> {
        self.record("get_subdomain_enabled");
        Ok(*self.subdomain_enabled.borrow())
    }

    fn set_service_subdomain_enabled(&self, _script: &str, enabled: bool) -> EdgeResult<()> {
        self.record(format!("set_subdomain_enabled {enabled}"));
        *self.subdomain_enabled.borrow_mut() = enabled;
        Ok(())
    }
}

fn zone(name: &str) -> Zone {
    Zone {
        id: format!("zone-{name}"),
        name: name.to_string(),
        status: "active".to_string(),
        paused: false,
        zone_type: "full".to_string(),
    }
}

fn options() -> PushOptions {
    PushOptions::new(ScriptName::parse("foo").unwrap(), "worker.ts")
}

fn bundler() -> MockBundler {
    MockBundler::new("export default { fetch() { return new Response('ok'); } };\n")
}

#[test]
fn wasm_and_text_bindings_upload_one_script_with_one_part() {
    let api = MockWorkersApi::default();
    let reader = MapReader::default().with("m.wasm", &[7u8; 17]);
    let use_case = PushUseCase::new(&api, bundler(), reader);

    let mut bindings = IndexMap::new();
    bindings.insert(
        "W".to_string(),
        Binding::WasmModule {
            path: "m.wasm".to_string(),
        },
    );
    bindings.insert(
        "T".to_string(),
        Binding::Text {
            value: "hello".to_string(),
        },
    );
    let options = options().with_bindings(bindings);

    let mut state = PushState::now();
    use_case.push(&options, &mut state, &NoopEventSink).unwrap();

    let uploads = api.uploads.borrow();
    assert_eq!(uploads.len(), 1);
    let upload = &uploads[0];
    assert!(upload.is_module);
    assert_eq!(
        serde_json::to_value(&upload.bindings).unwrap(),
        serde_json::json!([
            { "type": "wasm_module", "name": "W", "part": "W" },
            { "type": "plain_text", "name": "T", "text": "hello" }
        ])
    );
    assert_eq!(upload.parts.len(), 1);
    assert_eq!(upload.parts[0].name, "W");
    assert_eq!(upload.parts[0].bytes.len(), 17);
    assert_eq!(
        upload.parts[0].content_type.as_deref(),
        Some("application/wasm")
    );
}

#[test]
fn migrations_only_on_first_push() {
    let api = MockWorkersApi::default();
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    let options = options()
        .with_watch(true)
        .with_delete_classes(vec!["Old".to_string(), "Older".to_string()]);

    let mut state = PushState::now();
    use_case.push(&options, &mut state, &NoopEventSink).unwrap();
    use_case.push(&options, &mut state, &NoopEventSink).unwrap();

    let uploads = api.uploads.borrow();
    assert_eq!(uploads.len(), 2);
    let first = uploads[0].migrations.as_ref().unwrap();
    assert_eq!(first.tag, "delete-Old-Older");
    assert_eq!(first.deleted_classes, vec!["Old", "Older"]);
    assert!(uploads[1].migrations.is_none());
}

#[test]
fn custom_domain_bound_once_across_watch_pushes() {
    let api = MockWorkersApi {
        zones: vec![zone("example.com"), zone("other.org")],
        ..Default::default()
    };
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    let options = options()
        .with_watch(true)
        .with_custom_domains(vec!["api.example.com".to_string()])
        .with_workers_dev(Some(true));

    let mut state = PushState::now();
    for _ in 0..3 {
        use_case.push(&options, &mut state, &NoopEventSink).unwrap();
    }

    assert_eq!(api.count("put_script"), 3);
    assert_eq!(api.count("list_zones"), 1);
    assert_eq!(api.count("put_domain"), 1);
    assert_eq!(api.count("set_subdomain_enabled"), 1);
    let domains = api.domains.borrow();
    assert_eq!(
        domains[0],
        WorkersDomain {
            zone_id: "zone-example.com".to_string(),
            hostname: "api.example.com".to_string(),
            service: "foo".to_string(),
            environment: "production".to_string(),
        }
    );
    assert_eq!(state.push_number(), 4);
}

#[test]
fn rerunning_custom_domain_push_is_a_noop() {
    let api = MockWorkersApi {
        zones: vec![zone("example.com")],
        ..Default::default()
    };
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    let options = options().with_custom_domains(vec!["api.example.com".to_string()]);

    use_case
        .push(&options, &mut PushState::now(), &NoopEventSink)
        .unwrap();
    use_case
        .push(&options, &mut PushState::now(), &NoopEventSink)
        .unwrap();
    assert_eq!(api.domains.borrow().len(), 1);
}

#[test]
fn unknown_custom_domain_fails_after_upload() {
    let api = MockWorkersApi {
        zones: vec![zone("other.org")],
        ..Default::default()
    };
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    let options = options().with_custom_domains(vec!["api.example.com".to_string()]);

    let mut state = PushState::now();
    let err = use_case
        .push(&options, &mut state, &NoopEventSink)
        .unwrap_err();
    assert_eq!(err.kind(), "zone-not-found");
    assert_eq!(api.count("put_script"), 1);
    assert_eq!(state.push_number(), 1);
}

#[test]
fn workers_dev_unset_leaves_route_untouched() {
    let api = MockWorkersApi::default();
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    use_case
        .push(&options(), &mut PushState::now(), &NoopEventSink)
        .unwrap();
    assert_eq!(api.count("get_subdomain"), 0);
    assert_eq!(api.count("set_subdomain_enabled"), 0);
}

#[test]
fn workers_dev_already_enabled_is_not_set_again() {
    let api = MockWorkersApi::default();
    *api.subdomain_enabled.borrow_mut() = true;
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    let events = RecordingEventSink::default();
    use_case
        .push(
            &options().with_workers_dev(Some(true)),
            &mut PushState::now(),
            &events,
        )
        .unwrap();
    assert_eq!(api.count("set_subdomain_enabled"), 0);
    assert_eq!(
        events.count(|e| matches!(e, PushEvent::WorkersDevToggled { subdomain, .. } if subdomain == "acme")),
        1
    );
}

#[test]
fn namespace_updates_flush_after_upload_in_order() {
    let api = MockWorkersApi::default();
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    let mut bindings = IndexMap::new();
    bindings.insert(
        "B".to_string(),
        Binding::DoNamespace {
            spec: "beta:Beta".to_string(),
        },
    );
    bindings.insert(
        "A".to_string(),
        Binding::DoNamespace {
            spec: "alpha:Alpha".to_string(),
        },
    );

    use_case
        .push(
            &options().with_bindings(bindings),
            &mut PushState::now(),
            &NoopEventSink,
        )
        .unwrap();

    let calls = api.calls.borrow();
    let put = calls.iter().position(|c| c == "put_script").unwrap();
    let updates: Vec<(usize, &String)> = calls
        .iter()
        .enumerate()
        .filter(|(_, c)| c.starts_with("update_namespace"))
        .collect();
    assert_eq!(updates.len(), 2);
    assert!(updates.iter().all(|(i, _)| *i > put));
    assert_eq!(updates[0].1, "update_namespace beta");
    assert_eq!(updates[1].1, "update_namespace alpha");

    let upload = &api.uploads.borrow()[0];
    assert_eq!(
        serde_json::to_value(&upload.bindings[0]).unwrap(),
        serde_json::json!({ "type": "durable_object_namespace", "name": "B", "namespace_id": "ns-beta" })
    );
}

#[test]
fn namespaces_already_bound_are_not_updated_again() {
    let api = MockWorkersApi::default();
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    let mut bindings = IndexMap::new();
    bindings.insert(
        "C".to_string(),
        Binding::DoNamespace {
            spec: "counters:Counter".to_string(),
        },
    );
    let options = options().with_watch(true).with_bindings(bindings);
    let mut state = PushState::now();
    use_case.push(&options, &mut state, &NoopEventSink).unwrap();
    use_case.push(&options, &mut state, &NoopEventSink).unwrap();
    assert_eq!(api.count("create_namespace"), 1);
    assert_eq!(api.count("update_namespace"), 1);
}

#[test]
fn upload_failure_skips_flush_and_first_push_work() {
    let api = MockWorkersApi {
        fail_upload: true,
        zones: vec![zone("example.com")],
        ..Default::default()
    };
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    let mut bindings = IndexMap::new();
    bindings.insert(
        "C".to_string(),
        Binding::DoNamespace {
            spec: "counters:Counter".to_string(),
        },
    );
    let options = options()
        .with_bindings(bindings)
        .with_custom_domains(vec!["example.com".to_string()]);
    let mut state = PushState::now();

    let err = use_case
        .push(&options, &mut state, &NoopEventSink)
        .unwrap_err();
    assert_eq!(err.kind(), "remote-call-failed");
    assert_eq!(api.count("update_namespace"), 0);
    assert_eq!(api.count("list_zones"), 0);
    assert!(state.is_first_push());
}

#[test]
fn bundle_failure_aborts_before_any_remote_call() {
    let api = MockWorkersApi::default();
    let use_case = PushUseCase::new(&api, FailingBundler, MapReader::default());
    let err = use_case
        .push(&options(), &mut PushState::now(), &NoopEventSink)
        .unwrap_err();
    assert_eq!(err.kind(), "bundle-failed");
    assert!(api.calls.borrow().is_empty());
}

#[test]
fn prebundled_script_is_read_not_bundled() {
    let api = MockWorkersApi::default();
    let bundler = bundler();
    let reader = MapReader::default().with("dist/worker.js", b"addEventListener('fetch', () => {});");
    let use_case = PushUseCase::new(&api, &bundler, reader);
    let options = PushOptions::new(ScriptName::parse("foo").unwrap(), "dist/worker.js");

    use_case
        .push(&options, &mut PushState::now(), &NoopEventSink)
        .unwrap();
    assert_eq!(*bundler.calls.borrow(), 0);
    let upload = &api.uploads.borrow()[0];
    assert!(!upload.is_module);
    assert_eq!(upload.contents, b"addEventListener('fetch', () => {});");
}

#[test]
fn imported_assets_become_parts_and_source_is_rewritten() {
    let api = MockWorkersApi::default();
    let bundler = MockBundler::new(
        "const { connect } = cloudflareSockets();\nconst page = await importText(importMeta.url, './static/index.html');\nexport default {};\n",
    );
    let reader = MapReader::default().with("src/static/index.html", b"<h1>hi</h1>");
    let use_case = PushUseCase::new(&api, bundler, reader);
    let options = PushOptions::new(ScriptName::parse("foo").unwrap(), "src/worker.ts");

    use_case
        .push(&options, &mut PushState::now(), &NoopEventSink)
        .unwrap();
    let upload = &api.uploads.borrow()[0];
    let source = String::from_utf8(upload.contents.clone()).unwrap();
    assert_eq!(
        source,
        "import { connect } from \"cloudflare:sockets\";\nimport page from \"static/index.html\";\nexport default {};\n"
    );
    assert_eq!(upload.parts.len(), 1);
    assert_eq!(upload.parts[0].name, "static/index.html");
}

#[test]
fn repeated_push_produces_identical_upload() {
    let api = MockWorkersApi::default();
    let bundler = MockBundler::new("const x = await importBinary(importMeta.url, './x.bin');\n");
    let reader = MapReader::default().with("x.bin", b"xyz").with("m.wasm", b"\0asm");
    let use_case = PushUseCase::new(&api, bundler, reader);
    let mut bindings = IndexMap::new();
    bindings.insert(
        "W".to_string(),
        Binding::WasmModule {
            path: "m.wasm".to_string(),
        },
    );
    let options = options().with_bindings(bindings);

    use_case
        .push(&options, &mut PushState::now(), &NoopEventSink)
        .unwrap();
    use_case
        .push(&options, &mut PushState::now(), &NoopEventSink)
        .unwrap();

    let uploads = api.uploads.borrow();
    assert_eq!(uploads[0].contents, uploads[1].contents);
    assert_eq!(uploads[0].bindings, uploads[1].bindings);
    assert_eq!(uploads[0].parts, uploads[1].parts);
}

#[test]
fn push_id_reaches_bindings_only_in_watch_mode() {
    let api = MockWorkersApi::default();
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    let mut bindings = IndexMap::new();
    bindings.insert(
        "VERSION".to_string(),
        Binding::Text {
            value: "v${pushId}".to_string(),
        },
    );

    let mut state = PushState::now();
    let outcome = use_case
        .push(
            &options().with_bindings(bindings.clone()).with_watch(true),
            &mut state,
            &NoopEventSink,
        )
        .unwrap();
    let push_id = outcome.push_id.unwrap();
    assert!(push_id.ends_with(".1"));

    use_case
        .push(
            &options().with_bindings(bindings),
            &mut PushState::now(),
            &NoopEventSink,
        )
        .unwrap();

    let uploads = api.uploads.borrow();
    assert_eq!(
        uploads[0].bindings[0],
        crate::domain::ports::ApiBinding::PlainText {
            name: "VERSION".to_string(),
            text: format!("v{push_id}"),
        }
    );
    assert_eq!(
        uploads[1].bindings[0],
        crate::domain::ports::ApiBinding::PlainText {
            name: "VERSION".to_string(),
            text: "v".to_string(),
        }
    );
}

#[test]
fn events_follow_push_order() {
    let api = MockWorkersApi::default();
    let use_case = PushUseCase::new(&api, bundler(), MapReader::default());
    let events = RecordingEventSink::default();
    use_case
        .push(&options(), &mut PushState::now(), &events)
        .unwrap();

    let names: Vec<&'static str> = events
        .events
        .borrow()
        .iter()
        .map(|e| match e {
            PushEvent::Bundling { .. } => "bundling",
            PushEvent::Bundled { .. } => "bundled",
            PushEvent::BindingsComputed { .. } => "bindings",
            PushEvent::Uploading { .. } => "uploading",
            PushEvent::Uploaded { .. } => "uploaded",
            _ => "other",
        })
        .collect();
    assert_eq!(
        names,
        vec!["bundling", "bundled", "bindings", "uploading", "uploaded"]
    );
}
