mod common;

use common::TestEnv;

const WORKER: &str = "export default { fetch() { return new Response('ok'); } };\n";

#[test]
fn bad_script_name_is_rejected_before_credentials() {
    let env = TestEnv::new();
    env.write_project_file("worker.ts", WORKER);

    let result = env.run(&["push", "worker.ts", "--name", "Bad Name"]);

    assert!(!result.success);
    assert_eq!(result.exit_code, 1);
    assert!(
        result.stderr.contains("bad-script-name"),
        "stderr: {}",
        result.stderr
    );
}

#[test]
fn unknown_script_spec_is_rejected() {
    let env = TestEnv::new();

    let result = env.run(&["push", "missing.ts"]);

    assert!(!result.success);
    assert!(result.stderr.contains("bad-script-spec"), "stderr: {}", result.stderr);
}

#[test]
fn url_root_must_be_typescript() {
    let env = TestEnv::new();

    let result = env.run(&["push", "https://example.com/worker.js"]);

    assert!(!result.success);
    assert!(result.stderr.contains("must end in .ts"), "stderr: {}", result.stderr);
}

#[test]
fn push_without_credentials_fails() {
    let env = TestEnv::new();
    env.write_project_file("worker.ts", WORKER);

    let result = env.run(&["push", "worker.ts"]);

    assert!(!result.success);
    assert!(
        result.stderr.contains("missing-credentials"),
        "stderr: {}",
        result.stderr
    );
    assert!(result.stderr.contains("FIX:"));
}

#[test]
fn push_deploy_rejects_script_workers() {
    let env = TestEnv::new();
    env.write_project_file("worker.js", "addEventListener('fetch', () => {});\n");

    let result = env.run_with_env(
        &["push-deploy", "worker.js"],
        &[("DENO_DEPLOY_TOKEN", "token")],
    );

    assert!(!result.success);
    assert!(
        result.stderr.contains("deploy-module-only"),
        "stderr: {}",
        result.stderr
    );
}

#[test]
fn push_deploy_without_token_fails() {
    let env = TestEnv::new();
    env.write_project_file("worker.ts", WORKER);

    let result = env.run(&["push-deploy", "worker.ts"]);

    assert!(!result.success);
    assert!(result.stderr.contains("DENO_DEPLOY_TOKEN"), "stderr: {}", result.stderr);
}

#[test]
fn json_errors_are_ndjson_on_stdout() {
    let env = TestEnv::new();

    let result = env.run(&["--json", "push", "missing.ts"]);

    assert!(!result.success);
    let line = result.stdout.lines().last().expect("an error event");
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["event"], "error");
    assert_eq!(event["kind"], "bad-script-spec");
}

#[test]
fn config_script_with_malformed_deploy_option_fails_to_load() {
    let env = TestEnv::new();
    env.write_project_file("worker.ts", WORKER);
    env.write_project_file(
        ".edgepush.toml",
        "[scripts.foo]\npath = \"worker.ts\"\ndeploy = \"access-token\"\n",
    );

    let result = env.run(&["push-deploy", "foo"]);

    assert!(!result.success);
    assert!(result.stderr.contains("scripts.foo.deploy"), "stderr: {}", result.stderr);
}

#[test]
fn unknown_config_keys_only_warn() {
    let env = TestEnv::new();
    env.write_project_file(
        ".edgepush.toml",
        "[scripts.foo]\npath = \"worker.ts\"\nworkers_devv = true\n",
    );
    env.write_project_file("worker.ts", WORKER);

    let result = env.run(&["push", "foo"]);

    // Fails on credentials, not on the unknown key
    assert!(result.stderr.contains("missing-credentials"), "stderr: {}", result.stderr);
    assert!(result.stderr.contains("unknown config key"), "stderr: {}", result.stderr);
}

#[test]
fn mixed_binding_table_reports_bad_binding() {
    let env = TestEnv::new();
    env.write_project_file("worker.ts", WORKER);
    env.write_project_file(
        ".edgepush.toml",
        "[scripts.foo]\npath = \"worker.ts\"\n[scripts.foo.bindings]\nX = { value = \"1\", secret = \"2\" }\n",
    );

    let result = env.run(&["--json", "push", "foo"]);

    assert!(!result.success);
    let line = result.stdout.lines().last().expect("an error event");
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["kind"], "bad-binding");
}
