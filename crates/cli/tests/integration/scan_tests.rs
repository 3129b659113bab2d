//! Scan integration tests driven through `--input` record lists.

use predicates::prelude::*;

use super::common::{TestEnv, WEB_MANIFEST, config_map_list, encode_release, release_config_map, releasefix_cmd};

const WEB_AUDIT_LINE: &str =
  "remap kube-system/web apiVersion: extensions/v1beta1 kind: Deployment to apiVersion: apps/v1 kind: Deployment";

#[test]
fn reports_deprecated_resources() {
  let env = TestEnv::new();
  let input = env.write_list(vec![release_config_map(
    "web.v2",
    "kube-system",
    "DEPLOYED",
    "2",
    &encode_release("web", WEB_MANIFEST),
  )]);

  env
    .scan_cmd(&input)
    .assert()
    .success()
    .stdout(predicate::str::is_empty())
    .stderr(predicate::str::contains(WEB_AUDIT_LINE))
    .stderr(predicate::str::contains("Checked 1 release, 1 resource to remap"));
}

#[test]
fn current_manifests_produce_no_audit_line() {
  let env = TestEnv::new();
  let manifest = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: settings\n";
  let input = env.write_list(vec![release_config_map(
    "settings.v1",
    "kube-system",
    "DEPLOYED",
    "1",
    &encode_release("settings", manifest),
  )]);

  env
    .scan_cmd(&input)
    .assert()
    .success()
    .stderr(predicate::str::contains(" to apiVersion: ").not())
    .stderr(predicate::str::contains("Unchanged: 1"));
}

#[test]
fn namespaced_resources_use_their_own_namespace() {
  let env = TestEnv::new();
  let manifest = "\
apiVersion: extensions/v1beta1
kind: Ingress
metadata:
  name: edge
  namespace: public
";
  let input = env.write_list(vec![release_config_map(
    "edge.v5",
    "kube-system",
    "DEPLOYED",
    "5",
    &encode_release("edge", manifest),
  )]);

  env.scan_cmd(&input).assert().success().stderr(predicate::str::contains(
    "remap public/edge apiVersion: extensions/v1beta1 kind: Ingress to apiVersion: networking.k8s.io/v1beta1 kind: Ingress",
  ));
}

#[test]
fn duplicate_keys_do_not_hide_the_remap() {
  let env = TestEnv::new();
  let manifest = "\
apiVersion: extensions/v1beta1
kind: Deployment
metadata:
  name: web
  labels:
    app: web
    app: web
";
  let input = env.write_list(vec![release_config_map(
    "web.v2",
    "kube-system",
    "DEPLOYED",
    "2",
    &encode_release("web", manifest),
  )]);

  env
    .scan_cmd(&input)
    .assert()
    .success()
    .stderr(predicate::str::contains(WEB_AUDIT_LINE))
    .stderr(predicate::str::contains("skipping record").not());
}

#[test]
fn corrupt_release_is_skipped_and_batch_continues() {
  let env = TestEnv::new();
  let input = env.write_list(vec![
    // valid base64, but not a gzip stream
    release_config_map("broken.v1", "kube-system", "DEPLOYED", "1", "aGVsbG8gd29ybGQ="),
    release_config_map("web.v2", "kube-system", "DEPLOYED", "2", &encode_release("web", WEB_MANIFEST)),
  ]);

  env
    .scan_cmd(&input)
    .assert()
    .success()
    .stderr(predicate::str::contains("skipping record"))
    .stderr(predicate::str::contains("kube-system/broken.v1"))
    .stderr(predicate::str::contains(WEB_AUDIT_LINE))
    .stderr(predicate::str::contains("Skipped: 1"));
}

#[test]
fn malformed_version_label_is_skipped() {
  let env = TestEnv::new();
  let input = env.write_list(vec![release_config_map(
    "web.v2",
    "kube-system",
    "DEPLOYED",
    "two",
    &encode_release("web", WEB_MANIFEST),
  )]);

  env
    .scan_cmd(&input)
    .assert()
    .success()
    .stderr(predicate::str::contains("bad version label"))
    .stderr(predicate::str::contains(WEB_AUDIT_LINE).not());
}

#[test]
fn superseded_revisions_are_ignored() {
  let env = TestEnv::new();
  let input = env.write_list(vec![release_config_map(
    "web.v1",
    "kube-system",
    "SUPERSEDED",
    "1",
    &encode_release("web", WEB_MANIFEST),
  )]);

  env
    .scan_cmd(&input)
    .assert()
    .success()
    .stderr(predicate::str::contains("No deployed releases found"));
}

#[test]
fn print_writes_rewritten_manifests_to_stdout() {
  let env = TestEnv::new();
  let input = env.write_list(vec![release_config_map(
    "web.v2",
    "kube-system",
    "DEPLOYED",
    "2",
    &encode_release("web", WEB_MANIFEST),
  )]);

  let expected = format!("# kube-system/web.v2\n{}", WEB_MANIFEST.replace("extensions/v1beta1", "apps/v1"));
  env
    .scan_cmd(&input)
    .arg("--print")
    .assert()
    .success()
    .stdout(predicate::str::diff(expected));
}

#[test]
fn reads_records_from_stdin() {
  let list = config_map_list(vec![release_config_map(
    "web.v2",
    "kube-system",
    "DEPLOYED",
    "2",
    &encode_release("web", WEB_MANIFEST),
  )]);

  releasefix_cmd()
    .args(["--input", "-"])
    .write_stdin(list)
    .assert()
    .success()
    .stderr(predicate::str::contains(WEB_AUDIT_LINE));
}

#[test]
fn reads_yaml_record_lists() {
  let env = TestEnv::new();
  let yaml = format!(
    "apiVersion: v1\nkind: List\nitems:\n- metadata:\n    name: web.v2\n    namespace: kube-system\n    labels:\n      OWNER: TILLER\n      STATUS: DEPLOYED\n      VERSION: \"2\"\n  data:\n    release: {}\n",
    encode_release("web", WEB_MANIFEST)
  );
  let input = env.write_file("configmaps.yaml", &yaml);

  env
    .scan_cmd(&input)
    .assert()
    .success()
    .stderr(predicate::str::contains(WEB_AUDIT_LINE));
}

#[test]
fn unreadable_input_is_fatal() {
  let env = TestEnv::new();
  let input = env.temp.path().join("missing.json");

  env
    .scan_cmd(&input)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to list release records"));
}

#[test]
fn malformed_record_list_is_fatal() {
  let env = TestEnv::new();
  let input = env.write_file("configmaps.json", "{\"items\": [");

  env
    .scan_cmd(&input)
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid record list"));
}
