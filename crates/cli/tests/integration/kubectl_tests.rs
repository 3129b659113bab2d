//! Cluster listing through a stand-in kubectl script.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use predicates::prelude::*;
use serial_test::serial;

use super::common::{TestEnv, WEB_MANIFEST, config_map_list, encode_release, release_config_map, releasefix_cmd};

/// Write a kubectl stand-in that records its arguments and prints `list`.
fn fake_kubectl(env: &TestEnv, list: &str) -> PathBuf {
  let list_path = env.write_file("list.json", list);
  let args_path = env.temp.path().join("args");
  let script = format!(
    "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\ncat '{}'\n",
    args_path.display(),
    list_path.display()
  );
  let path = env.write_file("bin/kubectl", &script);
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}

fn recorded_args(env: &TestEnv) -> Vec<String> {
  std::fs::read_to_string(env.temp.path().join("args"))
    .unwrap()
    .lines()
    .map(str::to_string)
    .collect()
}

fn web_list() -> String {
  config_map_list(vec![release_config_map(
    "web.v2",
    "kube-system",
    "DEPLOYED",
    "2",
    &encode_release("web", WEB_MANIFEST),
  )])
}

#[test]
#[serial]
fn lists_with_the_deployed_selector() {
  let env = TestEnv::new();
  let kubectl = fake_kubectl(&env, &web_list());

  releasefix_cmd()
    .arg("--kubectl")
    .arg(&kubectl)
    .args(["--kubeconfig", "/etc/kube/admin.conf"])
    .assert()
    .success()
    .stderr(predicate::str::contains("remap kube-system/web"));

  assert_eq!(
    recorded_args(&env),
    [
      "get",
      "configmaps",
      "--all-namespaces",
      "-l",
      "OWNER=TILLER,STATUS=DEPLOYED",
      "-o",
      "json",
      "--kubeconfig",
      "/etc/kube/admin.conf",
    ]
  );
}

#[test]
#[serial]
fn kubeconfig_defaults_to_home() {
  let env = TestEnv::new();
  let kubectl = fake_kubectl(&env, &web_list());

  releasefix_cmd()
    .arg("--kubectl")
    .arg(&kubectl)
    .env("HOME", "/home/operator")
    .assert()
    .success();

  let args = recorded_args(&env);
  assert_eq!(&args[args.len() - 2..], ["--kubeconfig", "/home/operator/.kube/config"]);
}

#[test]
#[serial]
fn no_kubeconfig_without_home() {
  let env = TestEnv::new();
  let kubectl = fake_kubectl(&env, &web_list());

  releasefix_cmd()
    .arg("--kubectl")
    .arg(&kubectl)
    .env_remove("HOME")
    .assert()
    .success();

  assert!(!recorded_args(&env).iter().any(|a| a == "--kubeconfig"));
}

#[test]
#[serial]
fn failing_list_call_is_fatal() {
  let env = TestEnv::new();
  let path = env.write_file("bin/kubectl", "#!/bin/sh\necho 'connection refused' >&2\nexit 1\n");
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

  releasefix_cmd()
    .arg("--kubectl")
    .arg(&path)
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to list release records"))
    .stderr(predicate::str::contains("connection refused"));
}
