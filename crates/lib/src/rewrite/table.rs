//! The (apiVersion, kind) migration table.

use std::collections::HashMap;
use std::fmt;

/// A resource type as written in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceType {
  pub api_version: String,
  pub kind: String,
}

impl ResourceType {
  pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
    Self {
      api_version: api_version.into(),
      kind: kind.into(),
    }
  }
}

impl fmt::Display for ResourceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "apiVersion: {} kind: {}", self.api_version, self.kind)
  }
}

/// Deprecated resource type to look up.
pub type RewriteKey = ResourceType;

/// Replacement resource type.
pub type RewriteTarget = ResourceType;

/// Exact-match mapping from deprecated resource types to their replacements.
///
/// Built once and shared read-only; there is no wildcard or version-range
/// matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteTable {
  rules: HashMap<RewriteKey, RewriteTarget>,
}

impl RewriteTable {
  pub fn new<I>(rules: I) -> Self
  where
    I: IntoIterator<Item = (RewriteKey, RewriteTarget)>,
  {
    Self {
      rules: rules.into_iter().collect(),
    }
  }

  pub fn lookup(&self, api_version: &str, kind: &str) -> Option<&RewriteTarget> {
    self.rules.get(&ResourceType::new(api_version, kind))
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  /// Rules sorted by source type, for stable display.
  pub fn rules(&self) -> Vec<(&RewriteKey, &RewriteTarget)> {
    let mut rules: Vec<_> = self.rules.iter().collect();
    rules.sort();
    rules
  }
}

impl Default for RewriteTable {
  /// The Kubernetes 1.16 migration list for workloads and ingresses.
  fn default() -> Self {
    Self::new([
      (
        ResourceType::new("apps/v1beta1", "Deployment"),
        ResourceType::new("apps/v1", "Deployment"),
      ),
      (
        ResourceType::new("apps/v1beta2", "Deployment"),
        ResourceType::new("apps/v1", "Deployment"),
      ),
      (
        ResourceType::new("extensions/v1beta1", "Deployment"),
        ResourceType::new("apps/v1", "Deployment"),
      ),
      (
        ResourceType::new("batch/v1beta1", "CronJob"),
        ResourceType::new("batch/v1", "CronJob"),
      ),
      (
        ResourceType::new("extensions/v1beta1", "Ingress"),
        ResourceType::new("networking.k8s.io/v1beta1", "Ingress"),
      ),
    ])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_table_has_five_rules() {
    let table = RewriteTable::default();
    assert_eq!(table.len(), 5);
    assert_eq!(
      table.lookup("extensions/v1beta1", "Ingress"),
      Some(&ResourceType::new("networking.k8s.io/v1beta1", "Ingress"))
    );
    assert_eq!(
      table.lookup("batch/v1beta1", "CronJob"),
      Some(&ResourceType::new("batch/v1", "CronJob"))
    );
  }

  #[test]
  fn lookups_are_exact() {
    let table = RewriteTable::default();
    assert_eq!(table.lookup("apps/v1beta1", "StatefulSet"), None);
    assert_eq!(table.lookup("apps/V1beta1", "Deployment"), None);
    assert_eq!(table.lookup("apps/v1beta1 ", "Deployment"), None);
    assert_eq!(table.lookup("", ""), None);
  }

  #[test]
  fn rules_are_sorted() {
    let table = RewriteTable::default();
    let sources: Vec<_> = table.rules().iter().map(|(from, _)| from.to_string()).collect();
    assert_eq!(sources[0], "apiVersion: apps/v1beta1 kind: Deployment");
    assert_eq!(sources[4], "apiVersion: extensions/v1beta1 kind: Ingress");
  }

  #[test]
  fn table_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RewriteTable>();
  }
}
