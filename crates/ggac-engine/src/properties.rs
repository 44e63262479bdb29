//! Planner properties file.

use std::collections::BTreeMap;

use ggac_config::PlannerProperties;

use crate::documents::PlanDocuments;

/// Render the properties file read by the planner: the pass-through settings,
/// the catalog locations, then any extra keys (which win on conflict).
pub fn render_properties(properties: &PlannerProperties, documents: &PlanDocuments) -> String {
  let mut entries: BTreeMap<String, String> = BTreeMap::new();
  let mut set = |key: &str, value: String| {
    entries.insert(key.to_string(), value);
  };

  set(
    "pegasus.monitord.encoding",
    properties.monitord_encoding.clone(),
  );
  set(
    "pegasus.gridstart.arguments",
    properties.gridstart_arguments.clone(),
  );
  set("dagman.maxidle", properties.max_idle.to_string());
  set("dagman.maxjobs", properties.max_jobs.to_string());
  set("dagman.retry", properties.retry.to_string());

  set(
    "pegasus.catalog.site.file",
    documents.sites.display().to_string(),
  );
  set(
    "pegasus.catalog.transformation.file",
    documents.transformations.display().to_string(),
  );
  set("pegasus.catalog.replica", "YAML".to_string());
  set(
    "pegasus.catalog.replica.file",
    documents.replicas.display().to_string(),
  );

  for (key, value) in &properties.extra {
    set(key, value.clone());
  }

  entries
    .iter()
    .map(|(key, value)| format!("{key} = {value}\n"))
    .collect()
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use super::*;

  #[test]
  fn test_defaults_are_passed_through() {
    let documents = PlanDocuments::in_dir(Path::new("/wf"));
    let rendered = render_properties(&PlannerProperties::default(), &documents);

    assert!(rendered.contains("dagman.retry = 3\n"));
    assert!(rendered.contains("dagman.maxidle = 1000\n"));
    assert!(rendered.contains("dagman.maxjobs = 1000\n"));
    assert!(rendered.contains("pegasus.gridstart.arguments = -f\n"));
    assert!(rendered.contains("pegasus.monitord.encoding = json\n"));
    assert!(rendered.contains("pegasus.catalog.site.file = /wf/sites.json\n"));
  }

  #[test]
  fn test_extra_keys_override() {
    let documents = PlanDocuments::in_dir(Path::new("/wf"));
    let mut properties = PlannerProperties::default();
    properties
      .extra
      .insert("dagman.retry".to_string(), "5".to_string());
    properties
      .extra
      .insert("pegasus.mode".to_string(), "development".to_string());

    let rendered = render_properties(&properties, &documents);

    assert!(rendered.contains("dagman.retry = 5\n"));
    assert!(!rendered.contains("dagman.retry = 3\n"));
    assert!(rendered.contains("pegasus.mode = development\n"));
  }

  #[test]
  fn test_lines_are_sorted() {
    let documents = PlanDocuments::in_dir(Path::new("/wf"));
    let rendered = render_properties(&PlannerProperties::default(), &documents);
    let keys: Vec<&str> = rendered
      .lines()
      .map(|l| l.split(" = ").next().unwrap())
      .collect();

    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
  }
}
