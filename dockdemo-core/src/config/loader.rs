use std::collections::HashMap;
use std::path::Path;

use super::value::ConfigValue;
use super::ConfigError;

pub(crate) type Values = HashMap<String, ConfigValue>;

/// Merge a YAML file into `values`. A missing file is not an error.
pub(crate) fn merge_yaml_file(path: &Path, values: &mut Values) -> Result<(), ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not present, skipping");
        return Ok(());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    merge_yaml_str(&content, values)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(())
}

/// Merge a YAML document into `values`, later keys overwriting earlier ones.
pub(crate) fn merge_yaml_str(content: &str, values: &mut Values) -> Result<(), ConfigError> {
    let doc: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    flatten("", &doc, values);
    Ok(())
}

/// Overlay environment variables: `APP_NAME` becomes `app.name`.
pub(crate) fn merge_env<I>(vars: I, values: &mut Values)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (name, raw) in vars {
        values.insert(env_to_key(&name), ConfigValue::String(raw));
    }
}

/// Convert an environment variable name into a dotted config key.
pub fn env_to_key(name: &str) -> String {
    name.to_lowercase().replace('_', ".")
}

/// Convert a dotted config key into the environment variable that overrides it.
pub fn key_to_env(key: &str) -> String {
    key.to_uppercase().replace('.', "_")
}

fn flatten(prefix: &str, node: &serde_yaml::Value, out: &mut Values) {
    match node {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let segment = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => format!("{other:?}"),
                };
                let key = if prefix.is_empty() {
                    segment
                } else {
                    format!("{prefix}.{segment}")
                };
                flatten(&key, v, out);
            }
        }
        serde_yaml::Value::Sequence(items) if !prefix.is_empty() => {
            out.insert(
                prefix.to_string(),
                ConfigValue::List(items.iter().map(ConfigValue::from_yaml).collect()),
            );
            // Indexed keys let `FOO_0` style env vars override single elements.
            for (i, item) in items.iter().enumerate() {
                flatten(&format!("{prefix}.{i}"), item, out);
            }
        }
        serde_yaml::Value::Tagged(tagged) => flatten(prefix, &tagged.value, out),
        leaf if !prefix.is_empty() => {
            out.insert(prefix.to_string(), ConfigValue::from_yaml(leaf));
        }
        _ => {}
    }
}
