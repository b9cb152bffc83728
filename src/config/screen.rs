// ABOUTME: Type screening of a raw YAML config before typed deserialization.
// ABOUTME: Mistyped fields fall back to their defaults and are reported by validation.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;

use super::deserialize::deserialize_one_or_many;
use super::{TimeLimit, VersionFile};

/// A field whose value has the wrong YAML type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMismatch {
    /// Dotted path, e.g. `email.recipients`.
    pub field: String,
    pub reason: String,
}

const TOP_LEVEL: &[&str] = &[
    "remote_repository",
    "branch",
    "target_dir",
    "temp_dir",
    "version_file",
    "git_rm",
    "delete_files",
    "exclude_files",
    "clean_up",
    "time_limit",
];

const SECTIONS: &[(&str, &[&str])] = &[
    ("backup", &["enabled", "dir"]),
    ("composer", &["enabled", "options", "home"]),
    ("npm", &["enabled"]),
    ("email", &["on_success", "on_error", "recipients"]),
];

#[derive(Deserialize)]
struct Recipients(#[serde(deserialize_with = "deserialize_one_or_many")] Vec<String>);

fn accepts<T: DeserializeOwned>(value: &Value) -> Result<(), serde_yaml::Error> {
    serde_yaml::from_value::<T>(value.clone()).map(|_| ())
}

fn check(field: &str, value: &Value) -> Result<(), serde_yaml::Error> {
    match field {
        "remote_repository" => accepts::<String>(value),
        "target_dir" => accepts::<PathBuf>(value),
        "branch" | "composer.options" => accepts::<Option<String>>(value),
        "temp_dir" | "backup.dir" | "composer.home" => accepts::<Option<PathBuf>>(value),
        "version_file" => accepts::<VersionFile>(value),
        "exclude_files" => accepts::<Vec<String>>(value),
        "time_limit" => accepts::<TimeLimit>(value),
        "email.recipients" => accepts::<Recipients>(value),
        _ => accepts::<bool>(value),
    }
}

/// Remove every mistyped field from `document` and report it.
///
/// A document that is not a mapping is left alone for the typed pass to reject.
pub(super) fn screen(document: &mut Value) -> Vec<TypeMismatch> {
    let mut mismatches = Vec::new();
    let Some(root) = document.as_mapping_mut() else {
        return mismatches;
    };

    for field in TOP_LEVEL {
        screen_field(root, field, field, &mut mismatches);
    }

    for (section, fields) in SECTIONS {
        let (is_null, is_mapping) = match root.get(*section) {
            None => continue,
            Some(value) => (value.is_null(), value.is_mapping()),
        };
        if is_null {
            // An empty section means all defaults.
            root.remove(*section);
            continue;
        }
        if !is_mapping {
            root.remove(*section);
            mismatches.push(TypeMismatch {
                field: section.to_string(),
                reason: "must be a mapping".to_string(),
            });
            continue;
        }
        if let Some(Value::Mapping(inner)) = root.get_mut(*section) {
            for field in *fields {
                let path = format!("{section}.{field}");
                screen_field(inner, field, &path, &mut mismatches);
            }
        }
    }

    mismatches
}

fn screen_field(map: &mut Mapping, key: &str, path: &str, mismatches: &mut Vec<TypeMismatch>) {
    let Some(value) = map.get(key) else {
        return;
    };
    if let Err(e) = check(path, value) {
        tracing::debug!(field = path, error = %e, "config field has the wrong type");
        mismatches.push(TypeMismatch {
            field: path.to_string(),
            reason: e.to_string(),
        });
        map.remove(key);
    }
}
