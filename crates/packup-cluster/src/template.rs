use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

const KIND_TEMPLATE: &str = "Template";
const KIND_LIST: &str = "List";
const KIND_PVC: &str = "PersistentVolumeClaim";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    pub persist_volumes: bool,
    pub initial_install: bool,
}

/// Turns a downloaded package template into the flat list of objects to apply.
///
/// Every YAML document is read; `List` items are flattened and OpenShift `Template`
/// documents are expanded with their parameter defaults overlaid by `parameters`.
pub fn process_template(
    payload: &[u8],
    parameters: &BTreeMap<String, String>,
    options: ProcessOptions,
) -> Result<Vec<Value>> {
    let mut objects = Vec::new();
    for document in serde_yaml::Deserializer::from_slice(payload) {
        let value = Value::deserialize(document).context("failed to parse template YAML")?;
        if value.is_null() {
            continue;
        }
        expand_document(value, parameters, &mut objects);
    }

    let keep_claims = options.persist_volumes && options.initial_install;
    objects.retain(|object| keep_claims || kind_of(object) != Some(KIND_PVC));
    if !options.persist_volumes {
        for object in &mut objects {
            replace_claim_volumes(object);
        }
    }
    Ok(objects)
}

pub fn render_object_list(objects: &[Value]) -> Result<String> {
    let mut list = Mapping::new();
    list.insert("apiVersion".into(), "v1".into());
    list.insert("kind".into(), KIND_LIST.into());
    list.insert("items".into(), Value::Sequence(objects.to_vec()));
    serde_yaml::to_string(&Value::Mapping(list)).context("failed to render object list")
}

fn kind_of(object: &Value) -> Option<&str> {
    object.get("kind").and_then(Value::as_str)
}

fn expand_document(
    mut value: Value,
    parameters: &BTreeMap<String, String>,
    objects: &mut Vec<Value>,
) {
    let kind = kind_of(&value).map(str::to_string);
    match kind.as_deref() {
        Some(KIND_TEMPLATE) => {
            let mut merged = template_parameter_defaults(&value);
            merged.extend(parameters.iter().map(|(k, v)| (k.clone(), v.clone())));

            let items = match value.get_mut("objects") {
                Some(Value::Sequence(items)) => std::mem::take(items),
                _ => Vec::new(),
            };
            for item in items {
                expand_document(item, &merged, objects);
            }
        }
        Some(KIND_LIST) => {
            let items = match value.get_mut("items") {
                Some(Value::Sequence(items)) => std::mem::take(items),
                _ => Vec::new(),
            };
            for item in items {
                expand_document(item, parameters, objects);
            }
        }
        _ => {
            substitute_parameters(&mut value, parameters);
            objects.push(value);
        }
    }
}

fn template_parameter_defaults(template: &Value) -> BTreeMap<String, String> {
    let Some(Value::Sequence(declared)) = template.get("parameters") else {
        return BTreeMap::new();
    };

    declared
        .iter()
        .filter_map(|parameter| {
            let name = parameter.get("name")?.as_str()?;
            let value = match parameter.get("value") {
                Some(Value::String(value)) => value.clone(),
                Some(Value::Number(value)) => value.to_string(),
                Some(Value::Bool(value)) => value.to_string(),
                _ => String::new(),
            };
            Some((name.to_string(), value))
        })
        .collect()
}

fn substitute_parameters(value: &mut Value, parameters: &BTreeMap<String, String>) {
    match value {
        Value::String(text) => {
            if !text.contains("${") {
                return;
            }
            for (name, replacement) in parameters {
                *text = text
                    .replace(&format!("${{{{{name}}}}}"), replacement)
                    .replace(&format!("${{{name}}}"), replacement);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                substitute_parameters(item, parameters);
            }
        }
        Value::Mapping(map) => {
            for (_, item) in map.iter_mut() {
                substitute_parameters(item, parameters);
            }
        }
        Value::Tagged(tagged) => substitute_parameters(&mut tagged.value, parameters),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

fn replace_claim_volumes(value: &mut Value) {
    match value {
        Value::Mapping(map) => {
            if let Some(Value::Sequence(volumes)) = map.get_mut("volumes") {
                for volume in volumes.iter_mut() {
                    if let Value::Mapping(volume) = volume {
                        if volume.remove("persistentVolumeClaim").is_some() {
                            volume.insert("emptyDir".into(), Value::Mapping(Mapping::new()));
                        }
                    }
                }
            }
            for (_, item) in map.iter_mut() {
                replace_claim_volumes(item);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                replace_claim_volumes(item);
            }
        }
        Value::Tagged(tagged) => replace_claim_volumes(&mut tagged.value),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}
