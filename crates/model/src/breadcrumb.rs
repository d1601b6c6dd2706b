use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::route::{json_type_name, RouteDescriptor};

/// Where a route's parent comes from when declared explicitly: a route
/// name, or a full resolution descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParentSpec {
    Name(String),
    Descriptor(RouteDescriptor),
}

impl ParentSpec {
    /// Lenient wire parsing. A value that is neither a name string nor a
    /// descriptor object is logged and dropped; resolution then treats
    /// the route as a root.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(Self::Name(name.clone())),
            Value::Object(_) => match serde_json::from_value(value.clone()) {
                Ok(descriptor) => Some(Self::Descriptor(descriptor)),
                Err(err) => {
                    log::error!("breadcrumb `parent` descriptor is invalid: {err}");
                    None
                }
            },
            other => {
                log::error!(
                    "breadcrumb `parent` must be a route name or a descriptor, got {}",
                    json_type_name(other)
                );
                None
            }
        }
    }

    pub fn descriptor(&self) -> RouteDescriptor {
        match self {
            Self::Name(name) => RouteDescriptor::name(name.clone()),
            Self::Descriptor(descriptor) => descriptor.clone(),
        }
    }
}

/// One element of a supplied `parents_list`: a resolution target plus an
/// optional pre-resolved label and opaque `utils` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentsEntry {
    pub to: RouteDescriptor,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utils: Option<Value>,
}

impl ParentsEntry {
    pub fn new(to: RouteDescriptor) -> Self {
        Self {
            to,
            label: None,
            utils: None,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Breadcrumb metadata attached to a route or produced by a dynamic
/// source. On the wire this may be a bare label string; the shorthand is
/// promoted to a structure on parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BreadcrumbMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents_list: Option<Vec<ParentsEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utils: Option<Value>,
}

impl BreadcrumbMeta {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent: ParentSpec) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_parents_list(mut self, list: Vec<ParentsEntry>) -> Self {
        self.parents_list = Some(list);
        self
    }

    pub fn with_utils(mut self, utils: Value) -> Self {
        self.utils = Some(utils);
        self
    }

    /// Lenient wire parsing: a string is label shorthand, an object is
    /// read field by field, anything else degrades to empty metadata.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(label) => Self::label(label),
            Value::Object(map) => {
                let label = match map.get("label") {
                    Some(Value::String(label)) => Some(label.clone()),
                    Some(other) => {
                        log::warn!(
                            "breadcrumb `label` must be a string, got {}; ignoring",
                            json_type_name(other)
                        );
                        None
                    }
                    None => None,
                };
                let parent = map.get("parent").and_then(ParentSpec::from_value);
                let parents_list = map
                    .get("parentsList")
                    .or_else(|| map.get("parents_list"))
                    .and_then(parse_parents_list);
                let utils = map.get("utils").cloned();
                Self {
                    label,
                    parent,
                    parents_list,
                    utils,
                }
            }
            other => {
                log::warn!(
                    "breadcrumb metadata must be a string or an object, got {}; ignoring",
                    json_type_name(&other)
                );
                Self::default()
            }
        }
    }

    /// Push semantics for dynamically produced metadata: only fields
    /// present on `incoming` overwrite.
    pub fn merge_from(&mut self, incoming: &BreadcrumbMeta) {
        if let Some(label) = &incoming.label {
            self.label = Some(label.clone());
        }
        if let Some(parent) = &incoming.parent {
            self.parent = Some(parent.clone());
        }
        if let Some(list) = &incoming.parents_list {
            self.parents_list = Some(list.clone());
        }
        if let Some(utils) = &incoming.utils {
            self.utils = Some(utils.clone());
        }
    }
}

fn parse_parents_list(value: &Value) -> Option<Vec<ParentsEntry>> {
    let Value::Array(items) = value else {
        log::warn!(
            "breadcrumb `parentsList` must be an array, got {}; ignoring",
            json_type_name(value)
        );
        return None;
    };
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value(item.clone()) {
            Ok(entry) => entries.push(entry),
            Err(err) => log::warn!("skipping invalid `parentsList` entry: {err}"),
        }
    }
    Some(entries)
}

impl<'de> Deserialize<'de> for BreadcrumbMeta {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(value))
    }
}

/// The output unit of trail building: a resolution target, a resolved
/// label, and the opaque `utils` payload for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrailEntry {
    pub to: RouteDescriptor,
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utils: Option<Value>,
}

impl TrailEntry {
    pub fn new(to: RouteDescriptor, label: impl Into<String>) -> Self {
        Self {
            to,
            label: label.into(),
            utils: None,
        }
    }
}
