// common/src/models/template.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Saved job definition that can be executed with optional overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTemplate {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub target: String,
    pub function: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
    pub category: String,
    pub is_public: bool,
    pub created_by: String,
}

impl JobTemplate {
    /// Public templates are visible to everyone, private ones to their creator
    pub fn visible_to(&self, username: &str) -> bool {
        self.is_public || self.created_by == username
    }
}

fn general() -> String {
    "general".to_string()
}

fn public() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobTemplateCreate {
    pub name: String,
    pub description: Option<String>,
    pub target: String,
    pub function: String,
    pub args: Option<Vec<Value>>,
    pub kwargs: Option<Map<String, Value>>,
    #[serde(default = "general")]
    pub category: String,
    #[serde(default = "public")]
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobTemplateUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target: Option<String>,
    pub function: Option<String>,
    pub args: Option<Vec<Value>>,
    pub kwargs: Option<Map<String, Value>>,
    pub category: Option<String>,
    pub is_public: Option<bool>,
}

impl JobTemplate {
    pub fn apply(&mut self, update: JobTemplateUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(target) = update.target {
            self.target = target;
        }
        if let Some(function) = update.function {
            self.function = function;
        }
        if let Some(args) = update.args {
            self.args = args;
        }
        if let Some(kwargs) = update.kwargs {
            self.kwargs = kwargs;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
    }
}

/// Per-execution overrides; unset fields fall back to the template
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateOverrides {
    pub target: Option<String>,
    pub function: Option<String>,
    pub args: Option<Vec<Value>>,
    pub kwargs: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateQuery {
    pub category: Option<String>,
}
