use std::collections::HashMap;

use crate::domain::entities::app_name::AppName;

/// Context for template rendering.
///
/// A **Value Object** holding the variables generator templates may reference
/// as `{{VARIABLE}}`. Immutable after creation; `with_variable` returns a new
/// instance.
///
/// ## Built-in Variables
///
/// | Variable | Example |
/// |----------|---------|
/// | `APP_NAME` | "hello_world" |
/// | `APP_NAME_SNAKE` | "hello_world" |
/// | `APP_NAME_KEBAB` | "hello-world" |
/// | `APP_NAME_PASCAL` | "HelloWorld" |
#[derive(Debug, Clone)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new(name: &AppName) -> Self {
        let mut vars = HashMap::new();
        vars.insert("APP_NAME".to_string(), name.as_str().to_string());
        vars.insert("APP_NAME_SNAKE".to_string(), name.snake());
        vars.insert("APP_NAME_KEBAB".to_string(), name.kebab());
        vars.insert("APP_NAME_PASCAL".to_string(), name.pascal());
        Self { variables: vars }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// Replace every `{{VARIABLE}}` placeholder.
    ///
    /// Unknown placeholders are left as-is, so Go template syntax such as
    /// `{{ .Title }}` passes through untouched.
    pub fn render(&self, template: &str) -> String {
        let mut result = template.to_string();
        for (key, value) in &self.variables {
            let placeholder = format!("{{{{{key}}}}}");
            result = result.replace(&placeholder, value);
        }
        result
    }
}
