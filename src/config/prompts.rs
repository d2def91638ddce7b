//! Prompt templates for TubeQA.
//!
//! The answer prompt can be customized by placing an `answer.toml` file in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub answer: AnswerPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompt for grounded answer generation.
///
/// `{{context}}` receives the retrieved transcript excerpts, `{{question}}` the user's question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    pub template: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are a helpful assistant analyzing YouTube video content.
Answer the question based ONLY on the provided transcript context.
If the context doesn't contain sufficient information, politely say you don't know.
Provide detailed, well-structured answers when possible.

Context from video transcript:
{{context}}

Question: {{question}}

Answer:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let answer_path = custom_path.join("answer.toml");
            if answer_path.exists() {
                let content = std::fs::read_to_string(&answer_path)?;
                prompts.answer = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_has_placeholders() {
        let prompts = Prompts::default();
        assert!(prompts.answer.template.contains("{{context}}"));
        assert!(prompts.answer.template.contains("{{question}}"));
        assert!(prompts.answer.template.contains("ONLY"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut custom = HashMap::new();
        custom.insert("tone".to_string(), "formal".to_string());
        custom.insert("question".to_string(), "ignored".to_string());
        let prompts = Prompts::load(None, Some(&custom)).unwrap();

        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "Why?".to_string());
        let rendered = prompts.render_with_custom("{{tone}}: {{question}}", &vars);
        assert_eq!(rendered, "formal: Why?");
    }

    #[test]
    fn test_custom_dir_overrides_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("answer.toml"),
            "template = \"Q: {{question}}\\nC: {{context}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.answer.template, "Q: {{question}}\nC: {{context}}");
    }
}
