//! Rendering collected context into the transcript text block.

use anyhow::{Result, anyhow};
use minijinja::Environment;
use serde::Serialize;

use crate::domain::model::{ContextEntry, WorkspaceContext};

const CONTEXT_TEMPLATE_NAME: &str = "workspace_context";

const CONTEXT_TEMPLATE: &str = r#"Here are the files in the workspace ({{ origin }}):

{% for entry in entries %}
File: {{ entry.path }}
```
{{ entry.content }}
```

{% endfor %}
"#;

#[derive(Serialize)]
struct TemplateInput<'a> {
    origin: &'a str,
    entries: &'a [ContextEntry],
}

/// Renders a [`WorkspaceContext`] into the fixed text block appended to the
/// chat transcript: a header naming the origin, then each file as a
/// `File: <path>` line followed by its content in a fenced code block.
pub struct ContextRenderer {
    env: Environment<'static>,
}

impl ContextRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template(CONTEXT_TEMPLATE_NAME, CONTEXT_TEMPLATE)
            .map_err(|err| anyhow!("failed to register context template: {err}"))?;
        Ok(Self { env })
    }

    pub fn render(&self, context: &WorkspaceContext) -> Result<String> {
        let template = self
            .env
            .get_template(CONTEXT_TEMPLATE_NAME)
            .map_err(|err| anyhow!("context template missing: {err}"))?;
        let input = TemplateInput {
            origin: &context.origin,
            entries: &context.entries,
        };
        template
            .render(input)
            .map_err(|err| anyhow!("failed to render workspace context: {err}"))
    }
}
