//! Prompt builder for rendering templates.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use ragchat_core::{AppError, AppResult};
use std::collections::HashMap;

/// Build a prompt from a definition and input variables.
///
/// Every variable the definition declares must be present. Values are
/// inserted verbatim; HTML escaping is disabled.
///
/// # Example
/// ```no_run
/// use ragchat_prompt::{build_prompt, PromptDefinition};
/// use std::collections::HashMap;
///
/// # fn example(def: PromptDefinition) -> Result<(), Box<dyn std::error::Error>> {
/// let mut vars = HashMap::new();
/// vars.insert("prompt".to_string(), "How often should I grease the boom pins?".to_string());
///
/// let built = build_prompt(&def, vars)?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    if let Some(missing) = definition
        .variables
        .iter()
        .find(|name| !variables.contains_key(*name))
    {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' requires variable '{}'",
            definition.id, missing
        )));
    }

    let rendered = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt::new(rendered, definition.id.clone(), variables))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
