//! Prompt loader for YAML prompt definitions.

use crate::builtin::{builtin_ids, builtin_prompt};
use crate::types::PromptDefinition;
use ragchat_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".ragchat/prompts")
}

/// Load a prompt definition by ID.
///
/// `.ragchat/prompts/<id>.yml` in the workspace takes precedence; otherwise
/// the built-in definition with that id is returned.
///
/// # Example
/// ```no_run
/// use ragchat_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "policy.classify")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if !prompt_file.exists() {
        tracing::debug!("No prompt override at {:?}, using built-in", prompt_file);
        return builtin_prompt(prompt_id)
            .ok_or_else(|| AppError::Prompt(format!("Prompt not found: {}", prompt_id)));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    if definition.id != prompt_id {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} declares id '{}', expected '{}'",
            prompt_file, definition.id, prompt_id
        )));
    }

    tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// List all available prompt IDs: built-ins plus workspace files, sorted.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let mut prompt_ids: Vec<String> = builtin_ids().iter().map(|s| s.to_string()).collect();

    let dir = prompts_dir(workspace_path);
    if dir.exists() {
        for entry in walkdir::WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    prompt_ids.push(stem.to_string());
                }
            }
        }
    }

    prompt_ids.sort();
    prompt_ids.dedup();
    Ok(prompt_ids)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::CLASSIFY_PROMPT_ID;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, file_id: &str, contents: &str) {
        let prompts_dir = dir.join(".ragchat/prompts");
        fs::create_dir_all(&prompts_dir).unwrap();
        fs::write(prompts_dir.join(format!("{}.yml", file_id)), contents).unwrap();
    }

    #[test]
    fn test_builtin_used_without_override() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_prompt(temp_dir.path(), CLASSIFY_PROMPT_ID).unwrap();
        assert_eq!(prompt.id, CLASSIFY_PROMPT_ID);
        assert!(prompt.template.contains("Category E"));
    }

    #[test]
    fn test_workspace_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(
            temp_dir.path(),
            CLASSIFY_PROMPT_ID,
            r#"
id: policy.classify
title: "Mining equipment only"
apiVersion: "1.1"
variables: [prompt]
template: "Is this about mining equipment? <user_request>{{prompt}}</user_request>"
"#,
        );

        let prompt = load_prompt(temp_dir.path(), CLASSIFY_PROMPT_ID).unwrap();
        assert_eq!(prompt.title, "Mining equipment only");
        assert!(prompt.template.contains("mining equipment"));
    }

    #[test]
    fn test_load_unknown_prompt() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_prompt(temp_dir.path(), "nonexistent").is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "chat.answer", "invalid: yaml: content:");
        assert!(load_prompt(temp_dir.path(), "chat.answer").is_err());
    }

    #[test]
    fn test_mismatched_id_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(
            temp_dir.path(),
            "chat.answer",
            r#"
id: something.else
title: "Wrong"
apiVersion: "1.0"
template: "{{prompt}}"
"#,
        );
        assert!(load_prompt(temp_dir.path(), "chat.answer").is_err());
    }

    #[test]
    fn test_list_prompts_merges_builtins() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "custom.one", "id: custom.one");
        write_prompt(temp_dir.path(), CLASSIFY_PROMPT_ID, "id: policy.classify");

        let prompts = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(
            prompts,
            vec![
                "chat.answer".to_string(),
                "custom.one".to_string(),
                "policy.classify".to_string()
            ]
        );
    }
}
