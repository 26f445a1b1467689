//! Loading prompt records from YAML and writing pulled drafts.

use crate::types::{PromptRecord, RawPrompt};
use promptsync_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Load the single prompt record stored in a YAML file.
///
/// The file must contain exactly one top-level key (the prompt name) mapping
/// to the record's fields. Wrong-typed fields are kept for the validator to
/// report; only an unreadable file or a wrong overall shape is an error.
/// A key given in both spellings (`systemPrompt` and `system_prompt`) is a
/// shape error too, since neither value can be chosen.
///
/// # Example
/// ```no_run
/// use promptsync_prompt::load_prompt_file;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let record = load_prompt_file(Path::new("prompts/bug_to_user_story_v2.yml"))?;
/// println!("Loaded prompt: {}", record.name);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt_file(path: &Path) -> AppResult<PromptRecord> {
    tracing::debug!("Loading prompt from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!("Prompt file not found: {:?}", path)));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let document: serde_yaml::Value = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    let mapping = match document {
        serde_yaml::Value::Mapping(mapping) => mapping,
        _ => {
            return Err(AppError::Prompt(format!(
                "Prompt file {:?} must be a mapping of prompt name to prompt fields",
                path
            )))
        }
    };

    if mapping.len() != 1 {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} must contain exactly one prompt, found {}",
            path,
            mapping.len()
        )));
    }

    let Some((key, body)) = mapping.into_iter().next() else {
        return Err(AppError::Prompt(format!("Prompt file {:?} is empty", path)));
    };

    let name = key
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::Prompt(format!("Prompt name in {:?} must be a string", path)))?;

    if !body.is_mapping() {
        return Err(AppError::Prompt(format!(
            "Prompt '{}' in {:?} must be a mapping of fields",
            name, path
        )));
    }

    let mut record: PromptRecord = serde_yaml::from_value(body).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt '{}' in {:?}: {}", name, path, e))
    })?;
    record.name = name;

    tracing::info!("Loaded prompt: {}", record.name);

    Ok(record)
}

/// Write a pulled draft, creating parent directories as needed.
pub fn save_raw_prompt(raw: &RawPrompt, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let yaml = serde_yaml::to_string(raw)?;
    std::fs::write(path, yaml)?;

    tracing::info!("Saved raw prompt {} to {:?}", raw.prompt_id, path);

    Ok(())
}

/// List prompt files (`*.yml`, `*.yaml`) under a directory, sorted.
pub fn list_prompt_files(dir: &Path) -> AppResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AppError::Prompt(format!("Not a directory: {:?}", dir)));
    }

    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yml") | Some("yaml")
        );
        if path.is_file() && is_yaml {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, RawPromptMetadata};
    use chrono::Utc;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            temp_dir.path(),
            "v2.yml",
            r#"
bug_to_user_story_v2:
  description: "Bug to user story"
  system_prompt: |
    You are a Product Manager.
  user_prompt: "{bug_report}"
  version: v2
  techniques_applied:
    - few_shot
    - role_prompting
  tags: [product]
"#,
        );

        let record = load_prompt_file(&path).unwrap();
        assert_eq!(record.name, "bug_to_user_story_v2");
        assert_eq!(record.system_text(), "You are a Product Manager.\n");
        assert_eq!(record.techniques().len(), 2);
    }

    #[test]
    fn test_wrong_typed_fields_still_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            temp_dir.path(),
            "bad.yml",
            "p:\n  systemPrompt: [1, 2]\n  techniquesApplied: few_shot\n",
        );

        let record = load_prompt_file(&path).unwrap();
        assert_eq!(record.system_prompt, Field::Invalid { found: "list" });
        assert_eq!(record.techniques_applied, Field::Invalid { found: "string" });
    }

    #[test]
    fn test_numeric_version_loads_as_label() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(temp_dir.path(), "v3.yml", "p:\n  version: 3\n  tags: [product, 2024]\n");

        let record = load_prompt_file(&path).unwrap();
        assert_eq!(record.version, Field::Present("3".to_string()));
        assert_eq!(record.author_tags(), ["product".to_string(), "2024".to_string()]);
    }

    #[test]
    fn test_both_key_spellings_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            temp_dir.path(),
            "dup.yml",
            "p:\n  systemPrompt: one\n  system_prompt: two\n",
        );

        let err = load_prompt_file(&path).unwrap_err();
        assert!(matches!(err, AppError::Prompt(_)));
        assert!(err.to_string().contains("duplicate field"));
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_prompt_file(&temp_dir.path().join("nope.yml"));
        assert!(matches!(result, Err(AppError::Prompt(_))));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(temp_dir.path(), "invalid.yml", "invalid: yaml: content:");
        assert!(load_prompt_file(&path).is_err());
    }

    #[test]
    fn test_requires_exactly_one_prompt() {
        let temp_dir = TempDir::new().unwrap();

        let two = write(temp_dir.path(), "two.yml", "a:\n  version: v1\nb:\n  version: v2\n");
        let err = load_prompt_file(&two).unwrap_err();
        assert!(err.to_string().contains("exactly one prompt, found 2"));

        let empty = write(temp_dir.path(), "empty.yml", "{}\n");
        assert!(load_prompt_file(&empty).is_err());

        let list = write(temp_dir.path(), "list.yml", "- a\n- b\n");
        assert!(load_prompt_file(&list).is_err());

        let scalar_body = write(temp_dir.path(), "scalar.yml", "a: just text\n");
        assert!(load_prompt_file(&scalar_body).is_err());
    }

    #[test]
    fn test_save_raw_prompt_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prompts/raw_prompts.yml");
        let raw = RawPrompt {
            prompt_id: "leonanluppi/bug_to_user_story_v1".to_string(),
            prompt_template: "Bug: {bug_report}".to_string(),
            input_variables: vec!["bug_report".to_string()],
            metadata: RawPromptMetadata {
                source: "langsmith_hub".to_string(),
                pulled_at: Utc::now(),
                commit_hash: Some("abc".to_string()),
            },
        };

        save_raw_prompt(&raw, &path).unwrap();

        let saved: RawPrompt = serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, raw);
    }

    #[test]
    fn test_list_prompt_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("nested")).unwrap();
        fs::create_dir_all(temp_dir.path().join(".hidden")).unwrap();
        write(temp_dir.path(), "b.yml", "");
        write(temp_dir.path(), "a.yaml", "");
        write(temp_dir.path(), "notes.md", "");
        write(&temp_dir.path().join("nested"), "c.yml", "");
        write(&temp_dir.path().join(".hidden"), "d.yml", "");

        let files = list_prompt_files(temp_dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.yaml"),
                PathBuf::from("b.yml"),
                PathBuf::from("nested/c.yml"),
            ]
        );
    }
}
