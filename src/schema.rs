use crate::models::*;
use anyhow::{anyhow, Context, Result};
use schemars::schema::RootSchema;
use schemars::schema_for;
use std::fs;
use std::path::Path;

/// Generate JSON schemas for everything the command line tool prints
pub fn generate_schemas(schema_dir: &Path) -> Result<()> {
    fs::create_dir_all(schema_dir)
        .with_context(|| format!("Failed to create schema directory: {:?}", schema_dir))?;

    let schemas: [(&str, RootSchema); 3] = [
        ("verse-chunks-1.0.json", schema_for!(ParsedReference)),
        ("cleaned-reference-1.0.json", schema_for!(CleanedReference)),
        ("containment-1.0.json", schema_for!(ContainmentResult)),
    ];

    for (file_name, schema) in schemas {
        let path = schema_dir.join(file_name);
        let json = serde_json::to_string_pretty(&schema)
            .with_context(|| format!("Failed to serialize schema {}", file_name))?;
        fs::write(&path, json).with_context(|| format!("Failed to write schema: {:?}", path))?;
    }

    Ok(())
}

pub fn schema_violations(json: &serde_json::Value, schema_path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(schema_path)
        .with_context(|| format!("Failed to read schema: {:?}", schema_path))?;
    let schema: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse schema: {:?}", schema_path))?;

    let compiled = jsonschema::JSONSchema::compile(&schema)
        .map_err(|e| anyhow!("Failed to compile schema {:?}: {}", schema_path, e))?;

    let violations = match compiled.validate(json) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|e| format!("{} at {}", e, e.instance_path)).collect(),
    };
    Ok(violations)
}

pub fn validate_json(json: &serde_json::Value, schema_path: &Path) -> Result<()> {
    let violations = schema_violations(json, schema_path)?;
    if violations.is_empty() {
        return Ok(());
    }
    Err(anyhow!("Validation error: {}", violations.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ReferenceParser;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_generate_schemas() {
        let temp_dir = TempDir::new().unwrap();
        generate_schemas(temp_dir.path()).unwrap();

        assert!(temp_dir.path().join("verse-chunks-1.0.json").exists());
        assert!(temp_dir.path().join("cleaned-reference-1.0.json").exists());
        assert!(temp_dir.path().join("containment-1.0.json").exists());
    }

    #[test]
    fn test_parsed_output_matches_schema() {
        let temp_dir = TempDir::new().unwrap();
        generate_schemas(temp_dir.path()).unwrap();
        let parser = ReferenceParser::default();

        let parsed = parser.parse("front:intro;1:1-2,4;2:7ff;3-4").unwrap();
        let value = serde_json::to_value(&parsed).unwrap();
        assert!(validate_json(&value, &temp_dir.path().join("verse-chunks-1.0.json")).is_ok());

        let cleaned = parser.cleanup("1:12-2:4,6").unwrap();
        let value = serde_json::to_value(&cleaned).unwrap();
        assert!(validate_json(&value, &temp_dir.path().join("cleaned-reference-1.0.json")).is_ok());
    }

    #[test]
    fn test_schema_rejects_chunk_without_chapter() {
        let temp_dir = TempDir::new().unwrap();
        generate_schemas(temp_dir.path()).unwrap();

        let value = json!([{"verse": 1}]);
        let schema_path = temp_dir.path().join("verse-chunks-1.0.json");
        assert!(validate_json(&value, &schema_path).is_err());
        assert!(!schema_violations(&value, &schema_path).unwrap().is_empty());
    }
}
