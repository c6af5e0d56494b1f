#![deny(missing_docs)]

//! # Generate Command
//!
//! Runs the whole pipeline: load metadata, assemble the mapping table, scan
//! the root set, resolve, render, and write.

use std::fs;
use std::path::{Path, PathBuf};

use tsmapper_core::{
    collect_roots, render, MapperError, MapperResult, MappingConfig, MappingRule, MappingTable,
    Resolver, Universe,
};

/// Arguments for the generation run.
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the metadata document.
    pub metadata: PathBuf,
    /// Output path; `None` prints to stdout.
    pub output: Option<PathBuf>,
    /// Optional custom mapping configuration path.
    pub mappings: Option<PathBuf>,
    /// Embed debug annotations in the output.
    pub debug: bool,
}

/// Executes the generation.
pub fn execute(args: &GenerateArgs) -> MapperResult<()> {
    if !args.metadata.exists() {
        return Err(MapperError::General(format!(
            "Metadata file not found: {:?}",
            args.metadata
        )));
    }

    // 1. Load the universe
    let universe = Universe::load(&args.metadata)?;

    // 2. Assemble the mapping table: user rules first, then the catch-all,
    //    then the built-ins.
    let mut custom = match &args.mappings {
        Some(path) => load_mapping_configs(path)?
            .into_iter()
            .map(MappingConfig::into_rule)
            .collect(),
        None => Vec::new(),
    };
    custom.push(object_catch_all());
    let table = MappingTable::with_custom(custom);

    // 3. Scan roots and resolve
    let roots = collect_roots(&universe);
    let graph = Resolver::new(&universe, &table).resolve_all(roots);

    // 4. Render and write
    let code = render(&graph, args.debug);
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, code)?;
            println!("Generated TypeScript at {:?}", path);
        }
        None => print!("{}", code),
    }

    Ok(())
}

/// Dynamically-shaped members are deliberately opaque: `System.Object` maps
/// to the open `any` destination. There is no built-in rule for it, so the
/// default consumer supplies this catch-all ahead of the built-ins.
fn object_catch_all() -> MappingRule {
    MappingRule::full_names(&["System.Object"], "any", "{0}")
}

fn load_mapping_configs(path: &Path) -> MapperResult<Vec<MappingConfig>> {
    let content = fs::read_to_string(path)?;
    let configs = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const METADATA: &str = r#"{
        "types": [
            {"namespace": "System", "name": "String", "fullName": "System.String", "kind": "primitive"},
            {"namespace": "System", "name": "Object", "fullName": "System.Object", "kind": "class"},
            {"namespace": "Shop", "name": "Order", "fullName": "Shop.Order", "kind": "class",
             "members": [{"name": "Id", "ty": 0}, {"name": "Extra", "ty": 1}]}
        ],
        "services": [
            {"name": "OrdersController", "operations": [
                {"name": "Get", "responseTypes": [2], "parameters": []}
            ]}
        ]
    }"#;

    #[test]
    fn test_execute_writes_output_file() {
        let dir = tempdir().unwrap();
        let metadata_path = dir.path().join("universe.json");
        fs::write(&metadata_path, METADATA).unwrap();
        let output_path = dir.path().join("generated").join("api.ts");

        let args = GenerateArgs {
            metadata: metadata_path,
            output: Some(output_path.clone()),
            mappings: None,
            debug: false,
        };
        execute(&args).expect("generation succeeds");

        let code = fs::read_to_string(&output_path).unwrap();
        assert!(code.contains("export class Order {"));
        assert!(code.contains("Id: string;"));
        // The object member hit the default catch-all.
        assert!(code.contains("Extra: any;"));
    }

    #[test]
    fn test_execute_with_custom_mappings() {
        let dir = tempdir().unwrap();
        let metadata_path = dir.path().join("universe.json");
        fs::write(&metadata_path, METADATA).unwrap();
        let mappings_path = dir.path().join("mappings.json");
        fs::write(
            &mappings_path,
            r#"[{"fullNames": ["System.String"], "destinationType": "text", "assignmentTemplate": "{0}"}]"#,
        )
        .unwrap();
        let output_path = dir.path().join("api.ts");

        let args = GenerateArgs {
            metadata: metadata_path,
            output: Some(output_path.clone()),
            mappings: Some(mappings_path),
            debug: false,
        };
        execute(&args).expect("generation succeeds");

        let code = fs::read_to_string(&output_path).unwrap();
        // The user rule overrode the built-in string mapping.
        assert!(code.contains("Id: text;"));
    }

    #[test]
    fn test_missing_metadata_is_an_error() {
        let args = GenerateArgs {
            metadata: PathBuf::from("/nonexistent/universe.json"),
            output: None,
            mappings: None,
            debug: false,
        };
        let err = execute(&args).unwrap_err();
        assert!(format!("{}", err).contains("Metadata file not found"));
    }
}
