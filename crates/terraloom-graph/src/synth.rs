//! Synthesis of a resource graph into a provider-consumable artifact

use crate::error::Result;
use crate::graph::{ResourceGraph, validate_name};
use crate::kind::Category;
use serde_json::{Map, Value as Json, json};
use std::path::{Path, PathBuf};

/// File name of a synthesized stack
pub const ARTIFACT_FILE: &str = "cdk.tf.json";

/// Serializes a complete graph for the external apply engine
pub trait Synthesizer {
    /// Returns the synthesizer name (e.g. "terraform-json")
    fn name(&self) -> &str;

    /// Serialize the full graph
    fn synthesize(&self, graph: &ResourceGraph) -> Result<Artifact>;
}

/// Synthesized stack document
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Stack the document was produced from
    pub stack: String,

    /// Document body
    pub document: Json,
}

impl Artifact {
    pub fn to_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.document)?)
    }

    /// Path the artifact is written to under `out_dir`
    pub fn path_in(&self, out_dir: impl AsRef<Path>) -> PathBuf {
        out_dir
            .as_ref()
            .join("stacks")
            .join(&self.stack)
            .join(ARTIFACT_FILE)
    }

    /// Write `<out_dir>/stacks/<stack>/cdk.tf.json`
    pub fn write_to(&self, out_dir: impl AsRef<Path>) -> Result<PathBuf> {
        validate_name(&self.stack)?;
        let path = self.path_in(out_dir);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        std::fs::write(&path, self.to_string_pretty()?)?;
        tracing::info!("Wrote stack {} to {}", self.stack, path.display());
        Ok(path)
    }
}

/// Terraform JSON configuration syntax
#[derive(Debug, Clone, Default)]
pub struct TerraformJson;

impl TerraformJson {
    pub fn new() -> Self {
        Self
    }
}

impl Synthesizer for TerraformJson {
    fn name(&self) -> &str {
        "terraform-json"
    }

    fn synthesize(&self, graph: &ResourceGraph) -> Result<Artifact> {
        let mut required_providers = Map::new();
        let mut providers = Map::new();
        let mut data = Map::new();
        let mut resources = Map::new();

        for declaration in graph.iter() {
            let kind = declaration.kind();
            let body = declaration.attributes().to_json();

            match kind.category {
                Category::Provider => {
                    if let Some(source) = kind.source {
                        required_providers
                            .insert(kind.type_name.to_string(), json!({ "source": source }));
                    }
                    // Terraform allows several configurations per provider
                    let entry = providers
                        .entry(kind.type_name.to_string())
                        .or_insert_with(|| Json::Array(Vec::new()));
                    if let Json::Array(configs) = entry {
                        configs.push(body);
                    }
                }
                Category::Data => insert_block(&mut data, kind.type_name, declaration.name(), body),
                Category::Resource => {
                    insert_block(&mut resources, kind.type_name, declaration.name(), body)
                }
            }
        }

        let mut document = Map::new();
        document.insert(
            "//".to_string(),
            json!({
                "metadata": {
                    "stackName": graph.stack(),
                    "generator": format!("terraloom/{}", env!("CARGO_PKG_VERSION")),
                }
            }),
        );
        document.insert(
            "terraform".to_string(),
            json!({ "required_providers": required_providers }),
        );
        if !providers.is_empty() {
            document.insert("provider".to_string(), Json::Object(providers));
        }
        if !data.is_empty() {
            document.insert("data".to_string(), Json::Object(data));
        }
        if !resources.is_empty() {
            document.insert("resource".to_string(), Json::Object(resources));
        }

        tracing::debug!(
            "Synthesized stack {} with {} declarations",
            graph.stack(),
            graph.len()
        );

        Ok(Artifact {
            stack: graph.stack().to_string(),
            document: Json::Object(document),
        })
    }
}

fn insert_block(section: &mut Map<String, Json>, type_name: &str, name: &str, body: Json) {
    let by_name = section
        .entry(type_name.to_string())
        .or_insert_with(|| Json::Object(Map::new()));
    if let Json::Object(by_name) = by_name {
        by_name.insert(name.to_string(), body);
    }
}
