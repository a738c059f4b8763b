//! Static catalog of the tools exposed over MCP.
//!
//! Each descriptor pairs an input schema with a [`ToolKind`], and the kind
//! owns the argument-building strategy (see [`plan`]). Argument validation is
//! shared by every tool and driven by the schema alone.

mod catalog;
mod plan;
mod validation;

pub use catalog::ToolKind;
pub use plan::{ArgPart, CommandPlan, StagingRequest, ToolAction};
pub use validation::validate_arguments;

use coho_mcp_types::ToolSchema;
use coho_mcp_util::render_input_schema;
use serde_json::{Map, Value};

/// One entry of the tool catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub schema: ToolSchema,
    pub kind: ToolKind,
}

impl ToolDescriptor {
    /// JSON Schema object advertised for this tool's parameters.
    pub fn input_schema(&self) -> Map<String, Value> {
        render_input_schema(&self.schema)
    }
}

/// Immutable tool catalog, built once at startup.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    /// Build the full catalog in declaration order.
    pub fn catalog() -> Self {
        let tools = ToolKind::ALL
            .iter()
            .map(|kind| ToolDescriptor {
                name: kind.name(),
                description: kind.description(),
                schema: kind.schema(),
                kind: *kind,
            })
            .collect();
        Self { tools }
    }

    pub fn list(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tool_names_are_unique() {
        let registry = ToolRegistry::catalog();
        let names: HashSet<_> = registry.list().iter().map(|tool| tool.name).collect();
        assert_eq!(names.len(), registry.list().len());
        assert_eq!(registry.list().len(), 23);
    }

    #[test]
    fn shared_field_names_keep_one_kind_across_the_catalog() {
        let registry = ToolRegistry::catalog();
        for name in ["collection", "key", "keyspace", "files", "query"] {
            let kinds: HashSet<_> = registry
                .list()
                .iter()
                .filter_map(|tool| tool.schema.field(name))
                .map(|field| field.kind)
                .collect();
            assert!(kinds.len() <= 1, "field '{name}' declared with {kinds:?}");
        }
    }

    #[test]
    fn lookup_finds_declared_tools_only() {
        let registry = ToolRegistry::catalog();
        let query = registry.lookup("query_collection").expect("declared");
        assert_eq!(query.kind, ToolKind::QueryCollection);
        assert_eq!(query.input_schema()["required"], serde_json::json!(["collection"]));
        assert!(registry.lookup("drop_database").is_none());
    }

    #[test]
    fn every_description_is_present() {
        for tool in ToolRegistry::catalog().list() {
            assert!(!tool.description.trim().is_empty(), "{} has no description", tool.name);
        }
    }
}
