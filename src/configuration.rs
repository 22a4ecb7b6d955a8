//! Dependency configurations and their `extendsFrom` graph.
//!
//! Configurations form a directed graph where an edge `child -> parent` means
//! that `child` extends `parent` and so inherits every dependency declared on
//! it. The graph is explicit: nodes are keyed by name and edges are stored in
//! the graph, never looked up through the configurations themselves.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeRef};

use crate::attributes::AttributeSet;
use crate::core::ArcStr;
use crate::error::ConfigError;
use crate::files::FileCollection;

/// A dependency declared on a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// An external module, e.g. `org.example:lib:1.0`. Never resolved here.
    Module(ArcStr),
    /// Local files, e.g. another source set's output.
    Files(FileCollection),
}

impl Dependency {
    pub fn module(notation: impl Into<ArcStr>) -> Self {
        Self::Module(notation.into())
    }
}

/// A named classpath node.
#[derive(Debug, Clone)]
pub struct DependencyConfiguration {
    name: ArcStr,
    pub description: Option<String>,
    pub can_be_consumed: bool,
    pub can_be_resolved: bool,
    pub attributes: AttributeSet,
    dependencies: Vec<Dependency>,
}

impl DependencyConfiguration {
    fn new(name: ArcStr) -> Self {
        Self {
            name,
            description: None,
            can_be_consumed: true,
            can_be_resolved: true,
            attributes: AttributeSet::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dependencies declared directly on this configuration.
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }
}

/// Registry of all configurations of a project.
#[derive(Debug, Default)]
pub struct ConfigurationContainer {
    graph: DiGraph<DependencyConfiguration, ()>,
    index: HashMap<ArcStr, NodeIndex>,
}

impl ConfigurationContainer {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&self, name: &str) -> Result<NodeIndex, ConfigError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::ConfigurationNotFound(name.into()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Creates a configuration and hands it to `configure` for set up.
    pub fn create<F>(&mut self, name: &str, configure: F) -> Result<ArcStr, ConfigError>
    where
        F: FnOnce(&mut ConfigurationDef<'_>) -> Result<(), ConfigError>,
    {
        if self.contains(name) {
            return Err(ConfigError::DuplicateConfigurationName(name.into()));
        }

        let name: ArcStr = name.into();
        let index = self
            .graph
            .add_node(DependencyConfiguration::new(name.clone()));
        self.index.insert(name.clone(), index);

        configure(&mut ConfigurationDef {
            container: self,
            index,
        })?;

        tracing::debug!(configuration = %name, "created configuration");
        Ok(name)
    }

    pub fn get(&self, name: &str) -> Result<&DependencyConfiguration, ConfigError> {
        let index = self.node(name)?;
        Ok(&self.graph[index])
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut DependencyConfiguration, ConfigError> {
        let index = self.node(name)?;
        Ok(&mut self.graph[index])
    }

    /// Makes `configuration` extend `parent`.
    ///
    /// Extending the same parent twice adds a single edge. An edge that would
    /// close a cycle is rejected.
    pub fn extends_from(&mut self, configuration: &str, parent: &str) -> Result<(), ConfigError> {
        let child = self.node(configuration)?;
        let parent_index = self.node(parent)?;

        if child == parent_index || has_path_connecting(&self.graph, parent_index, child, None) {
            return Err(ConfigError::CyclicExtension {
                configuration: configuration.into(),
                parent: parent.into(),
            });
        }

        self.graph.update_edge(child, parent_index, ());
        tracing::debug!(configuration, parent, "extends from");
        Ok(())
    }

    /// The configurations `name` directly extends, in the order they were added.
    pub fn extends_of(&self, name: &str) -> Result<Vec<ArcStr>, ConfigError> {
        let index = self.node(name)?;
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);

        Ok(edges
            .into_iter()
            .map(|(_, target)| self.graph[target].name.clone())
            .collect())
    }

    /// `name` followed by every configuration it transitively extends.
    pub fn hierarchy(&self, name: &str) -> Result<Vec<ArcStr>, ConfigError> {
        let start = self.node(name)?;
        let mut dfs = Dfs::new(&self.graph, start);
        let mut names = Vec::new();

        while let Some(index) = dfs.next(&self.graph) {
            names.push(self.graph[index].name.clone());
        }

        Ok(names)
    }

    pub fn add_dependency(&mut self, name: &str, dependency: Dependency) -> Result<(), ConfigError> {
        let configuration = self.get_mut(name)?;
        if !configuration.dependencies.contains(&dependency) {
            configuration.dependencies.push(dependency);
        }
        Ok(())
    }

    /// Every dependency declared on `name` or anything it extends.
    pub fn dependency_closure(&self, name: &str) -> Result<Vec<Dependency>, ConfigError> {
        let mut closure: Vec<Dependency> = Vec::new();

        for configuration in self.hierarchy(name)? {
            for dependency in self.get(&configuration)?.dependencies() {
                if !closure.contains(dependency) {
                    closure.push(dependency.clone());
                }
            }
        }

        Ok(closure)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|configuration| configuration.name())
    }
}

impl std::fmt::Display for ConfigurationContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "graph LR")?;

        for index in self.graph.node_indices() {
            writeln!(f, "    {}[\"{}\"]", index.index(), self.graph[index].name)?;
        }

        for edge in self.graph.edge_references() {
            writeln!(
                f,
                "    {} -- \"extendsFrom\" --> {}",
                edge.source().index(),
                edge.target().index()
            )?;
        }

        Ok(())
    }
}

/// Set up handle passed to [`ConfigurationContainer::create`].
pub struct ConfigurationDef<'a> {
    container: &'a mut ConfigurationContainer,
    index: NodeIndex,
}

impl ConfigurationDef<'_> {
    fn this(&mut self) -> &mut DependencyConfiguration {
        &mut self.container.graph[self.index]
    }

    pub fn name(&self) -> ArcStr {
        self.container.graph[self.index].name.clone()
    }

    pub fn can_be_consumed(&mut self, value: bool) -> &mut Self {
        self.this().can_be_consumed = value;
        self
    }

    pub fn can_be_resolved(&mut self, value: bool) -> &mut Self {
        self.this().can_be_resolved = value;
        self
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.this().description = Some(description.into());
        self
    }

    pub fn attributes(&mut self, configure: impl FnOnce(&mut AttributeSet)) -> &mut Self {
        configure(&mut self.this().attributes);
        self
    }

    pub fn extends_from(&mut self, parent: &str) -> Result<&mut Self, ConfigError> {
        let name = self.name();
        self.container.extends_from(&name, parent)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{Attribute, Named};

    fn container() -> ConfigurationContainer {
        let mut container = ConfigurationContainer::new();
        container.create("implementation", |_| Ok(())).unwrap();
        container.create("runtimeOnly", |_| Ok(())).unwrap();
        container
            .create("runtimeClasspath", |c| {
                c.extends_from("implementation")?.extends_from("runtimeOnly")?;
                Ok(())
            })
            .unwrap();
        container
    }

    #[test]
    fn test_create_rejects_duplicates() {
        let mut container = container();
        let err = container.create("implementation", |_| Ok(())).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateConfigurationName(name) if &*name == "implementation"));
        assert_eq!(
            container.names().collect::<Vec<_>>(),
            vec!["implementation", "runtimeOnly", "runtimeClasspath"]
        );
    }

    #[test]
    fn test_extends_of_keeps_insertion_order() {
        let container = container();
        let parents = container.extends_of("runtimeClasspath").unwrap();
        let parents: Vec<&str> = parents.iter().map(|p| &**p).collect();
        assert_eq!(parents, vec!["implementation", "runtimeOnly"]);
    }

    #[test]
    fn test_extends_from_is_deduplicated() {
        let mut container = container();
        container
            .extends_from("runtimeClasspath", "implementation")
            .unwrap();
        assert_eq!(container.extends_of("runtimeClasspath").unwrap().len(), 2);
    }

    #[test]
    fn test_extends_from_rejects_cycles() {
        let mut container = container();
        let err = container
            .extends_from("implementation", "runtimeClasspath")
            .unwrap_err();
        assert!(matches!(err, ConfigError::CyclicExtension { .. }));

        let err = container
            .extends_from("implementation", "implementation")
            .unwrap_err();
        assert!(matches!(err, ConfigError::CyclicExtension { .. }));
    }

    #[test]
    fn test_missing_configuration() {
        let container = container();
        assert!(matches!(
            container.get("nope"),
            Err(ConfigError::ConfigurationNotFound(name)) if &*name == "nope"
        ));
    }

    #[test]
    fn test_dependency_closure_walks_hierarchy() {
        let mut container = container();
        container
            .add_dependency("implementation", Dependency::module("org.example:lib:1.0"))
            .unwrap();
        container
            .add_dependency("runtimeOnly", Dependency::module("org.example:driver:2.0"))
            .unwrap();
        container
            .add_dependency("implementation", Dependency::module("org.example:lib:1.0"))
            .unwrap();

        let closure = container.dependency_closure("runtimeClasspath").unwrap();
        assert_eq!(
            closure,
            vec![
                Dependency::module("org.example:lib:1.0"),
                Dependency::module("org.example:driver:2.0"),
            ]
        );
    }

    #[test]
    fn test_configuration_def_sets_flags_and_attributes() {
        let mut container = container();
        container
            .create("custom", |c| {
                c.can_be_consumed(false)
                    .description("Custom classpath.")
                    .attributes(|a| {
                        a.attribute(Attribute::usage(), Named::new(Named::JAVA_RUNTIME));
                    });
                Ok(())
            })
            .unwrap();

        let custom = container.get("custom").unwrap();
        assert!(!custom.can_be_consumed);
        assert!(custom.can_be_resolved);
        assert_eq!(custom.description.as_deref(), Some("Custom classpath."));
        assert_eq!(custom.attributes.len(), 1);
    }

    #[test]
    fn test_display_renders_mermaid() {
        let rendered = container().to_string();
        assert!(rendered.starts_with("graph LR\n"));
        assert!(rendered.contains("[\"runtimeClasspath\"]"));
        assert!(rendered.contains("-- \"extendsFrom\" -->"));
    }
}
