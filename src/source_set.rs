//! Source sets (compilation units) and their naming conventions.

use std::collections::HashMap;

use crate::core::{ArcStr, Property};
use crate::error::ConfigError;
use crate::files::{FileCollection, Location};

/// A set of source or resource directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDirectorySet {
    src_dirs: Vec<Location>,
}

impl SourceDirectorySet {
    pub fn new(src_dirs: Vec<Location>) -> Self {
        Self { src_dirs }
    }

    /// Replaces all directories.
    pub fn set_src_dirs(&mut self, src_dirs: impl IntoIterator<Item = Location>) {
        self.src_dirs = src_dirs.into_iter().collect();
    }

    pub fn src_dirs(&self) -> &[Location] {
        &self.src_dirs
    }

    pub fn first(&self) -> Option<&Location> {
        self.src_dirs.first()
    }
}

/// Where a source set compiles to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSetOutput {
    pub classes_dirs: Vec<Location>,
    pub resources_dir: Location,
}

/// A named compilation unit.
///
/// The output and both classpaths are shared with the tasks of the source
/// set, which read them only when they are realized.
#[derive(Debug, Clone)]
pub struct SourceSet {
    name: ArcStr,
    pub java: SourceDirectorySet,
    pub resources: SourceDirectorySet,
    pub output: Property<SourceSetOutput>,
    /// What code compiled from this source set sees on the compile classpath.
    pub compile_classpath: Property<FileCollection>,
    /// What code compiled from this source set runs with.
    pub runtime_classpath: Property<FileCollection>,
}

impl SourceSet {
    /// A source set laid out by convention: `src/<name>/java`,
    /// `src/<name>/resources`, compiled to `classes/java/<name>` and
    /// `resources/<name>` in the build directory.
    pub fn new(name: impl Into<ArcStr>) -> Self {
        let name = name.into();

        Self {
            java: SourceDirectorySet::new(vec![Location::project(format!("src/{name}/java"))]),
            resources: SourceDirectorySet::new(vec![Location::project(format!(
                "src/{name}/resources"
            ))]),
            output: Property::new(SourceSetOutput {
                classes_dirs: vec![Location::build(format!("classes/java/{name}"))],
                resources_dir: Location::build(format!("resources/{name}")),
            }),
            compile_classpath: Property::new(FileCollection::new()),
            runtime_classpath: Property::new(FileCollection::new()),
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_main(&self) -> bool {
        &*self.name == SourceSet::MAIN
    }

    pub fn compile_classpath_configuration_name(&self) -> String {
        self.configuration_name("compileClasspath")
    }

    pub fn runtime_classpath_configuration_name(&self) -> String {
        self.configuration_name("runtimeClasspath")
    }

    pub fn implementation_configuration_name(&self) -> String {
        self.configuration_name("implementation")
    }

    pub fn compile_only_configuration_name(&self) -> String {
        self.configuration_name("compileOnly")
    }

    pub fn runtime_only_configuration_name(&self) -> String {
        self.configuration_name("runtimeOnly")
    }

    pub fn compile_java_task_name(&self) -> String {
        self.task_name("compile", "java")
    }

    pub fn process_resources_task_name(&self) -> String {
        self.task_name("process", "resources")
    }

    pub fn classes_task_name(&self) -> String {
        self.task_name("", "classes")
    }

    fn configuration_name(&self, base: &str) -> String {
        if self.is_main() {
            base.to_string()
        } else {
            format!("{}{}", self.name, capitalize(base))
        }
    }

    fn task_name(&self, verb: &str, target: &str) -> String {
        let name = if self.is_main() { "" } else { &self.name };
        let words = [verb, name, target];
        let mut words = words.iter().filter(|word| !word.is_empty());

        let mut result = words.next().map(|word| word.to_string()).unwrap_or_default();
        for word in words {
            result.push_str(&capitalize(word));
        }
        result
    }
}

impl SourceSet {
    pub const MAIN: &'static str = "main";
    pub const TEST: &'static str = "test";
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Registry of all source sets of a project.
#[derive(Debug, Default)]
pub struct SourceSetContainer {
    source_sets: Vec<SourceSet>,
    index: HashMap<ArcStr, usize>,
}

impl SourceSetContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Adds a source set. Fails without side effects when the name is taken.
    pub fn insert(&mut self, source_set: SourceSet) -> Result<(), ConfigError> {
        if self.contains(source_set.name()) {
            return Err(ConfigError::DuplicateUnitName(source_set.name.clone()));
        }

        self.index
            .insert(source_set.name.clone(), self.source_sets.len());
        self.source_sets.push(source_set);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&SourceSet, ConfigError> {
        self.index
            .get(name)
            .map(|&index| &self.source_sets[index])
            .ok_or_else(|| ConfigError::UnitNotFound(name.into()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut SourceSet, ConfigError> {
        match self.index.get(name) {
            Some(&index) => Ok(&mut self.source_sets[index]),
            None => Err(ConfigError::UnitNotFound(name.into())),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceSet> {
        self.source_sets.iter()
    }
}
