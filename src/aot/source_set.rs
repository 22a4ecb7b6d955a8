use crate::attributes::configure_classes_and_resources_for_runtime;
use crate::error::ConfigError;
use crate::files::{FileElement, Location};
use crate::project::Project;

/// Derives the source set `name` from `existing`.
///
/// The new source set holds generated content only: its sources live in
/// `build/generated/<name>Sources` and its resources in
/// `build/generated/<name>Resources`. The runtime classpath of `existing`
/// is extended with the new source set's output, so code that runs on it
/// also sees the generated classes. The compile classpath of the derived
/// source set requests classes and resources for the java runtime.
///
/// Deriving the same name twice fails with [`ConfigError::DuplicateUnitName`].
pub fn configure_source_set(
    project: &mut Project,
    name: &str,
    existing: &str,
) -> Result<(), ConfigError> {
    project.source_sets.get(existing)?;
    project.create_source_set(name)?;

    let derived = project.source_sets.get_mut(name)?;
    derived
        .java
        .set_src_dirs([Location::project(format!("build/generated/{name}Sources"))]);
    derived
        .resources
        .set_src_dirs([Location::project(format!("build/generated/{name}Resources"))]);
    let compile_classpath = derived.compile_classpath_configuration_name();

    project
        .source_sets
        .get(existing)?
        .runtime_classpath
        .update(|classpath| classpath.add(FileElement::Output(name.into())));

    let configuration = project.configurations.get_mut(&compile_classpath)?;
    configure_classes_and_resources_for_runtime(&mut configuration.attributes);

    tracing::info!(source_set = name, from = existing, "derived source set");
    Ok(())
}
