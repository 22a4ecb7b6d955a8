use crate::attributes::copy_attributes;
use crate::core::ArcStr;
use crate::error::ConfigError;
use crate::project::Project;

/// Creates the resolvable `<task_name>Classpath` configuration.
///
/// The new configuration extends everything the runtime classpath of
/// `source_set` extends, without extending that runtime classpath itself,
/// and carries a copy of its attributes. Both the edges and the attributes
/// are a snapshot taken now.
pub fn create_processing_classpath(
    project: &mut Project,
    task_name: &str,
    source_set: &str,
) -> Result<ArcStr, ConfigError> {
    let base = project
        .source_sets
        .get(source_set)?
        .runtime_classpath_configuration_name();
    let base = project.configurations.get(&base)?;
    let attributes = base.attributes.clone();
    let extends = project.configurations.extends_of(base.name())?;

    let name = project
        .configurations
        .create(&format!("{task_name}Classpath"), |classpath| {
            classpath
                .can_be_consumed(false)
                .can_be_resolved(true)
                .description(format!("Classpath of the {task_name} task."));
            for parent in &extends {
                classpath.extends_from(parent)?;
            }
            classpath.attributes(|target| copy_attributes(&attributes, target));
            Ok(())
        })?;

    tracing::debug!(
        configuration = %name,
        parents = extends.len(),
        attributes = attributes.len(),
        "created processing classpath"
    );
    Ok(name)
}
