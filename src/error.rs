use thiserror::Error;

use crate::core::ArcStr;

/// Errors raised while configuring the build description.
///
/// All of them are configuration-time and fatal: the host aborts the whole
/// configuration phase and nothing is retried or rolled back.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration with name '{0}' not found.")]
    ConfigurationNotFound(ArcStr),

    #[error("Cannot add a configuration with name '{0}' as a configuration with that name already exists.")]
    DuplicateConfigurationName(ArcStr),

    #[error("Source set with name '{0}' not found.")]
    UnitNotFound(ArcStr),

    #[error("Cannot add a source set with name '{0}' as a source set with that name already exists.")]
    DuplicateUnitName(ArcStr),

    #[error("Task with name '{0}' not found.")]
    TaskNotFound(ArcStr),

    #[error("Cannot add task '{0}' as a task with that name already exists.")]
    DuplicateTaskName(ArcStr),

    #[error("Task '{name}' has type {found}, expected {expected}.")]
    TaskTypeMismatch {
        name: ArcStr,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Cyclic extendsFrom from '{configuration}' to '{parent}'.")]
    CyclicExtension { configuration: ArcStr, parent: ArcStr },

    #[error("Circular dependency between tasks involving '{0}'.")]
    TaskCycle(ArcStr),

    #[error("Task '{task}': no value has been specified for property '{property}'.")]
    MissingTaskInput {
        task: ArcStr,
        property: &'static str,
    },

    #[error(
        "Configuration '{configuration}' requests {attribute}='{requested}' but the candidate provides '{provided}'."
    )]
    AttributeConflict {
        configuration: ArcStr,
        attribute: ArcStr,
        requested: ArcStr,
        provided: ArcStr,
    },

    #[error("Couldn't read project settings.\n{0}")]
    Settings(#[from] serde_json::Error),
}
