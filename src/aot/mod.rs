//! Ahead-of-time processing.
//!
//! Applying [`AotPlugin`] derives two generated source sets, `aot` from
//! `main` and `aotTest` from `test`, as soon as the Java conventions are in
//! place. Once the application plugin is applied as well, the processing
//! tasks `processAot` and `processTestAot` are registered together with
//! their classpaths and scheduled before the compilation of the generated
//! sources.
//!
//! ```
//! use aotgraph::{AotPlugin, AotState, BootPlugin, JavaPlugin, Project};
//!
//! let mut project = Project::new("demo");
//! project.apply(AotPlugin)?;
//! assert_eq!(AotPlugin::state(&project), AotState::Unconfigured);
//!
//! project.apply(JavaPlugin)?;
//! assert_eq!(AotPlugin::state(&project), AotState::BasePluginSeen);
//!
//! project.apply(BootPlugin::new().main_class("com.example.App"))?;
//! assert_eq!(AotPlugin::state(&project), AotState::FullyWired);
//! # Ok::<(), aotgraph::ConfigError>(())
//! ```

mod classpath;
mod source_set;
mod tasks;
mod wiring;

pub use classpath::create_processing_classpath;
pub use source_set::configure_source_set;
pub use tasks::{AotTaskSpec, ProcessAot, ProcessTestAot};
pub use wiring::{AotOutputs, ProcessingKind, wire_processing_task};

use crate::boot::BootPlugin;
use crate::error::ConfigError;
use crate::java::JavaPlugin;
use crate::plugin::{Plugin, PluginId};
use crate::project::Project;
use crate::source_set::SourceSet;
use crate::task::TaskRef;

pub const AOT_SOURCE_SET_NAME: &str = "aot";
pub const AOT_TEST_SOURCE_SET_NAME: &str = "aotTest";
pub const PROCESS_AOT_TASK_NAME: &str = "processAot";
pub const PROCESS_TEST_AOT_TASK_NAME: &str = "processTestAot";

/// How far ahead-of-time processing has been configured on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AotState {
    Unconfigured,
    /// The generated source sets exist but nothing processes them yet. This
    /// is final for projects without the application plugin.
    BasePluginSeen,
    FullyWired,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AotPlugin;

impl AotPlugin {
    pub const ID: &'static str = "aot";

    /// Reads the state off the project itself.
    pub fn state(project: &Project) -> AotState {
        let tasks = &project.tasks;
        let source_sets = &project.source_sets;

        if tasks.contains(PROCESS_AOT_TASK_NAME) && tasks.contains(PROCESS_TEST_AOT_TASK_NAME) {
            AotState::FullyWired
        } else if source_sets.contains(AOT_SOURCE_SET_NAME)
            && source_sets.contains(AOT_TEST_SOURCE_SET_NAME)
        {
            AotState::BasePluginSeen
        } else {
            AotState::Unconfigured
        }
    }
}

impl Plugin for AotPlugin {
    fn id(&self) -> PluginId {
        PluginId::new(Self::ID)
    }

    fn apply(&self, project: &mut Project) -> Result<(), ConfigError> {
        project.with_plugin(PluginId::new(JavaPlugin::ID), |project| {
            configure_source_set(project, AOT_SOURCE_SET_NAME, SourceSet::MAIN)?;
            configure_source_set(project, AOT_TEST_SOURCE_SET_NAME, SourceSet::TEST)?;

            project.with_plugin(PluginId::new(BootPlugin::ID), |project| {
                register_processing(
                    project,
                    ProcessingKind::Main,
                    AOT_SOURCE_SET_NAME,
                    SourceSet::MAIN,
                )?;
                register_processing(
                    project,
                    ProcessingKind::Test {
                        main: SourceSet::MAIN.into(),
                    },
                    AOT_TEST_SOURCE_SET_NAME,
                    SourceSet::TEST,
                )?;
                Ok(())
            })
        })
    }
}

fn register_processing(
    project: &mut Project,
    kind: ProcessingKind,
    derived: &str,
    input: &str,
) -> Result<TaskRef, ConfigError> {
    let task_name = kind.task_name();
    let classpath = create_processing_classpath(project, task_name, input)?;
    let outputs = AotOutputs::for_source_set(project, task_name, derived)?;

    wire_processing_task(project, kind, derived, input, &classpath, outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ArcStr;

    #[test]
    fn test_plugin_order_does_not_matter() {
        let orders: [&[&str]; 3] = [
            &["aot", "java", "boot"],
            &["boot", "java", "aot"],
            &["java", "aot", "boot"],
        ];

        for order in orders {
            let mut project = Project::new("demo");
            for id in order {
                match *id {
                    "aot" => project.apply(AotPlugin).unwrap(),
                    "java" => project.apply(JavaPlugin).unwrap(),
                    _ => project.apply(BootPlugin::new()).unwrap(),
                }
            }

            assert_eq!(AotPlugin::state(&project), AotState::FullyWired, "{order:?}");
            assert_eq!(
                project.tasks.dependencies_of("compileAotTestJava").unwrap(),
                vec![ArcStr::from("processTestAot")]
            );
        }
    }

    #[test]
    fn test_without_boot_plugin() {
        let mut project = Project::new("demo");
        project.apply(JavaPlugin).unwrap();
        project.apply(AotPlugin).unwrap();

        assert_eq!(AotPlugin::state(&project), AotState::BasePluginSeen);
        assert!(!project.tasks.contains(PROCESS_AOT_TASK_NAME));
        assert!(!project.configurations.contains("processAotClasspath"));
        assert_eq!(project.plugins().pending(&PluginId::new(BootPlugin::ID)), 1);
    }

    #[test]
    fn test_applying_twice_is_a_no_op() {
        let mut project = Project::new("demo");
        project.apply(JavaPlugin).unwrap();
        project.apply(BootPlugin::new()).unwrap();
        project.apply(AotPlugin).unwrap();
        let tasks = project.tasks.names().count();

        project.apply(AotPlugin).unwrap();
        assert_eq!(project.tasks.names().count(), tasks);
    }
}
