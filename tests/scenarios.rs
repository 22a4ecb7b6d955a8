use aotgraph::aot::ProcessAot;
use aotgraph::{
    AotPlugin, AotState, ArcStr, BootPlugin, ConfigError, Dependency, FileCollection, FileElement,
    JavaPlugin, Location, Project, ProjectSettings,
};
use camino::Utf8PathBuf;

fn wired(main_class: &str) -> Project {
    let mut project = Project::new("demo");
    project.apply(JavaPlugin).unwrap();
    project.apply(AotPlugin).unwrap();
    project
        .apply(BootPlugin::new().main_class(main_class))
        .unwrap();
    project
}

#[test]
fn base_plugin_derives_units_and_companion_adds_tasks() {
    let mut project = Project::new("demo");
    project.apply(AotPlugin).unwrap();
    project.apply(JavaPlugin).unwrap();

    let aot = project.source_sets.get("aot").unwrap();
    assert_eq!(
        aot.java.src_dirs(),
        &[Location::project("build/generated/aotSources")]
    );
    let main = project.source_sets.get("main").unwrap();
    assert!(main.runtime_classpath.get().contains(&FileElement::Output("aot".into())));

    project.apply(BootPlugin::new()).unwrap();

    let classpath = project.configurations.get("processAotClasspath").unwrap();
    assert!(classpath
        .dependencies()
        .contains(&Dependency::Files(FileCollection::output("main"))));
    assert_eq!(
        project.tasks.dependencies_of("compileAotJava").unwrap(),
        vec![ArcStr::from("processAot")]
    );
    assert_eq!(AotPlugin::state(&project), AotState::FullyWired);
}

#[test]
fn companion_never_applied_is_a_valid_end_state() {
    let mut project = Project::new("demo");
    project.apply(JavaPlugin).unwrap();
    project.apply(AotPlugin).unwrap();

    assert_eq!(AotPlugin::state(&project), AotState::BasePluginSeen);
    assert!(matches!(
        project.tasks.named("processAot"),
        Err(ConfigError::TaskNotFound(_))
    ));

    for (name, sources, resources) in [
        ("aot", "build/generated/aotSources", "build/generated/aotResources"),
        (
            "aotTest",
            "build/generated/aotTestSources",
            "build/generated/aotTestResources",
        ),
    ] {
        let source_set = project.source_sets.get(name).unwrap();
        assert_eq!(source_set.java.src_dirs(), &[Location::project(sources)]);
        assert_eq!(source_set.resources.src_dirs(), &[Location::project(resources)]);
    }

    assert!(project.finalize().is_ok());
}

#[test]
fn deriving_twice_fails_without_new_tasks() {
    let mut project = Project::new("demo");
    project.apply(JavaPlugin).unwrap();
    project.apply(AotPlugin).unwrap();
    let tasks = project.tasks.names().count();

    let err = aotgraph::aot::configure_source_set(&mut project, "aot", "main").unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateUnitName(name) if &*name == "aot"));
    assert_eq!(project.tasks.names().count(), tasks);
}

#[test]
fn both_generated_tasks_depend_on_processing() {
    let project = wired("com.example.App");

    for (dependent, processing) in [
        ("compileAotJava", "processAot"),
        ("processAotResources", "processAot"),
        ("compileAotTestJava", "processTestAot"),
        ("processAotTestResources", "processTestAot"),
    ] {
        assert_eq!(
            project.tasks.dependencies_of(dependent).unwrap(),
            vec![ArcStr::from(processing)],
            "{dependent}"
        );
    }
}

#[test]
fn processing_classpath_is_a_snapshot() {
    let mut project = wired("com.example.App");
    let before = project.configurations.extends_of("processAotClasspath").unwrap();

    project.configurations.create("agent", |_| Ok(())).unwrap();
    project
        .configurations
        .extends_from("runtimeClasspath", "agent")
        .unwrap();

    assert_eq!(
        project.configurations.extends_of("processAotClasspath").unwrap(),
        before
    );
    assert_eq!(
        project.configurations.extends_of("processTestAotClasspath").unwrap(),
        project.configurations.extends_of("testRuntimeClasspath").unwrap()
    );
}

#[test]
fn finalize_orders_processing_first() {
    let project = wired("com.example.App");
    let plan = project.finalize().unwrap();

    let position = |name| plan.position(name).unwrap();
    assert!(position("processAot") < position("compileAotJava"));
    assert!(position("processAot") < position("processAotResources"));
    assert!(position("processTestAot") < position("compileAotTestJava"));
    assert!(position("compileAotJava") < position("aotClasses"));
}

#[test]
fn lazy_values_observe_late_configuration() {
    let settings = ProjectSettings::from_json(
        r#"{ "name": "demo", "project-dir": "/work/demo", "build-dir": "build" }"#,
    )
    .unwrap();
    let mut project = Project::from_settings(settings);
    project.apply(JavaPlugin).unwrap();
    project.apply(BootPlugin::new().main_class("com.example.App")).unwrap();
    project.apply(AotPlugin).unwrap();

    project.group().set("com.example".into());
    project.layout().build_dir().set("out".into());

    let handle = project
        .tasks
        .named_typed::<ProcessAot>("processAot")
        .unwrap();
    let (group, classes, application) = handle.realized(|task| {
        (
            task.spec.group_id.clone().unwrap(),
            task.spec.classes_output.clone().unwrap(),
            task.application_class.clone().unwrap(),
        )
    });

    assert_eq!(group.get(), "com.example");
    assert_eq!(application.get(), "com.example.App");
    assert_eq!(
        project.layout().resolve(&classes),
        Utf8PathBuf::from("/work/demo/out/generated/aotClasses")
    );
}

#[test]
fn runtime_classpath_resolves_generated_output() {
    let settings = ProjectSettings {
        project_dir: "/work/demo".into(),
        ..ProjectSettings::default()
    };
    let mut project = Project::from_settings(settings);
    project.apply(JavaPlugin).unwrap();
    project.apply(BootPlugin::new()).unwrap();
    project.apply(AotPlugin).unwrap();

    let main = project.source_sets.get("main").unwrap();
    let files = project.resolve_files(&main.runtime_classpath.get()).unwrap();

    for expected in [
        "/work/demo/build/classes/java/main",
        "/work/demo/build/classes/java/aot",
        "/work/demo/build/generated/aotClasses",
    ] {
        assert!(files.contains(&Utf8PathBuf::from(expected)), "{expected}");
    }
}
