//! Lazily configured tasks and the task dependency graph.
//!
//! Tasks are registered with a configurator that is *not* run right away.
//! The configurator, together with anything queued later through
//! [`TaskHandle::configure`], runs when the task is realized: when a lazy
//! value derived from it is evaluated, when somebody inspects it, or when the
//! container is finalized.
//!
//! ## Phantom handles
//!
//! Task bodies are stored type-erased as `Box<dyn Task>`. A [`TaskHandle<T>`]
//! carries the concrete type in `PhantomData`, and the type is checked once
//! when the handle is created, so every later downcast through the handle is
//! known to succeed.

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::{ArcStr, Provider};
use crate::error::ConfigError;

/// Type-erasure helper implemented for every `'static` type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Description of a unit of work in the task graph.
///
/// Nothing is ever executed by this crate, a task only records its inputs
/// and outputs.
pub trait Task: AsAny + Send + 'static {
    /// Name of the first required property that has no value, if any.
    fn missing_input(&self) -> Option<&'static str> {
        None
    }
}

type Configurator = Box<dyn FnOnce(&mut dyn Task) + Send>;

struct Slot {
    type_name: &'static str,
    body: Box<dyn Task>,
    pending: Vec<Configurator>,
    realized: bool,
}

impl Slot {
    fn realize(&mut self) {
        if self.realized {
            return;
        }

        self.realized = true;
        for configure in std::mem::take(&mut self.pending) {
            configure(&mut *self.body);
        }
    }

    fn configure(&mut self, configurator: Configurator) {
        if self.realized {
            configurator(&mut *self.body);
        } else {
            self.pending.push(configurator);
        }
    }

    fn is<T: Task>(&self) -> bool {
        AsAny::as_any(&*self.body).is::<T>()
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn typed<T: Task>(configure: impl FnOnce(&mut T) + Send + 'static) -> Configurator {
    Box::new(move |body: &mut dyn Task| {
        if let Some(task) = AsAny::as_any_mut(body).downcast_mut::<T>() {
            configure(task);
        }
    })
}

/// Untyped reference to a registered task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskRef {
    index: NodeIndex,
    name: ArcStr,
}

impl TaskRef {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Typed, lazy reference to a registered task.
pub struct TaskHandle<T> {
    task: TaskRef,
    slot: Arc<Mutex<Slot>>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for TaskHandle<T> {
    fn clone(&self) -> Self {
        Self {
            task: self.task.clone(),
            slot: self.slot.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TaskHandle<{}>({})", type_name::<T>(), self.task.name)
    }
}

impl<T: Task> TaskHandle<T> {
    pub fn name(&self) -> &str {
        &self.task.name
    }

    pub fn task_ref(&self) -> TaskRef {
        self.task.clone()
    }

    /// Queues more configuration, or applies it at once if the task has
    /// already been realized.
    pub fn configure(&self, configure: impl FnOnce(&mut T) + Send + 'static) {
        lock(&self.slot).configure(typed(configure));
    }

    /// Realizes the task and gives read access to it.
    pub fn realized<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let mut slot = lock(&self.slot);
        slot.realize();
        f(downcast(&slot))
    }

    pub fn is_realized(&self) -> bool {
        lock(&self.slot).realized
    }

    /// A lazy value computed from this task. The task is realized only when
    /// the returned provider is evaluated.
    pub fn flat_map<U, F>(&self, f: F) -> Provider<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> Provider<U> + Send + Sync + 'static,
    {
        let slot = self.slot.clone();
        Provider::new(move || {
            let mut slot = lock(&slot);
            slot.realize();
            f(downcast(&slot)).get().clone()
        })
    }
}

fn downcast<T: Task>(slot: &Slot) -> &T {
    AsAny::as_any(&*slot.body)
        .downcast_ref::<T>()
        .expect("task type is checked when the handle is created")
}

/// The order in which a finalized task graph may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    order: Vec<ArcStr>,
}

impl ExecutionPlan {
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|name| &**name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|task| &**task == name)
    }
}

/// Registry of the tasks of a project plus their dependency edges.
///
/// An edge `a -> b` means that `b` depends on `a`.
#[derive(Default)]
pub struct TaskContainer {
    graph: DiGraph<ArcStr, ()>,
    slots: Vec<Arc<Mutex<Slot>>>,
    index: HashMap<ArcStr, NodeIndex>,
}

impl TaskContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registers a task. `configure` runs when the task is realized.
    pub fn register<T, F>(&mut self, name: &str, task: T, configure: F) -> Result<TaskHandle<T>, ConfigError>
    where
        T: Task,
        F: FnOnce(&mut T) + Send + 'static,
    {
        if self.contains(name) {
            return Err(ConfigError::DuplicateTaskName(name.into()));
        }

        let name: ArcStr = name.into();
        let index = self.graph.add_node(name.clone());
        let slot = Arc::new(Mutex::new(Slot {
            type_name: type_name::<T>(),
            body: Box::new(task),
            pending: vec![typed(configure)],
            realized: false,
        }));

        debug_assert_eq!(index.index(), self.slots.len());
        self.slots.push(slot.clone());
        self.index.insert(name.clone(), index);

        tracing::debug!(task = %name, kind = type_name::<T>(), "registered task");

        Ok(TaskHandle {
            task: TaskRef { index, name },
            slot,
            _phantom: PhantomData,
        })
    }

    pub fn named(&self, name: &str) -> Result<TaskRef, ConfigError> {
        self.index
            .get(name)
            .map(|&index| TaskRef {
                index,
                name: self.graph[index].clone(),
            })
            .ok_or_else(|| ConfigError::TaskNotFound(name.into()))
    }

    pub fn named_typed<T: Task>(&self, name: &str) -> Result<TaskHandle<T>, ConfigError> {
        let task = self.named(name)?;
        let slot = self.slots[task.index.index()].clone();

        {
            let guard = lock(&slot);
            if !guard.is::<T>() {
                return Err(ConfigError::TaskTypeMismatch {
                    name: task.name.clone(),
                    expected: type_name::<T>(),
                    found: guard.type_name,
                });
            }
        }

        Ok(TaskHandle {
            task,
            slot,
            _phantom: PhantomData,
        })
    }

    /// Declares that `dependent` must run after `dependency`.
    pub fn depends_on(&mut self, dependent: &TaskRef, dependency: &TaskRef) {
        self.graph.update_edge(dependency.index, dependent.index, ());
        tracing::debug!(
            task = %dependent.name,
            depends_on = %dependency.name,
            "added task dependency"
        );
    }

    /// Names of the tasks `name` directly depends on.
    pub fn dependencies_of(&self, name: &str) -> Result<Vec<ArcStr>, ConfigError> {
        let task = self.named(name)?;
        let mut names: Vec<ArcStr> = self
            .graph
            .neighbors_directed(task.index, Direction::Incoming)
            .map(|index| self.graph[index].clone())
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn is_realized(&self, name: &str) -> Result<bool, ConfigError> {
        let task = self.named(name)?;
        Ok(lock(&self.slots[task.index.index()]).realized)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|name| &**name)
    }

    /// Realizes every task, checks required inputs and orders the graph.
    pub fn finalize(&self) -> Result<ExecutionPlan, ConfigError> {
        for (index, slot) in self.slots.iter().enumerate() {
            let mut slot = lock(slot);
            slot.realize();

            if let Some(property) = slot.body.missing_input() {
                return Err(ConfigError::MissingTaskInput {
                    task: self.graph[NodeIndex::new(index)].clone(),
                    property,
                });
            }
        }

        let order = petgraph::algo::toposort(&self.graph, None)
            .map_err(|cycle| ConfigError::TaskCycle(self.graph[cycle.node_id()].clone()))?;

        Ok(ExecutionPlan {
            order: order
                .into_iter()
                .map(|index| self.graph[index].clone())
                .collect(),
        })
    }
}

impl std::fmt::Display for TaskContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "graph LR")?;

        for index in self.graph.node_indices() {
            let name = self.graph[index].replace('"', "\\\"");
            let kind = lock(&self.slots[index.index()]).type_name;
            let kind = kind.rsplit("::").next().unwrap_or(kind);
            writeln!(f, "    {}[\"{}: {}\"]", index.index(), name, kind)?;
        }

        for edge in self.graph.raw_edges() {
            writeln!(
                f,
                "    {} --> {}",
                edge.source().index(),
                edge.target().index()
            )?;
        }

        Ok(())
    }
}
