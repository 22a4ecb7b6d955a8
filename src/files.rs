use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::core::{ArcStr, Property, Provider};

/// A directory inside the project, resolved only when somebody asks for it.
///
/// Locations are relative either to the project directory or to the build
/// directory. The build directory is a [`Property`] and may still change
/// during configuration, so a location is never turned into a concrete path
/// while the graph is being wired.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "base", content = "path", rename_all = "kebab-case")]
pub enum Location {
    /// Relative to the project directory.
    Project(Utf8PathBuf),
    /// Relative to the build directory.
    Build(Utf8PathBuf),
}

impl Location {
    pub fn project(path: impl Into<Utf8PathBuf>) -> Self {
        Self::Project(path.into())
    }

    pub fn build(path: impl Into<Utf8PathBuf>) -> Self {
        Self::Build(path.into())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Project(path) => write!(f, "{path}"),
            Location::Build(path) => write!(f, "$buildDir/{path}"),
        }
    }
}

/// Directory layout of a project.
#[derive(Debug, Clone)]
pub struct Layout {
    project_dir: Utf8PathBuf,
    build_dir: Property<Utf8PathBuf>,
}

impl Layout {
    pub fn new(project_dir: impl Into<Utf8PathBuf>, build_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            build_dir: Property::new(build_dir.into()),
        }
    }

    pub fn project_dir(&self) -> &Utf8Path {
        &self.project_dir
    }

    /// The build directory, relative to the project directory unless absolute.
    pub fn build_dir(&self) -> &Property<Utf8PathBuf> {
        &self.build_dir
    }

    /// A location below the build directory.
    pub fn build_directory_dir(&self, path: impl Into<Utf8PathBuf>) -> Location {
        Location::Build(path.into())
    }

    pub fn resolve(&self, location: &Location) -> Utf8PathBuf {
        match location {
            Location::Project(path) => self.project_dir.join(path),
            Location::Build(path) => self.project_dir.join(self.build_dir.get()).join(path),
        }
    }

    /// A lazy path for `location`.
    pub fn provider(&self, location: &Location) -> Provider<Utf8PathBuf> {
        let layout = self.clone();
        let location = location.clone();
        Provider::new(move || layout.resolve(&location))
    }
}

/// Single element of a [`FileCollection`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileElement {
    /// Everything a source set compiles to: its classes directories and its
    /// processed resources directory.
    Output(ArcStr),
    /// A single directory.
    Dir(Location),
    /// The files declared by a configuration and everything it extends.
    Configuration(ArcStr),
}

/// An ordered collection of files with set semantics.
///
/// Adding an element that is already part of the collection leaves it
/// unchanged, so `a + b + b` holds the same content as `a + b`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCollection {
    elements: Vec<FileElement>,
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(element: FileElement) -> Self {
        Self {
            elements: vec![element],
        }
    }

    pub fn output(source_set: impl Into<ArcStr>) -> Self {
        Self::of(FileElement::Output(source_set.into()))
    }

    pub fn dir(location: Location) -> Self {
        Self::of(FileElement::Dir(location))
    }

    pub fn configuration(name: impl Into<ArcStr>) -> Self {
        Self::of(FileElement::Configuration(name.into()))
    }

    pub fn add(&mut self, element: FileElement) {
        if !self.elements.contains(&element) {
            self.elements.push(element);
        }
    }

    /// Union of `self` and `other`.
    pub fn plus(mut self, other: FileCollection) -> Self {
        for element in other.elements {
            self.add(element);
        }
        self
    }

    pub fn contains(&self, element: &FileElement) -> bool {
        self.elements.contains(element)
    }

    pub fn elements(&self) -> &[FileElement] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl FromIterator<FileElement> for FileCollection {
    fn from_iter<I: IntoIterator<Item = FileElement>>(iter: I) -> Self {
        let mut collection = FileCollection::new();
        for element in iter {
            collection.add(element);
        }
        collection
    }
}
