//! Attribute sets used for variant selection.
//!
//! An attribute is an opaque key chosen by the host, paired with a named
//! value. Consumers put attributes on a resolvable configuration to tell the
//! host which variant of a dependency they want (for example "classes and
//! resources, for the java runtime"). This crate never matches variants; it
//! only makes sure the sets it creates request the same things as the sets
//! they stand in for.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::core::ArcStr;
use crate::error::ConfigError;

/// Key of an attribute, e.g. `org.gradle.usage`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attribute(ArcStr);

impl Attribute {
    /// Selects how a dependency is going to be used.
    pub const USAGE: &'static str = "org.gradle.usage";
    /// Selects which elements of a library are wanted.
    pub const LIBRARY_ELEMENTS: &'static str = "org.gradle.libraryelements";

    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self(name.into())
    }

    pub fn usage() -> Self {
        Self::new(Self::USAGE)
    }

    pub fn library_elements() -> Self {
        Self::new(Self::LIBRARY_ELEMENTS)
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named attribute value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Named(ArcStr);

impl Named {
    pub const JAVA_API: &'static str = "java-api";
    pub const JAVA_RUNTIME: &'static str = "java-runtime";
    pub const CLASSES: &'static str = "classes";
    pub const JAR: &'static str = "jar";
    pub const CLASSES_AND_RESOURCES: &'static str = "classes+resources";

    pub fn new(name: impl Into<ArcStr>) -> Self {
        Self(name.into())
    }
}

impl Display for Named {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from attribute key to named value. Ordering carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet {
    attributes: BTreeMap<Attribute, Named>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous value for that key.
    pub fn attribute(&mut self, key: Attribute, value: Named) -> &mut Self {
        self.attributes.insert(key, value);
        self
    }

    pub fn get(&self, key: &Attribute) -> Option<&Named> {
        self.attributes.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &Named)> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Checks that every attribute requested by `self` is either absent from
    /// `candidate` or carries the same value there.
    pub fn check_compatible(
        &self,
        configuration: &str,
        candidate: &AttributeSet,
    ) -> Result<(), ConfigError> {
        for (key, requested) in &self.attributes {
            if let Some(provided) = candidate.get(key)
                && provided != requested
            {
                return Err(ConfigError::AttributeConflict {
                    configuration: configuration.into(),
                    attribute: key.0.clone(),
                    requested: requested.0.clone(),
                    provided: provided.0.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Copies every attribute of `source` onto `target`.
///
/// Keys that exist only on `target` are kept. This is a one-time copy, later
/// changes to `source` are not reflected on `target`.
pub fn copy_attributes(source: &AttributeSet, target: &mut AttributeSet) {
    for (key, value) in source.iter() {
        target.attribute(key.clone(), value.clone());
    }
}

/// Requests the "classes and resources" library elements for the java runtime.
pub(crate) fn configure_classes_and_resources_for_runtime(attributes: &mut AttributeSet) {
    attributes
        .attribute(
            Attribute::library_elements(),
            Named::new(Named::CLASSES_AND_RESOURCES),
        )
        .attribute(Attribute::usage(), Named::new(Named::JAVA_RUNTIME));
}
