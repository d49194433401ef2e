//! Attribute lookup through an object's ancestors
//!
//! Calculation objects sit in a small hierarchy (project > model > run, with
//! variables and derived objects hanging off them). A setting left empty on
//! one object is inherited from the first ancestor that defines it.
//!
//! Objects expose their own attributes and their relations through the
//! [`Inherit`] trait; [`get_parent_attr`] walks the relations in a fixed
//! order, at most [`MAX_INHERITANCE_DEPTH`] steps.

use crate::errors::{AtmosVertError, Result};
use ndarray::ArrayD;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Longest ancestor chain followed before giving up
pub const MAX_INHERITANCE_DEPTH: usize = 16;

/// Attribute value held by an object in the hierarchy
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(ArrayD<f64>),
}

impl AttrValue {
    /// Whether the value counts as set: non-zero numbers, non-empty strings,
    /// arrays with any non-zero element.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(x) => *x != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Array(a) => a.iter().any(|&x| x != 0.0),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<ArrayD<f64>> for AttrValue {
    fn from(value: ArrayD<f64>) -> Self {
        Self::Array(value)
    }
}

/// Relation from an object to one of its ancestors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Parent,
    Var,
    Run,
    Model,
    Proj,
}

impl Relation {
    /// Order in which relations are tried; only the first one present is followed.
    pub const SEARCH_ORDER: [Self; 5] = [Self::Parent, Self::Var, Self::Run, Self::Model, Self::Proj];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Var => "var",
            Self::Run => "run",
            Self::Model => "model",
            Self::Proj => "proj",
        }
    }
}

/// An object that can hand unset attributes off to its ancestors
pub trait Inherit {
    /// Short description used in error messages
    fn label(&self) -> &str;

    /// The object's own value for `name`, if it has one
    fn attr(&self, name: &str) -> Option<&AttrValue>;

    /// The object reached through `relation`, if any
    fn related(&self, relation: Relation) -> Option<&dyn Inherit>;

    /// Resolve `name` on this object or its ancestors.
    ///
    /// # Errors
    ///
    /// See [`get_parent_attr`].
    fn resolve(&self, name: &str, strict: bool) -> Result<Option<&AttrValue>>
    where
        Self: Sized,
    {
        get_parent_attr(self, name, strict)
    }
}

/// Value of `attr` on `obj` if set, otherwise on its nearest ancestor.
///
/// Each step checks the current object; if its value is missing or not
/// truthy, the first relation present in [`Relation::SEARCH_ORDER`] is
/// followed. When the chain ends without a value the result is `Ok(None)`,
/// or [`AtmosVertError::AttributeNotFound`] if `strict` is set.
///
/// # Errors
///
/// Besides the strict-mode error above, returns
/// [`AtmosVertError::InheritanceDepthExceeded`] if the chain is longer than
/// [`MAX_INHERITANCE_DEPTH`], which normally means it loops.
pub fn get_parent_attr<'a>(
    obj: &'a dyn Inherit,
    attr: &str,
    strict: bool,
) -> Result<Option<&'a AttrValue>> {
    let mut current = obj;
    for _ in 0..=MAX_INHERITANCE_DEPTH {
        if let Some(value) = current.attr(attr).filter(|v| v.is_truthy()) {
            return Ok(Some(value));
        }

        let next = Relation::SEARCH_ORDER
            .iter()
            .find_map(move |&relation| current.related(relation).map(|obj| (relation, obj)));
        match next {
            Some((relation, ancestor)) => {
                debug!(attr, from = current.label(), via = relation.as_str(), "inheriting attribute");
                current = ancestor;
            }
            None if strict => {
                return Err(AtmosVertError::AttributeNotFound {
                    attr: attr.to_string(),
                    object: current.label().to_string(),
                })
            }
            None => return Ok(None),
        }
    }

    Err(AtmosVertError::InheritanceDepthExceeded {
        attr: attr.to_string(),
        depth: MAX_INHERITANCE_DEPTH,
    })
}

/// General-purpose object in an inheritance hierarchy
#[derive(Debug, Clone, Default)]
pub struct Node {
    name: String,
    attrs: HashMap<String, AttrValue>,
    relations: Vec<(Relation, Arc<Node>)>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Link `node` through `relation`, replacing any earlier link of that kind.
    #[must_use]
    pub fn with_relation(mut self, relation: Relation, node: Arc<Node>) -> Self {
        self.relations.retain(|(r, _)| *r != relation);
        self.relations.push((relation, node));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Inherit for Node {
    fn label(&self) -> &str {
        &self.name
    }

    fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    fn related(&self, relation: Relation) -> Option<&dyn Inherit> {
        self.relations
            .iter()
            .find(|(r, _)| *r == relation)
            .map(|(_, node)| node.as_ref() as &dyn Inherit)
    }
}
