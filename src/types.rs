//! Core types for spark-retained.
//!
//! These are the values that cross the seam between the runtime and the host
//! toolkit: handles, property maps, widget kinds and grid placement.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};

// =============================================================================
// Identity
// =============================================================================

/// Opaque reference to one native element owned by the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u64);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Component id, unique within its parent's current child set.
///
/// Never empty: construction rejects empty or whitespace-only ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(String);

impl ComponentId {
    /// Validate and wrap an id.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::identity("'id' is missing"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ComponentId {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

// =============================================================================
// Widget kinds and properties
// =============================================================================

/// Native element kinds the runtime asks the toolkit to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Window,
    Frame,
    Label,
    Button,
    Entry,
    Text,
    Combobox,
    MenuButton,
    Canvas,
    Scrollbar,
}

impl WidgetKind {
    /// Whether elements of this kind carry a `text` property worth painting.
    pub fn shows_text(self) -> bool {
        matches!(
            self,
            Self::Label | Self::Button | Self::Entry | Self::Text | Self::Combobox | Self::MenuButton
        )
    }
}

/// A single toolkit property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Handle(Handle),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Handle(h) => write!(f, "{h}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Handle> for PropertyValue {
    fn from(value: Handle) -> Self {
        Self::Handle(value)
    }
}

/// Ordered property map handed to `create`/`configure`.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Build a property map from `(key, value)` pairs.
pub fn props<K, V, I>(pairs: I) -> PropertyMap
where
    K: Into<String>,
    V: Into<PropertyValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Callback invoked when the user activates a widget.
pub type Command = Rc<dyn Fn()>;

// =============================================================================
// Placement
// =============================================================================

/// The axis a container arranges its children along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Children laid out left to right (one grid row, many columns).
    Horizontal,
    /// Children laid out top to bottom (one grid column, many rows).
    Vertical,
}

bitflags::bitflags! {
    /// Edges of its grid cell a child is attached to.
    ///
    /// Attaching to two opposite edges stretches the child along that axis;
    /// attaching to neither centres it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Sticky: u8 {
        const N = 1 << 0;
        const S = 1 << 1;
        const E = 1 << 2;
        const W = 1 << 3;
        const NS = Self::N.bits() | Self::S.bits();
        const EW = Self::E.bits() | Self::W.bits();
        const NSEW = Self::NS.bits() | Self::EW.bits();
    }
}

impl fmt::Display for Sticky {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, letter) in [(Self::N, 'n'), (Self::S, 's'), (Self::E, 'e'), (Self::W, 'w')] {
            if self.contains(flag) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

/// Grid placement of one child inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub column: usize,
    pub sticky: Sticky,
    pub padx: u32,
    pub pady: u32,
}

impl Placement {
    /// Fill cell (0, 0) entirely with no padding.
    pub const FILL: Self = Self {
        row: 0,
        column: 0,
        sticky: Sticky::NSEW,
        padx: 0,
        pady: 0,
    };

    /// Cell for a slot position along an axis.
    pub fn at(axis: Axis, position: usize) -> Self {
        let (row, column) = match axis {
            Axis::Horizontal => (0, position),
            Axis::Vertical => (position, 0),
        };
        Self {
            row,
            column,
            sticky: Sticky::W,
            padx: 0,
            pady: 0,
        }
    }
}

/// Sizing constraints for one grid track (row or column) of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackConfig {
    /// Share of surplus space; 0 means the track never grows.
    pub weight: u32,
    /// Minimum track size in cells.
    pub min_size: u32,
}

/// Compass point of the child that lands on the relative position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
    #[default]
    Center,
}

impl Anchor {
    /// Fraction of the child's own (width, height) to shift back by.
    pub fn offset_fraction(self) -> (f32, f32) {
        match self {
            Self::NW => (0.0, 0.0),
            Self::N => (0.5, 0.0),
            Self::NE => (1.0, 0.0),
            Self::W => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::E => (1.0, 0.5),
            Self::SW => (0.0, 1.0),
            Self::S => (0.5, 1.0),
            Self::SE => (1.0, 1.0),
        }
    }
}

/// Relative placement: a point at a fraction of the parent plus an offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchored {
    pub relx: f32,
    pub rely: f32,
    pub x: i32,
    pub y: i32,
    pub anchor: Anchor,
}

impl Anchored {
    /// Centre of the parent.
    pub const CENTER: Self = Self {
        relx: 0.5,
        rely: 0.5,
        x: 0,
        y: 0,
        anchor: Anchor::Center,
    };

    /// Top-right corner, inset by a small margin.
    pub const TOP_RIGHT: Self = Self {
        relx: 1.0,
        rely: 0.0,
        x: -8,
        y: 8,
        anchor: Anchor::NE,
    };
}
