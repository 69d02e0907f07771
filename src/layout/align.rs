//! Child layout options and their resolution to a grid slot.
//!
//! Resolution order for the sticky edges of a slot:
//!
//! 1. An explicit `sticky` wins
//! 2. Otherwise `valign`/`halign` derive edges (stretch → both edges,
//!    one-sided → that edge, center → neither)
//! 3. Otherwise the container default (W for stacks, NSEW for frames)
//!
//! Padding falls back to the container's gaps; the growth weight is the
//! explicit `weight`, else 1 when `expand`, else 0.

use crate::types::{Axis, Placement, Sticky, TrackConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HAlign {
    Left,
    Center,
    Right,
    Stretch,
}

impl HAlign {
    fn edges(self) -> Sticky {
        match self {
            Self::Left => Sticky::W,
            Self::Center => Sticky::empty(),
            Self::Right => Sticky::E,
            Self::Stretch => Sticky::EW,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
    Stretch,
}

impl VAlign {
    fn edges(self) -> Sticky {
        match self {
            Self::Top => Sticky::N,
            Self::Center => Sticky::empty(),
            Self::Bottom => Sticky::S,
            Self::Stretch => Sticky::NS,
        }
    }
}

/// Per-child layout options. Unset fields take the container's defaults.
///
/// ```ignore
/// let spec = (label, Layout::new().expand().halign(HAlign::Stretch));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Layout {
    pub expand: Option<bool>,
    pub weight: Option<u32>,
    /// Minimum size of the child's track along the container's axis.
    pub size: Option<u32>,
    pub halign: Option<HAlign>,
    pub valign: Option<VAlign>,
    pub padx: Option<u32>,
    pub pady: Option<u32>,
    pub sticky: Option<Sticky>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expand(mut self) -> Self {
        self.expand = Some(true);
        self
    }

    pub fn no_expand(mut self) -> Self {
        self.expand = Some(false);
        self
    }

    pub fn weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn halign(mut self, halign: HAlign) -> Self {
        self.halign = Some(halign);
        self
    }

    pub fn valign(mut self, valign: VAlign) -> Self {
        self.valign = Some(valign);
        self
    }

    pub fn padx(mut self, padx: u32) -> Self {
        self.padx = Some(padx);
        self
    }

    pub fn pady(mut self, pady: u32) -> Self {
        self.pady = Some(pady);
        self
    }

    pub fn sticky(mut self, sticky: Sticky) -> Self {
        self.sticky = Some(sticky);
        self
    }

    /// Sticky edges from `sticky` or the alignments, if either is set.
    pub fn resolved_sticky(&self) -> Option<Sticky> {
        if let Some(sticky) = self.sticky {
            return Some(sticky);
        }
        if self.halign.is_none() && self.valign.is_none() {
            return None;
        }
        let vertical = self.valign.map_or(Sticky::empty(), VAlign::edges);
        let horizontal = self.halign.map_or(Sticky::empty(), HAlign::edges);
        Some(vertical | horizontal)
    }

    /// Fill every unset option from `defaults`.
    pub fn resolve(&self, defaults: &SlotDefaults) -> Slot {
        let expand = self.expand.unwrap_or(defaults.expand);
        Slot {
            sticky: self.resolved_sticky().unwrap_or(defaults.sticky),
            padx: self.padx.unwrap_or(defaults.padx),
            pady: self.pady.unwrap_or(defaults.pady),
            weight: self.weight.unwrap_or(u32::from(expand)),
            min_size: self.size.unwrap_or(0),
        }
    }
}

/// Container-level fallbacks for [`Layout::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDefaults {
    pub sticky: Sticky,
    pub padx: u32,
    pub pady: u32,
    pub expand: bool,
}

impl SlotDefaults {
    /// Stack children: west-anchored, spaced by the container gaps.
    pub fn stack(gap_x: u32, gap_y: u32) -> Self {
        Self {
            sticky: Sticky::W,
            padx: gap_x,
            pady: gap_y,
            expand: false,
        }
    }

    /// A frame's single child: fills and grows.
    pub fn frame() -> Self {
        Self {
            sticky: Sticky::NSEW,
            padx: 0,
            pady: 0,
            expand: true,
        }
    }
}

/// Fully resolved layout of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub sticky: Sticky,
    pub padx: u32,
    pub pady: u32,
    pub weight: u32,
    pub min_size: u32,
}

impl Slot {
    /// Grid placement at `position` along `axis`.
    pub fn placement(&self, axis: Axis, position: usize) -> Placement {
        Placement {
            sticky: self.sticky,
            padx: self.padx,
            pady: self.pady,
            ..Placement::at(axis, position)
        }
    }

    pub fn track(&self) -> TrackConfig {
        TrackConfig {
            weight: self.weight,
            min_size: self.min_size,
        }
    }
}
