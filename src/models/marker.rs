// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Marker data structures.
//!
//! This module defines the tee and basket markers placed on the course
//! image, the percentage-based position they share, and the fixed display
//! conventions for basket colors.

use uuid::Uuid;

/// Identity of a placed marker.
pub type MarkerId = Uuid;

/// Default tee pad size in pixels.
pub const DEFAULT_TEE_WIDTH: u32 = 60;
pub const DEFAULT_TEE_HEIGHT: u32 = 40;

/// A position expressed as percentage offsets (0.0 to 100.0) from the
/// top-left corner of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a position with both axes clamped into [0, 100].
    pub fn clamped(x: f32, y: f32) -> Self {
        Self::new(x.clamp(0.0, 100.0), y.clamp(0.0, 100.0))
    }
}

/// Basket pin position. Red is the short (A) pin, white the medium (B)
/// pin and blue the long (C) pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasketColor {
    Red,
    White,
    Blue,
}

/// Display attributes for a basket color.
#[derive(Debug)]
pub struct BasketStyle {
    pub name: &'static str,
    pub legend: &'static str,
    pub default_label: char,
    pub fill: [u8; 4],
    pub border: [u8; 4],
    pub text: [u8; 4],
}

const BASKET_STYLES: [BasketStyle; 3] = [
    BasketStyle {
        name: "Red",
        legend: "Red (Short/A)",
        default_label: 'R',
        fill: [0xdc, 0x26, 0x26, 0xff],
        border: [0xb9, 0x1c, 0x1c, 0xff],
        text: [0xff, 0xff, 0xff, 0xff],
    },
    BasketStyle {
        name: "White",
        legend: "White (Medium/B)",
        default_label: 'W',
        fill: [0xff, 0xff, 0xff, 0xff],
        border: [0xd1, 0xd5, 0xdb, 0xff],
        text: [0x11, 0x18, 0x27, 0xff],
    },
    BasketStyle {
        name: "Blue",
        legend: "Blue (Long/C)",
        default_label: 'B',
        fill: [0x25, 0x63, 0xeb, 0xff],
        border: [0x1d, 0x4e, 0xd8, 0xff],
        text: [0xff, 0xff, 0xff, 0xff],
    },
];

impl BasketColor {
    pub const ALL: [BasketColor; 3] = [BasketColor::Red, BasketColor::White, BasketColor::Blue];

    /// Look up the display attributes for this color.
    pub fn style(self) -> &'static BasketStyle {
        &BASKET_STYLES[self as usize]
    }
}

/// Par for a basket. Only 3, 4 and 5 are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Par {
    Three = 3,
    Four = 4,
    Five = 5,
}

impl Par {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<i64> for Par {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Par::Three),
            4 => Ok(Par::Four),
            5 => Ok(Par::Five),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for Par {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// The tee pad marker. At most one exists per hole.
#[derive(Debug, Clone, PartialEq)]
pub struct TeeMarker {
    pub id: MarkerId,
    pub position: Position,
    /// Rotation in degrees. Not wrapped.
    pub rotation: i32,
    pub width: u32,
    pub height: u32,
}

impl TeeMarker {
    /// Create a tee marker with a fresh identity and default rotation/size.
    pub fn new(position: Position) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            rotation: 0,
            width: DEFAULT_TEE_WIDTH,
            height: DEFAULT_TEE_HEIGHT,
        }
    }

    /// Merge a partial update into this marker.
    pub fn apply(&mut self, update: &TeeMarkerUpdate) {
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(rotation) = update.rotation {
            self.rotation = rotation;
        }
        if let Some(width) = update.width {
            self.width = width;
        }
        if let Some(height) = update.height {
            self.height = height;
        }
    }
}

/// Partial update for a tee marker. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TeeMarkerUpdate {
    pub position: Option<Position>,
    pub rotation: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A basket marker with its par and distance metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct BasketMarker {
    pub id: MarkerId,
    pub color: BasketColor,
    pub position: Position,
    pub par: Par,
    /// Distance from the tee in feet.
    pub distance: u32,
    pub label: char,
}

impl BasketMarker {
    /// Create a basket marker with a fresh identity and the given metadata.
    /// The label defaults to the color's conventional letter.
    pub fn new(color: BasketColor, position: Position, par: Par, distance: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            color,
            position,
            par,
            distance,
            label: color.style().default_label,
        }
    }

    /// Merge a partial update into this marker.
    pub fn apply(&mut self, update: &BasketMarkerUpdate) {
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(par) = update.par {
            self.par = par;
        }
        if let Some(distance) = update.distance {
            self.distance = distance;
        }
        if let Some(label) = update.label {
            self.label = label;
        }
    }
}

/// Partial update for a basket marker. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BasketMarkerUpdate {
    pub color: Option<BasketColor>,
    pub position: Option<Position>,
    pub par: Option<Par>,
    pub distance: Option<u32>,
    pub label: Option<char>,
}
