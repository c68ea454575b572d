//! Screens and screen environments.
//!
//! A [`Screen`] is an upright rectangular panel in tracker space defined by
//! two opposite corners. `corner_a` is the upper or lower corner on the
//! viewer's left; pixel x grows from it along the panel, pixel y grows
//! downwards from the top edge. A [`ScreenEnvironment`] is an ordered set of
//! screens whose pixel spaces are concatenated horizontally.

use crate::{
    constants::GEOMETRY_EPSILON,
    geom::{Line, Plane3D, Point3D, Vector3D},
    utils::safe_cast::{f64_to_i32, f64_to_i32_clamp},
    Error, Result,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Integer pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelPos {
    /// Horizontal pixel
    pub x: i32,
    /// Vertical pixel, growing downwards
    pub y: i32,
}

impl PixelPos {
    /// Create a pixel position
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        f64::from(self.x - other.x).hypot(f64::from(self.y - other.y))
    }

    /// Offset from `previous` to `self`
    #[must_use]
    pub const fn delta_from(&self, previous: &Self) -> (i32, i32) {
        (self.x - previous.x, self.y - previous.y)
    }
}

impl fmt::Display for PixelPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Serialisable definition of a single screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Screen identifier, unique within an environment
    pub id: u32,
    /// Corner on the viewer's left
    pub corner_a: Point3D,
    /// Opposite corner
    pub corner_b: Point3D,
    /// Horizontal resolution
    pub px_width: u32,
    /// Vertical resolution
    pub px_height: u32,
}

/// An upright display panel in tracker space
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    id: u32,
    corner_a: Point3D,
    min: Point3D,
    max: Point3D,
    plane: Plane3D,
    across: Vector3D,
    mm_width: f64,
    mm_height: f64,
    px_width: u32,
    px_height: u32,
}

impl Screen {
    /// Create a screen from two opposite corners
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the corners span no area or a resolution is zero
    pub fn new(id: u32, corner_a: Point3D, corner_b: Point3D, px_width: u32, px_height: u32) -> Result<Self> {
        if px_width == 0 || px_height == 0 {
            return Err(Error::InvalidInput(format!(
                "Screen {id} needs a non-zero resolution, got {px_width}x{px_height}"
            )));
        }

        let across = Vector3D::from_points(&corner_a, &corner_b).horizontal();
        let mm_width = across.magnitude();
        let mm_height = (corner_b.y - corner_a.y).abs();
        if mm_width < GEOMETRY_EPSILON || mm_height < GEOMETRY_EPSILON {
            return Err(Error::InvalidInput(format!(
                "Corners of screen {id} span no area: {corner_a} / {corner_b}"
            )));
        }

        let vertical = Vector3D::new(0.0, 1.0, 0.0);
        let plane = Plane3D::from_vectors(&corner_a.to_vector(), &across, &vertical)?.normalized();

        Ok(Self {
            id,
            corner_a,
            min: Point3D::new(
                corner_a.x.min(corner_b.x),
                corner_a.y.min(corner_b.y),
                corner_a.z.min(corner_b.z),
            ),
            max: Point3D::new(
                corner_a.x.max(corner_b.x),
                corner_a.y.max(corner_b.y),
                corner_a.z.max(corner_b.z),
            ),
            plane,
            across: across.scale(1.0 / mm_width),
            mm_width,
            mm_height,
            px_width,
            px_height,
        })
    }

    /// Create a screen from its serialised definition
    ///
    /// # Errors
    ///
    /// See [`Screen::new`]
    pub fn from_config(config: &ScreenConfig) -> Result<Self> {
        Self::new(config.id, config.corner_a, config.corner_b, config.px_width, config.px_height)
    }

    /// Screen identifier
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Plane containing the screen, with unit normal
    #[must_use]
    pub const fn plane(&self) -> &Plane3D {
        &self.plane
    }

    /// Horizontal resolution
    #[must_use]
    pub const fn px_width(&self) -> u32 {
        self.px_width
    }

    /// Vertical resolution
    #[must_use]
    pub const fn px_height(&self) -> u32 {
        self.px_height
    }

    /// Physical width in millimetres
    #[must_use]
    pub const fn mm_width(&self) -> f64 {
        self.mm_width
    }

    /// Physical height in millimetres
    #[must_use]
    pub const fn mm_height(&self) -> f64 {
        self.mm_height
    }

    /// Horizontal pixel density
    #[must_use]
    pub fn px_per_mm_x(&self) -> f64 {
        f64::from(self.px_width) / self.mm_width
    }

    /// Vertical pixel density
    #[must_use]
    pub fn px_per_mm_y(&self) -> f64 {
        f64::from(self.px_height) / self.mm_height
    }

    /// Unit vector along the panel, from the viewer's left edge to the right edge
    #[must_use]
    pub const fn across(&self) -> Vector3D {
        self.across
    }

    fn within_bounds(&self, point: &Point3D) -> bool {
        let inside = |value: f64, min: f64, max: f64| value >= min - GEOMETRY_EPSILON && value <= max + GEOMETRY_EPSILON;
        inside(point.x, self.min.x, self.max.x)
            && inside(point.y, self.min.y, self.max.y)
            && inside(point.z, self.min.z, self.max.z)
    }

    /// Whether `point` lies in the screen plane and inside its rectangle
    #[must_use]
    pub fn contains_point(&self, point: &Point3D) -> bool {
        self.plane.contains_point(point, GEOMETRY_EPSILON) && self.within_bounds(point)
    }

    /// Convert a point on the screen into pixel coordinates
    ///
    /// # Errors
    ///
    /// Returns `NotOnScreen` if the point is off the plane or outside the
    /// physical rectangle
    pub fn coords_to_px(&self, point: &Point3D) -> Result<PixelPos> {
        if !self.plane.contains_point(point, GEOMETRY_EPSILON) {
            return Err(Error::NotOnScreen {
                screen_id: self.id,
                reason: format!("{point} is not in the screen plane"),
            });
        }
        if !self.within_bounds(point) {
            return Err(Error::NotOnScreen {
                screen_id: self.id,
                reason: format!("{point} is outside the screen rectangle"),
            });
        }

        let offset = Vector3D::from_points(&self.corner_a, point);
        let x_mm = offset.horizontal().magnitude();
        let y_mm = point.y - self.min.y;

        let max_x = i32::try_from(self.px_width).unwrap_or(i32::MAX);
        let max_y = i32::try_from(self.px_height).unwrap_or(i32::MAX);
        let x = f64_to_i32(x_mm * self.px_per_mm_x())?.clamp(0, max_x);
        let y = f64_to_i32(y_mm * self.px_per_mm_y())?.clamp(0, max_y);
        Ok(PixelPos::new(x, y))
    }

    /// Clamp a pixel position into this screen's raster
    #[must_use]
    pub fn clamp_px(&self, x: f64, y: f64) -> PixelPos {
        let max_x = i32::try_from(self.px_width).unwrap_or(i32::MAX);
        let max_y = i32::try_from(self.px_height).unwrap_or(i32::MAX);
        PixelPos::new(f64_to_i32_clamp(x, 0, max_x), f64_to_i32_clamp(y, 0, max_y))
    }
}

/// Where a pointer ray meets a screen of an environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenHit {
    /// Index of the screen in the environment order
    pub screen_index: usize,
    /// Identifier of the screen
    pub screen_id: u32,
    /// Pixel position on that screen
    pub local: PixelPos,
    /// Pixel position in the flattened environment space
    pub global: PixelPos,
    /// Intersection point in tracker space
    pub point: Point3D,
}

/// Built-in screen installations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentPreset {
    /// One 75" screen mounted above the camera
    #[default]
    SingleAbove,
    /// One 75" screen mounted below the camera
    SingleBelow,
    /// Three panels, the outer two angled 30° towards the user
    Curved,
    /// Four panels: left wall, two front panels, right wall
    WrapAround,
}

const PANEL_MM_WIDTH: f64 = 1650.0;
const PANEL_TOP: f64 = -1080.0;
const PANEL_BOTTOM: f64 = -150.0;
const PANEL_PX: (u32, u32) = (1920, 1080);

impl EnvironmentPreset {
    /// All presets
    pub const ALL: [Self; 4] = [Self::SingleAbove, Self::SingleBelow, Self::Curved, Self::WrapAround];

    /// Preset name as used in configuration
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SingleAbove => "single_above",
            Self::SingleBelow => "single_below",
            Self::Curved => "curved",
            Self::WrapAround => "wrap_around",
        }
    }

    /// Parse a preset name
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unknown names
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name() == name.to_lowercase())
            .ok_or_else(|| Error::ConfigError(format!("Unknown screen environment: {name}")))
    }

    /// Screen definitions of this preset, in flattening order
    #[must_use]
    pub fn screens(self) -> Vec<ScreenConfig> {
        let half = PANEL_MM_WIDTH / 2.0;
        let panel = |id: u32, a: (f64, f64), b: (f64, f64)| ScreenConfig {
            id,
            corner_a: Point3D::new(a.0, PANEL_TOP, a.1),
            corner_b: Point3D::new(b.0, PANEL_BOTTOM, b.1),
            px_width: PANEL_PX.0,
            px_height: PANEL_PX.1,
        };

        match self {
            Self::SingleAbove => vec![panel(0, (half, 0.0), (-half, 0.0))],
            Self::SingleBelow => vec![ScreenConfig {
                id: 0,
                corner_a: Point3D::new(half, 100.0, 0.0),
                corner_b: Point3D::new(-half, 1030.0, 0.0),
                px_width: PANEL_PX.0,
                px_height: PANEL_PX.1,
            }],
            Self::Curved => {
                let (sin, cos) = 30f64.to_radians().sin_cos();
                let outer_x = PANEL_MM_WIDTH.mul_add(cos, half);
                let outer_z = PANEL_MM_WIDTH * sin;
                vec![
                    panel(0, (outer_x, outer_z), (half, 0.0)),
                    panel(1, (half, 0.0), (-half, 0.0)),
                    panel(2, (-half, 0.0), (-outer_x, outer_z)),
                ]
            }
            Self::WrapAround => vec![
                panel(0, (PANEL_MM_WIDTH, PANEL_MM_WIDTH), (PANEL_MM_WIDTH, 0.0)),
                panel(1, (PANEL_MM_WIDTH, 0.0), (0.0, 0.0)),
                panel(2, (0.0, 0.0), (-PANEL_MM_WIDTH, 0.0)),
                panel(3, (-PANEL_MM_WIDTH, 0.0), (-PANEL_MM_WIDTH, PANEL_MM_WIDTH)),
            ],
        }
    }
}

/// An ordered collection of screens forming one installation
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenEnvironment {
    name: String,
    screens: Vec<Screen>,
    offsets: Vec<i32>,
}

impl ScreenEnvironment {
    /// Create an environment; pixel offsets accumulate the widths of
    /// preceding screens
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty list or duplicate screen ids
    pub fn new(name: impl Into<String>, screens: Vec<Screen>) -> Result<Self> {
        let name = name.into();
        if screens.is_empty() {
            return Err(Error::InvalidInput(format!("Environment {name} has no screens")));
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = screens.iter().find(|s| !seen.insert(s.id())) {
            return Err(Error::InvalidInput(format!(
                "Environment {name} contains screen id {} twice",
                duplicate.id()
            )));
        }

        let mut offsets = Vec::with_capacity(screens.len());
        let mut total: i64 = 0;
        for screen in &screens {
            offsets.push(i32::try_from(total).map_err(|_| {
                Error::InvalidInput(format!("Environment {name} is too wide"))
            })?);
            total += i64::from(screen.px_width());
        }

        Ok(Self { name, screens, offsets })
    }

    /// Build an environment from serialised screen definitions
    ///
    /// # Errors
    ///
    /// Propagates screen construction errors
    pub fn from_configs(name: impl Into<String>, configs: &[ScreenConfig]) -> Result<Self> {
        let screens = configs.iter().map(Screen::from_config).collect::<Result<Vec<_>>>()?;
        Self::new(name, screens)
    }

    /// Build a built-in installation
    ///
    /// # Errors
    ///
    /// Only fails if a preset definition is broken
    pub fn preset(preset: EnvironmentPreset) -> Result<Self> {
        Self::from_configs(preset.name(), &preset.screens())
    }

    /// Environment name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Screens in flattening order
    #[must_use]
    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    /// Screen at `index`
    #[must_use]
    pub fn screen(&self, index: usize) -> Option<&Screen> {
        self.screens.get(index)
    }

    /// Width of the flattened pixel space
    #[must_use]
    pub fn total_px_width(&self) -> i32 {
        self.offsets
            .last()
            .zip(self.screens.last())
            .map_or(0, |(offset, screen)| offset.saturating_add(i32::try_from(screen.px_width()).unwrap_or(i32::MAX)))
    }

    /// Height of the tallest screen
    #[must_use]
    pub fn max_px_height(&self) -> i32 {
        self.screens
            .iter()
            .map(|s| i32::try_from(s.px_height()).unwrap_or(i32::MAX))
            .max()
            .unwrap_or(0)
    }

    /// Centre of the flattened pixel space
    #[must_use]
    pub fn center(&self) -> PixelPos {
        PixelPos::new(self.total_px_width() / 2, self.max_px_height() / 2)
    }

    /// Translate a pixel on screen `index` into the flattened space
    #[must_use]
    pub fn to_global(&self, index: usize, local: PixelPos) -> PixelPos {
        let offset = self.offsets.get(index).copied().unwrap_or(0);
        PixelPos::new(offset.saturating_add(local.x), local.y)
    }

    /// Find the screen a pointer ray points at.
    ///
    /// Screens parallel to the ray and intersections behind the ray origin
    /// are skipped. Should several screens accept the ray, the last one in
    /// environment order wins.
    #[must_use]
    pub fn intersect(&self, pointer: &Line) -> Option<ScreenHit> {
        let mut hit = None;
        for (index, screen) in self.screens.iter().enumerate() {
            let point = match screen.plane().intersect_line(pointer) {
                Ok((_, true)) => continue,
                Ok((point, false)) => point,
                Err(e) => {
                    debug!("Skipping screen {}: {}", screen.id(), e);
                    continue;
                }
            };
            let Ok(local) = screen.coords_to_px(&point) else {
                continue;
            };
            if let Some(ScreenHit { screen_id, .. }) = hit {
                warn!(
                    "Pointer hits screens {} and {} of {}, using the latter",
                    screen_id,
                    screen.id(),
                    self.name
                );
            }
            hit = Some(ScreenHit {
                screen_index: index,
                screen_id: screen.id(),
                local,
                global: self.to_global(index, local),
                point,
            });
        }
        hit
    }
}
