//! Removal regions and the ordered set used by the redaction passes

use crate::{RedactError, Result, utils};
use geo::{Coord, Point, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Axis-aligned lat/lon rectangle given by two diagonal corners
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rectangle {
    /// Normalized bounds (x = longitude, y = latitude)
    bounds: Rect<f64>,
    /// Corners as given: lat1, lon1, lat2, lon2
    corners: [f64; 4],
    /// Half of the smaller side in meters, cached at construction
    default_vicinity: f64,
}

impl Rectangle {
    /// Create a rectangle from two diagonal corners, in any order
    pub fn new(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<Self> {
        for (lat, lon) in [(lat1, lon1), (lat2, lon2)] {
            if !utils::is_valid_coordinate(lat, lon) {
                return Err(RedactError::InvalidRegion(format!(
                    "rectangle corner ({lat}, {lon}) is not a valid coordinate"
                )));
            }
        }

        let bounds = Rect::new(Coord { x: lon1, y: lat1 }, Coord { x: lon2, y: lat2 });
        Ok(Self {
            bounds,
            corners: [lat1, lon1, lat2, lon2],
            default_vicinity: utils::rectangle_default_vicinity(&bounds),
        })
    }

    #[inline]
    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// The two corners in the order they were given
    #[inline]
    pub fn corners(&self) -> [f64; 4] {
        self.corners
    }

    #[inline]
    pub fn min_lat(&self) -> f64 {
        self.bounds.min().y
    }

    #[inline]
    pub fn max_lat(&self) -> f64 {
        self.bounds.max().y
    }

    #[inline]
    pub fn min_lon(&self) -> f64 {
        self.bounds.min().x
    }

    #[inline]
    pub fn max_lon(&self) -> f64 {
        self.bounds.max().x
    }

    /// Half of the smaller side length in meters
    #[inline]
    pub fn default_vicinity(&self) -> f64 {
        self.default_vicinity
    }

    /// Strict containment, boundaries included
    #[inline]
    pub fn contains(&self, point: Point<f64>) -> bool {
        utils::in_rectangle(point, &self.bounds)
    }

    /// Containment after growing the bounds by the vicinity (or the default vicinity)
    #[inline]
    pub fn contains_expanded(&self, point: Point<f64>, vicinity: Option<f64>) -> bool {
        let vicinity = vicinity.unwrap_or(self.default_vicinity);
        utils::in_expanded_rectangle(point, &self.bounds, vicinity)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [lat1, lon1, lat2, lon2] = self.corners;
        write!(f, "({lat1:.6}, {lon1:.6}) to ({lat2:.6}, {lon2:.6})")
    }
}

/// Circle around a center point with a radius in meters
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Circle {
    center: Point<f64>,
    radius: f64,
}

impl Circle {
    /// Create a circle; a zero radius is allowed and matches only the center
    pub fn new(lat: f64, lon: f64, radius: f64) -> Result<Self> {
        if !utils::is_valid_coordinate(lat, lon) {
            return Err(RedactError::InvalidRegion(format!(
                "circle center ({lat}, {lon}) is not a valid coordinate"
            )));
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(RedactError::InvalidRegion(format!(
                "circle radius {radius} must be a non-negative number of meters"
            )));
        }

        Ok(Self {
            center: Point::new(lon, lat),
            radius,
        })
    }

    #[inline]
    pub fn center(&self) -> Point<f64> {
        self.center
    }

    /// Radius in meters
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// The default vicinity of a circle is its own radius
    #[inline]
    pub fn default_vicinity(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn contains(&self, point: Point<f64>) -> bool {
        utils::in_circle(point, self.center, self.radius)
    }

    #[inline]
    pub fn contains_expanded(&self, point: Point<f64>, vicinity: Option<f64>) -> bool {
        let vicinity = vicinity.unwrap_or(self.radius);
        utils::in_expanded_circle(point, self.center, self.radius, vicinity)
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "center=({:.6}, {:.6}), radius={:.2} m",
            self.center.y(),
            self.center.x(),
            self.radius
        )
    }
}

/// Kind of removal region, used to label per-region statistics
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RegionKind {
    Rectangle,
    Circle,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionKind::Rectangle => f.write_str("rectangle"),
            RegionKind::Circle => f.write_str("circle"),
        }
    }
}

/// A removal region of either shape
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Region {
    Rectangle(Rectangle),
    Circle(Circle),
}

impl Region {
    pub fn kind(&self) -> RegionKind {
        match self {
            Region::Rectangle(_) => RegionKind::Rectangle,
            Region::Circle(_) => RegionKind::Circle,
        }
    }

    pub fn contains(&self, point: Point<f64>) -> bool {
        match self {
            Region::Rectangle(rect) => rect.contains(point),
            Region::Circle(circle) => circle.contains(point),
        }
    }

    pub fn contains_expanded(&self, point: Point<f64>, vicinity: Option<f64>) -> bool {
        match self {
            Region::Rectangle(rect) => rect.contains_expanded(point, vicinity),
            Region::Circle(circle) => circle.contains_expanded(point, vicinity),
        }
    }
}

impl From<Rectangle> for Region {
    fn from(rect: Rectangle) -> Self {
        Region::Rectangle(rect)
    }
}

impl From<Circle> for Region {
    fn from(circle: Circle) -> Self {
        Region::Circle(circle)
    }
}

/// Indices of the rectangles and circles matching a point
///
/// Most points match at most one region, so the lists stay inline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionMatches {
    pub rectangles: SmallVec<[usize; 2]>,
    pub circles: SmallVec<[usize; 2]>,
}

impl RegionMatches {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty() && self.circles.is_empty()
    }
}

/// Ordered removal regions, kept per shape kind for 1-indexed reporting
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionSet {
    rectangles: Vec<Rectangle>,
    circles: Vec<Circle>,
}

impl RegionSet {
    /// Create an empty region set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a region, preserving declaration order within its kind
    pub fn push(&mut self, region: impl Into<Region>) {
        match region.into() {
            Region::Rectangle(rect) => self.rectangles.push(rect),
            Region::Circle(circle) => self.circles.push(circle),
        }
    }

    #[inline]
    pub fn rectangles(&self) -> &[Rectangle] {
        &self.rectangles
    }

    #[inline]
    pub fn circles(&self) -> &[Circle] {
        &self.circles
    }

    /// All regions, rectangles first, each in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Region> + '_ {
        self.rectangles
            .iter()
            .copied()
            .map(Region::from)
            .chain(self.circles.iter().copied().map(Region::from))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rectangles.len() + self.circles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty() && self.circles.is_empty()
    }

    /// Every region whose strict test contains the point
    pub fn strict_matches(&self, point: Point<f64>) -> RegionMatches {
        RegionMatches {
            rectangles: matching_indices(&self.rectangles, |rect| rect.contains(point)),
            circles: matching_indices(&self.circles, |circle| circle.contains(point)),
        }
    }

    /// Every region whose vicinity-expanded test contains the point
    ///
    /// `vicinity` overrides each shape's default buffer when set.
    pub fn expanded_matches(&self, point: Point<f64>, vicinity: Option<f64>) -> RegionMatches {
        RegionMatches {
            rectangles: matching_indices(&self.rectangles, |rect| {
                rect.contains_expanded(point, vicinity)
            }),
            circles: matching_indices(&self.circles, |circle| {
                circle.contains_expanded(point, vicinity)
            }),
        }
    }
}

impl FromIterator<Region> for RegionSet {
    fn from_iter<I: IntoIterator<Item = Region>>(iter: I) -> Self {
        let mut set = RegionSet::new();
        for region in iter {
            set.push(region);
        }
        set
    }
}

fn matching_indices<T>(shapes: &[T], test: impl Fn(&T) -> bool) -> SmallVec<[usize; 2]> {
    shapes
        .iter()
        .enumerate()
        .filter(|(_, shape)| test(shape))
        .map(|(index, _)| index)
        .collect()
}
