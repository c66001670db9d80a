use serde::{Deserialize, Serialize};

/// A 3D vector. Serialized as a `[x, y, z]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn splat(v: f64) -> Self {
        Self { x: v, y: v, z: v }
    }

    pub fn add(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    pub fn sub(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Component-wise product.
    pub fn mul(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    pub fn scaled(&self, factor: f64) -> Vec3 {
        Vec3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn min(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    pub fn max(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// Linear interpolation between two vectors.
    pub fn lerp(&self, other: &Vec3, t: f64) -> Vec3 {
        Vec3 {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// Whether every component is within `eps` of `other`.
    pub fn approx_eq(&self, other: &Vec3, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.z - other.z).abs() <= eps
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

/// A translate-then-scale transform, the subset of an object transform the
/// pipeline reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub location: Vec3,
    pub scale: Vec3,
}

impl Transform3D {
    pub fn identity() -> Self {
        Self {
            location: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    pub fn new(location: Vec3, scale: Vec3) -> Self {
        Self { location, scale }
    }

    /// Map a point from local space into this transform's parent space.
    pub fn apply(&self, point: &Vec3) -> Vec3 {
        self.location.add(&point.mul(&self.scale))
    }

    /// `self` applied after `child`: the world transform of a node whose
    /// parent world transform is `self` and whose local transform is `child`.
    pub fn then(&self, child: &Transform3D) -> Transform3D {
        Transform3D {
            location: self.apply(&child.location),
            scale: self.scale.mul(&child.scale),
        }
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Aabb> {
        points.into_iter().fold(None, |acc: Option<Aabb>, p| {
            Some(match acc {
                Some(b) => Aabb::new(b.min.min(p), b.max.max(p)),
                None => Aabb::new(*p, *p),
            })
        })
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(&other.min), self.max.max(&other.max))
    }

    /// The eight corners, in the same order hosts usually report them.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(b.x, b.y, a.z),
        ]
    }

    /// Extent along Z (the up axis).
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }

    pub fn center(&self) -> Vec3 {
        self.min.lerp(&self.max, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_serializes_as_array() {
        let v = Vec3::new(0.3, 0.0, 1.0);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[0.3,0.0,1.0]");
        let back: Vec3 = serde_json::from_str("[3, 0, 0]").unwrap();
        assert_eq!(back, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_vec3_lerp() {
        let a = Vec3::ZERO;
        let b = Vec3::new(3.0, 0.0, 1.0);
        let mid = a.lerp(&b, 0.5);
        assert!(mid.approx_eq(&Vec3::new(1.5, 0.0, 0.5), 1e-9));
    }

    #[test]
    fn test_transform_compose() {
        let parent = Transform3D::new(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(2.0));
        let child = Transform3D::new(Vec3::new(0.0, 0.0, 1.0), Vec3::splat(0.5));
        let world = parent.then(&child);
        assert_eq!(world.location, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(world.scale, Vec3::ONE);
        assert_eq!(world.apply(&Vec3::new(0.0, 0.0, 1.0)), Vec3::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn test_aabb_from_points() {
        let pts = [
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-2.0, 4.0, 3.0),
            Vec3::new(0.0, 0.0, -1.0),
        ];
        let b = Aabb::from_points(pts.iter()).unwrap();
        assert_eq!(b.min, Vec3::new(-2.0, -1.0, -1.0));
        assert_eq!(b.max, Vec3::new(1.0, 4.0, 3.0));
        assert!((b.height() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_aabb_empty() {
        let none: [Vec3; 0] = [];
        assert!(Aabb::from_points(none.iter()).is_none());
    }

    #[test]
    fn test_aabb_corners_roundtrip() {
        let b = Aabb::new(Vec3::new(-1.0, -2.0, 0.0), Vec3::new(1.0, 2.0, 5.0));
        assert_eq!(Aabb::from_points(b.corners().iter()), Some(b));
    }
}
