use glam::{Affine3A, Vec3};
use uuid::Uuid;

/// Axis-aligned bounds of a geometry in its local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |bb, &p| Self {
            min: bb.min.min(p),
            max: bb.max.max(p),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Bounds of the eight transformed corners.
    #[must_use]
    pub fn transform(&self, matrix: &Affine3A) -> Self {
        if self.is_empty() {
            return *self;
        }
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        Self::from_points(&corners.map(|c| matrix.transform_point3(c)))
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// CPU-side triangle geometry of one mesh primitive.
///
/// `morph_positions[i]` holds the position displacements of morph target
/// `i`, one per vertex.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub uuid: Uuid,
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub indices: Option<Vec<u32>>,
    pub morph_positions: Vec<Vec<Vec3>>,
    pub bounding_box: BoundingBox,
}

impl Geometry {
    #[must_use]
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        let bounding_box = BoundingBox::from_points(&positions);
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            positions,
            normals: None,
            indices: None,
            morph_positions: Vec::new(),
            bounding_box,
        }
    }

    #[must_use]
    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = Some(indices);
        self
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn morph_target_count(&self) -> usize {
        self.morph_positions.len()
    }

    pub fn compute_bounding_box(&mut self) {
        self.bounding_box = BoundingBox::from_points(&self.positions);
    }
}
