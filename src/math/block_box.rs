//! Inclusive integer bounding box over block coordinates

use serde::{Deserialize, Serialize};

use crate::core::types::IVec3;

/// Axis-aligned box of block coordinates; both corners are inclusive
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockBox {
    pub min: IVec3,
    pub max: IVec3,
}

impl BlockBox {
    /// Create a box from two corners, swapping components so that min <= max
    pub fn new(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Number of blocks along each axis
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Total number of blocks contained
    pub fn volume(&self) -> u64 {
        let s = self.size();
        s.x as u64 * s.y as u64 * s.z as u64
    }

    /// Check if a block coordinate lies inside the box
    pub fn contains(&self, p: IVec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Grow the box horizontally (X and Z faces) by `amount` blocks
    pub fn widened_xz(&self, amount: i32) -> BlockBox {
        let d = IVec3::new(amount, 0, amount);
        BlockBox {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// Iterate every contained coordinate, x-major then y then z
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        (self.min.x..=self.max.x).flat_map(move |x| {
            (self.min.y..=self.max.y).flat_map(move |y| {
                (self.min.z..=self.max.z).map(move |z| IVec3::new(x, y, z))
            })
        })
    }
}
