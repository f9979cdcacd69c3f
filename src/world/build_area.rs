//! Build area bounds and chunk partitioning

use serde::{Deserialize, Serialize};

use crate::core::types::{CHUNK_SIZE, IVec2, IVec3};
use crate::math::BlockBox;

/// The region of the world a survey is allowed to analyse.
///
/// Both corners are inclusive, matching what the world server reports for
/// its build area. Local coordinates are relative to `min`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BlockBox", into = "BlockBox")]
pub struct BuildArea {
    bounds: BlockBox,
}

impl From<BlockBox> for BuildArea {
    fn from(bounds: BlockBox) -> Self {
        // Re-normalize in case the corners came in swapped
        Self { bounds: BlockBox::new(bounds.min, bounds.max) }
    }
}

impl From<BuildArea> for BlockBox {
    fn from(area: BuildArea) -> Self {
        area.bounds
    }
}

impl BuildArea {
    /// Create a build area from two corners in any order
    pub fn new(a: IVec3, b: IVec3) -> Self {
        Self { bounds: BlockBox::new(a, b) }
    }

    /// Minimum corner (inclusive)
    pub fn min(&self) -> IVec3 {
        self.bounds.min
    }

    /// Maximum corner (inclusive)
    pub fn max(&self) -> IVec3 {
        self.bounds.max
    }

    /// The area as a block box
    pub fn bounds(&self) -> BlockBox {
        self.bounds
    }

    /// Width along X in blocks
    pub fn width(&self) -> i32 {
        self.bounds.size().x
    }

    /// Depth along Z in blocks
    pub fn depth(&self) -> i32 {
        self.bounds.size().z
    }

    /// Number of chunks along X and Z. Partial chunks at the far edges count.
    pub fn chunk_span(&self) -> IVec2 {
        IVec2::new(
            (self.width() + CHUNK_SIZE - 1) / CHUNK_SIZE,
            (self.depth() + CHUNK_SIZE - 1) / CHUNK_SIZE,
        )
    }

    /// Translate a build-local coordinate to a global one
    pub fn local_to_global(&self, local: IVec3) -> IVec3 {
        local + self.bounds.min
    }

    /// Global X/Z of the reference column (minimum corner) of a chunk
    pub fn chunk_origin(&self, cx: i32, cz: i32) -> IVec2 {
        IVec2::new(
            self.bounds.min.x + cx * CHUNK_SIZE,
            self.bounds.min.z + cz * CHUNK_SIZE,
        )
    }

    /// Full-height volume of a chunk in global coordinates
    pub fn chunk_volume(&self, cx: i32, cz: i32) -> BlockBox {
        let origin = self.chunk_origin(cx, cz);
        BlockBox::new(
            IVec3::new(origin.x, self.bounds.min.y, origin.y),
            IVec3::new(
                origin.x + CHUNK_SIZE - 1,
                self.bounds.max.y,
                origin.y + CHUNK_SIZE - 1,
            ),
        )
    }

    /// Check whether a global coordinate is inside the area
    pub fn contains(&self, global: IVec3) -> bool {
        self.bounds.contains(global)
    }
}
