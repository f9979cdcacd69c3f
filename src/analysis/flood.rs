//! Bounded 3D flood fill over block categories
//!
//! Explores the connected region of blocks matching a predicate, starting
//! from a seed and staying inside an inclusive box. The caller owns the
//! `observed` set and threads it through sibling calls so coordinates are
//! never examined twice within one chunk.

use std::collections::{HashSet, VecDeque};

use crate::core::types::{IVec3, Result};
use crate::math::BlockBox;
use crate::world::{BlockCategories, BlockCategory, BlockSource};

/// Neighbourhood used when expanding the region
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connectivity {
    /// 6 face neighbours
    #[default]
    Faces,
    /// All 26 neighbours of the 3x3x3 cube, so diagonal contact connects
    Full,
}

const FACE_OFFSETS: [IVec3; 6] = [
    IVec3::new(1, 0, 0),
    IVec3::new(-1, 0, 0),
    IVec3::new(0, 1, 0),
    IVec3::new(0, -1, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(0, 0, -1),
];

const fn cube_offsets() -> [IVec3; 26] {
    let mut out = [IVec3::ZERO; 26];
    let mut i = 0;
    let mut dx = -1;
    while dx <= 1 {
        let mut dy = -1;
        while dy <= 1 {
            let mut dz = -1;
            while dz <= 1 {
                if dx != 0 || dy != 0 || dz != 0 {
                    out[i] = IVec3::new(dx, dy, dz);
                    i += 1;
                }
                dz += 1;
            }
            dy += 1;
        }
        dx += 1;
    }
    out
}

const CUBE_OFFSETS: [IVec3; 26] = cube_offsets();

impl Connectivity {
    /// Neighbour offsets for this connectivity
    pub fn offsets(&self) -> &'static [IVec3] {
        match self {
            Connectivity::Faces => &FACE_OFFSETS,
            Connectivity::Full => &CUBE_OFFSETS,
        }
    }
}

/// Outcome of a single flood fill
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FloodResult {
    /// Connected matching coordinates, seed first, in discovery order
    pub region: Vec<IVec3>,
    /// Every coordinate this call added to `observed`: the region plus the
    /// non-matching coordinates examined at its border
    pub newly_observed: Vec<IVec3>,
}

impl FloodResult {
    pub fn is_empty(&self) -> bool {
        self.region.is_empty()
    }

    pub fn len(&self) -> usize {
        self.region.len()
    }
}

/// Flood fill from `seed` over blocks accepted by `predicate`.
///
/// Only coordinates inside `bounds` and absent from `observed` are examined.
/// Each coordinate is inserted into `observed` before its neighbours are
/// queued, which bounds the work by the box volume even with cycles. A seed
/// that is out of bounds, already observed, or rejected yields an empty
/// region.
pub fn flood_fill<B, P>(
    blocks: &mut B,
    seed: IVec3,
    bounds: &BlockBox,
    mut predicate: P,
    observed: &mut HashSet<IVec3>,
    connectivity: Connectivity,
) -> Result<FloodResult>
where
    B: BlockSource + ?Sized,
    P: FnMut(&str) -> bool,
{
    let mut result = FloodResult::default();
    if !bounds.contains(seed) || !observed.insert(seed) {
        return Ok(result);
    }
    result.newly_observed.push(seed);
    if !predicate(&blocks.block_at(seed)?) {
        return Ok(result);
    }

    let mut queue = VecDeque::new();
    result.region.push(seed);
    queue.push_back(seed);

    while let Some(pos) = queue.pop_front() {
        for &offset in connectivity.offsets() {
            let next = pos + offset;
            if !bounds.contains(next) || !observed.insert(next) {
                continue;
            }
            result.newly_observed.push(next);
            if predicate(&blocks.block_at(next)?) {
                result.region.push(next);
                queue.push_back(next);
            }
        }
    }

    Ok(result)
}

/// Flood fill over one block category
pub fn flood_category<B: BlockSource + ?Sized>(
    blocks: &mut B,
    categories: &BlockCategories,
    category: BlockCategory,
    seed: IVec3,
    bounds: &BlockBox,
    observed: &mut HashSet<IVec3>,
    connectivity: Connectivity,
) -> Result<FloodResult> {
    flood_fill(
        blocks,
        seed,
        bounds,
        |id| categories.contains(category, id),
        observed,
        connectivity,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{BuildArea, MemoryWorld};

    const GLASS: &str = "minecraft:glass";

    fn world() -> MemoryWorld {
        MemoryWorld::new(BuildArea::new(IVec3::splat(-16), IVec3::splat(31)), "plains")
    }

    fn is_glass(id: &str) -> bool {
        id == GLASS
    }

    fn sorted(mut v: Vec<IVec3>) -> Vec<IVec3> {
        v.sort_by_key(|p| (p.x, p.y, p.z));
        v
    }

    /// Reference connected set by repeated relaxation, no queue
    fn brute_force(world: &mut MemoryWorld, seed: IVec3, bounds: &BlockBox, conn: Connectivity) -> Vec<IVec3> {
        let mut set: HashSet<IVec3> = HashSet::new();
        if world.block_at(seed).unwrap() != GLASS {
            return Vec::new();
        }
        set.insert(seed);
        loop {
            let mut grew = false;
            for p in bounds.iter() {
                if set.contains(&p) || world.block_at(p).unwrap() != GLASS {
                    continue;
                }
                if conn.offsets().iter().any(|&o| set.contains(&(p + o))) {
                    set.insert(p);
                    grew = true;
                }
            }
            if !grew {
                break;
            }
        }
        sorted(set.into_iter().collect())
    }

    #[test]
    fn test_offsets() {
        assert_eq!(Connectivity::Faces.offsets().len(), 6);
        let full = Connectivity::Full.offsets();
        assert_eq!(full.len(), 26);
        assert!(!full.contains(&IVec3::ZERO));
        let unique: HashSet<_> = full.iter().collect();
        assert_eq!(unique.len(), 26);
    }

    #[test]
    fn test_fills_connected_blob_only() {
        let mut w = world();
        w.fill(BlockBox::new(IVec3::ZERO, IVec3::new(2, 1, 2)), GLASS);
        w.set_block(IVec3::new(5, 0, 0), GLASS);
        let bounds = BlockBox::new(IVec3::splat(-1), IVec3::splat(6));
        let mut observed = HashSet::new();

        let res = flood_fill(&mut w, IVec3::ZERO, &bounds, is_glass, &mut observed, Connectivity::Faces).unwrap();
        assert_eq!(res.len(), 18);
        assert!(!res.region.contains(&IVec3::new(5, 0, 0)));
        assert_eq!(res.region[0], IVec3::ZERO);
    }

    #[test]
    fn test_matches_reference_on_irregular_shape() {
        let mut w = world();
        // Staircase with a diagonal hop and a loop
        for i in 0..6 {
            w.set_block(IVec3::new(i, i / 2, 0), GLASS);
        }
        w.fill(BlockBox::new(IVec3::new(0, 0, 1), IVec3::new(3, 0, 3)), GLASS);
        w.set_block(IVec3::new(1, 0, 2), "minecraft:stone");
        w.set_block(IVec3::new(7, 4, 1), GLASS);
        let bounds = BlockBox::new(IVec3::splat(-2), IVec3::splat(8));

        for conn in [Connectivity::Faces, Connectivity::Full] {
            let mut observed = HashSet::new();
            let res = flood_fill(&mut w, IVec3::ZERO, &bounds, is_glass, &mut observed, conn).unwrap();
            let expected = brute_force(&mut w, IVec3::ZERO, &bounds, conn);
            assert_eq!(sorted(res.region), expected, "{:?}", conn);
        }
    }

    #[test]
    fn test_never_examines_a_block_twice() {
        let mut w = world();
        w.fill(BlockBox::new(IVec3::ZERO, IVec3::splat(3)), GLASS);
        let bounds = BlockBox::new(IVec3::splat(-1), IVec3::splat(4));
        let mut observed = HashSet::new();

        let res = flood_fill(&mut w, IVec3::ONE, &bounds, is_glass, &mut observed, Connectivity::Full).unwrap();
        assert_eq!(res.len(), 64);
        assert!(w.query_count() <= bounds.volume());
        let unique: HashSet<_> = res.newly_observed.iter().collect();
        assert_eq!(unique.len(), res.newly_observed.len());
        assert_eq!(w.query_count() as usize, res.newly_observed.len());
    }

    #[test]
    fn test_diagonal_only_contact() {
        let mut w = world();
        // Centre plus the eight cube corners, touching only along edges/corners
        w.set_block(IVec3::ZERO, GLASS);
        for dx in [-1, 1] {
            for dy in [-1, 1] {
                for dz in [-1, 1] {
                    w.set_block(IVec3::new(dx, dy, dz), GLASS);
                }
            }
        }
        let bounds = BlockBox::new(IVec3::splat(-2), IVec3::splat(2));

        let mut observed = HashSet::new();
        let faces = flood_fill(&mut w, IVec3::ZERO, &bounds, is_glass, &mut observed, Connectivity::Faces).unwrap();
        assert_eq!(faces.region, vec![IVec3::ZERO]);

        let mut observed = HashSet::new();
        let full = flood_fill(&mut w, IVec3::ZERO, &bounds, is_glass, &mut observed, Connectivity::Full).unwrap();
        assert_eq!(full.len(), 9);
    }

    #[test]
    fn test_stays_inside_bounds() {
        let mut w = world();
        w.fill(BlockBox::new(IVec3::ZERO, IVec3::new(10, 0, 0)), GLASS);
        let bounds = BlockBox::new(IVec3::ZERO, IVec3::new(4, 0, 0));
        let mut observed = HashSet::new();

        let res = flood_fill(&mut w, IVec3::ZERO, &bounds, is_glass, &mut observed, Connectivity::Faces).unwrap();
        assert_eq!(res.len(), 5);
        assert!(res.region.iter().all(|p| bounds.contains(*p)));
        assert!(observed.iter().all(|p| bounds.contains(*p)));
    }

    #[test]
    fn test_shared_observed_set_prevents_rework() {
        let mut w = world();
        w.fill(BlockBox::new(IVec3::ZERO, IVec3::new(3, 0, 3)), GLASS);
        w.fill(BlockBox::new(IVec3::new(6, 0, 0), IVec3::new(7, 0, 1)), GLASS);
        let bounds = BlockBox::new(IVec3::new(-1, -1, -1), IVec3::new(8, 1, 4));
        let mut observed = HashSet::new();

        let first = flood_fill(&mut w, IVec3::ZERO, &bounds, is_glass, &mut observed, Connectivity::Faces).unwrap();
        // Seed inside the already explored region
        let again = flood_fill(&mut w, IVec3::new(2, 0, 2), &bounds, is_glass, &mut observed, Connectivity::Faces).unwrap();
        let second = flood_fill(&mut w, IVec3::new(6, 0, 0), &bounds, is_glass, &mut observed, Connectivity::Faces).unwrap();

        assert_eq!(first.len(), 16);
        assert!(again.is_empty());
        assert!(again.newly_observed.is_empty());
        assert_eq!(second.len(), 4);

        let a: HashSet<_> = first.newly_observed.iter().collect();
        let b: HashSet<_> = second.newly_observed.iter().collect();
        assert!(a.is_disjoint(&b));
        assert_eq!(observed.len(), first.newly_observed.len() + second.newly_observed.len());
    }

    #[test]
    fn test_rejected_or_outside_seed() {
        let mut w = world();
        let bounds = BlockBox::new(IVec3::ZERO, IVec3::splat(2));
        let mut observed = HashSet::new();

        let res = flood_fill(&mut w, IVec3::ONE, &bounds, is_glass, &mut observed, Connectivity::Faces).unwrap();
        assert!(res.is_empty());
        assert_eq!(res.newly_observed, vec![IVec3::ONE]);

        let res = flood_fill(&mut w, IVec3::splat(5), &bounds, is_glass, &mut observed, Connectivity::Faces).unwrap();
        assert!(res.is_empty());
        assert!(res.newly_observed.is_empty());
    }

    #[test]
    fn test_flood_category() {
        let cats = BlockCategories::default();
        let mut w = world();
        w.fill(BlockBox::new(IVec3::ZERO, IVec3::new(2, 0, 0)), "minecraft:water");
        w.set_block(IVec3::new(3, 0, 0), "minecraft:lava");
        let bounds = BlockBox::new(IVec3::splat(-1), IVec3::splat(4));
        let mut observed = HashSet::new();

        let res = flood_category(
            &mut w, &cats, BlockCategory::Fluid, IVec3::ZERO, &bounds, &mut observed, Connectivity::Faces,
        ).unwrap();
        assert_eq!(res.len(), 4);
    }

    /// Source that fails outside a small window, like a server dropping requests
    struct Flaky;

    impl BlockSource for Flaky {
        fn block_at(&mut self, pos: IVec3) -> Result<String> {
            if pos.x > 1 {
                return Err(crate::core::Error::query(pos, "connection reset"));
            }
            Ok("minecraft:water".to_string())
        }
    }

    #[test]
    fn test_query_errors_propagate() {
        let bounds = BlockBox::new(IVec3::ZERO, IVec3::splat(3));
        let mut observed = HashSet::new();
        let err = flood_fill(
            &mut Flaky, IVec3::ZERO, &bounds, |_| true, &mut observed, Connectivity::Faces,
        ).unwrap_err();
        assert!(matches!(err, crate::core::Error::Query { x: 2, .. }));
    }
}
