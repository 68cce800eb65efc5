//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's objects. It answers the same nearest-hit
//! query as [`HittableList`](crate::HittableList) while skipping subtrees
//! whose bounding box the ray misses.

use crate::{HitRecord, Hittable, HittableList};
use ivar_math::{Aabb, Interval, Ray};
use std::sync::Arc;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf { objects: Vec<Arc<dyn Hittable>>, bbox: Aabb },
    /// Empty node (for edge cases).
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects)
    }

    /// Build a BVH over the members of a scene.
    pub fn from_list(list: &HittableList) -> Self {
        Self::new(list.objects().to_vec())
    }

    /// Recursive BVH construction.
    ///
    /// Simple median split: sort objects by centroid on the axis with the
    /// widest centroid spread, split in half, recurse.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let n = objects.len();

        let bounds = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::surrounding(&acc, &o.bounding_box()));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf { objects, bbox: bounds };
        }

        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_unstable_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        let right_objects = objects.split_off(n / 2);

        BvhNode::Branch {
            left: Box::new(Self::build(objects)),
            right: Box::new(Self::build(right_objects)),
            bbox: bounds,
        }
    }

    /// Depth of the tree (a single leaf has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        match self {
            BvhNode::Empty => false,

            BvhNode::Leaf { objects, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let mut hit_anything = false;
                let mut closest = ray_t.max;

                for obj in objects {
                    if obj.hit(ray, ray_t.with_max(closest), rec) {
                        hit_anything = true;
                        closest = rec.t;
                    }
                }
                hit_anything
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return false;
                }

                let hit_left = left.hit(ray, ray_t, rec);

                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, ray_t.with_max(right_max), rec);

                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cube, Lambertian, Material, Sphere};
    use ivar_math::Vec3;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::splat(0.5)))
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        assert!(matches!(bvh, BvhNode::Empty));
        assert_eq!(bvh.depth(), 0);
    }

    #[test]
    fn test_bvh_single_sphere() {
        let objects: Vec<Arc<dyn Hittable>> = vec![Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray()))];
        let bvh = BvhNode::new(objects);
        assert!(matches!(bvh, BvhNode::Leaf { .. }));

        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::FORWARD, &mut rec));
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres: Vec<Arc<dyn Hittable>> = (0..10)
            .map(|i| Arc::new(Sphere::new(Vec3::new(i as f64, 0.0, -5.0), 0.5, gray())) as Arc<dyn Hittable>)
            .collect();
        let bvh = BvhNode::new(spheres);
        assert!(bvh.depth() > 1);

        let ray = Ray::new_simple(Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(bvh.hit(&ray, Interval::FORWARD, &mut rec));
        assert!((rec.p.z - (-4.5)).abs() < 1e-9);
    }

    #[test]
    fn test_bvh_matches_list() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut list = HittableList::new();
        for i in 0..40 {
            let center = Vec3::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0), rng.gen_range(-15.0..-5.0));
            if i % 2 == 0 {
                list.add(Arc::new(Sphere::new(center, rng.gen_range(0.2..1.0), gray())));
            } else {
                list.add(Arc::new(Cube::new(center, rng.gen_range(0.2..1.5), gray())));
            }
        }
        let bvh = BvhNode::from_list(&list);

        for _ in 0..500 {
            let direction = Vec3::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.5..0.5), -1.0);
            let ray = Ray::new_simple(Vec3::ZERO, direction);

            let mut list_rec = HitRecord::default();
            let mut bvh_rec = HitRecord::default();
            let list_hit = list.hit(&ray, Interval::FORWARD, &mut list_rec);
            let bvh_hit = bvh.hit(&ray, Interval::FORWARD, &mut bvh_rec);

            assert_eq!(list_hit, bvh_hit);
            if list_hit {
                assert_eq!(list_rec.t, bvh_rec.t);
                assert_eq!(list_rec.normal, bvh_rec.normal);
            }
        }
    }
}
