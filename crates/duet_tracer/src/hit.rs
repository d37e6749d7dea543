//! Nearest-hit queries against a scene.

use crate::geometry::Surface;
use duet_core::{Object, Scene};
use duet_math::{Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Only lives for the duration of one cast and its immediate consumer.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Index of the object in scene order
    pub index: usize,
    pub object: &'a Object,
    /// World-space point of intersection
    pub position: Vec3,
}

impl<'a> Hit<'a> {
    /// Hit point in the object's model space.
    #[inline]
    pub fn local_position(&self) -> Vec3 {
        self.position - self.object.position
    }

    /// Model-space surface normal at the hit point.
    pub fn normal(&self) -> Vec3 {
        self.object.shape.normal_at(self.local_position())
    }
}

/// Find the nearest object along `ray` closer than `max_distance`.
///
/// Objects are scanned in scene order and a later object only wins when it is
/// strictly closer, so exact ties go to the earlier object. `max_distance` is
/// a hard cutoff, which lets shadow rays stop at the light.
pub fn cast<'a>(ray: &Ray, scene: &'a Scene, max_distance: f32) -> Option<Hit<'a>> {
    let mut closest_so_far = max_distance;
    let mut nearest = None;

    for (index, object) in scene.objects().iter().enumerate() {
        let local_ray = ray.relative_to(object.position);
        let Some(t) = object.shape.intersect(&local_ray).nearest() else {
            continue;
        };

        if t < closest_so_far {
            closest_so_far = t;
            nearest = Some((index, object));
        }
    }

    nearest.map(|(index, object)| Hit {
        index,
        object,
        position: ray.at(closest_so_far),
    })
}
