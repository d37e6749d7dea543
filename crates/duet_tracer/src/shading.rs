//! Blinn-Phong local illumination.

use duet_core::Material;
use duet_math::{Color, Vec3, Vec4};

/// Direct contribution of one light at a surface point.
///
/// All positions are in the same space (the shaded object's model space in
/// the renderer). `light_position` is homogeneous: with `w == 0` its xyz is
/// the direction towards the light and is used as-is, otherwise it is a
/// point and the direction is computed from the surface.
///
/// The result is unclamped.
pub fn blinn_phong(
    hit_position: Vec3,
    normal: Vec3,
    light_position: Vec4,
    camera_position: Vec3,
    light_color: Color,
    material: &Material,
) -> Color {
    let light_direction = if light_position.w == 0.0 {
        light_position.truncate()
    } else {
        (light_position.truncate() - hit_position).normalize_or_zero()
    };

    let diffuse_intensity = normal.dot(light_direction).max(0.0);
    let diffuse = light_color * diffuse_intensity * material.base_color;

    let view_direction = (camera_position - hit_position).normalize_or_zero();
    let halfway_direction = (light_direction + view_direction).normalize_or_zero();

    let specular_intensity = normal.dot(halfway_direction).max(0.0).powf(material.shininess);
    let specular = light_color * (material.specular * specular_intensity);

    diffuse + specular
}
