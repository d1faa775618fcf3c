mod aabb;
mod color;
mod hitbox;
mod ray;

pub use aabb::AABB;
pub use color::hex_to_rgb;
pub use hitbox::Hitbox;
pub use ray::{intersect_aabb, Ray};
