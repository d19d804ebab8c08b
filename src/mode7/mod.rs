//! Mode-7 fake perspective
//!
//! Rotate + zoom a sprite, then squash it vertically to imitate a tilted
//! ground plane. No real 3D projection involved.

mod sprite;
mod transform;
mod transformer;

pub use sprite::*;
pub use transformer::*;
