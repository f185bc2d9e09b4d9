//! Foundation utilities
//!
//! Math types, colors, and the pooling/scoping primitives the draw and
//! UI layers are built on.

pub mod color;
pub mod math;
pub mod pool;
pub mod scope;

pub use color::Color;
pub use math::{Bounds2, Vec2, Vec3, Vec4};
pub use pool::{Pool, PoolId};
pub use scope::ScopeStack;
