//! Built-in constraint types.

pub mod rotation_blend_slider;
