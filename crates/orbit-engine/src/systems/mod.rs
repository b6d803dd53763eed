pub mod controls;
pub mod drag;
pub mod effects;
pub mod gravity;
pub mod render;
pub mod vector;
