pub mod body;
pub mod physics;
pub mod scene;
pub mod simulation;
pub mod time;
pub mod universe;
