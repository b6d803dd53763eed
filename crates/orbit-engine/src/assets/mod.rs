pub mod shape;

pub use shape::{ShapeError, ShipShape};
