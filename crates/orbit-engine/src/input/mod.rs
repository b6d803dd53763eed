pub mod keys;
pub mod queue;

pub use keys::KeyState;
pub use queue::{InputEvent, InputQueue};
