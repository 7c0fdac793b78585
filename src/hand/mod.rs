//! Hand input: landmark frames, gesture classification, cursor mapping.

pub mod cursor;
pub mod gesture;
pub mod landmarks;

pub use cursor::Cursor;
pub use gesture::{classify, GestureState};
pub use landmarks::{HandFrame, Landmark};
