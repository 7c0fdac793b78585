//! Presentation-controller channel: wire protocol, transport, offline
//! fallback.

pub mod channel;
pub mod offline;
pub mod protocol;

pub use channel::{ControllerLink, LinkMode};
pub use protocol::{Inbound, Outbound, PresentationAction, SliderTarget};
