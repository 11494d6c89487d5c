pub mod bank;
pub mod dispatcher;

pub use bank::PadBank;
pub use dispatcher::{ClipPlayer, MachineState, PadDispatcher};
