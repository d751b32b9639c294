//! Backend capability traits
//!
//! A backend exposes three narrow capabilities: device-context creation,
//! a per-queue native handle, and a per-task memory staging session. Routine
//! code never touches backend internals beyond these.

pub mod backend;
pub mod device;
pub mod native;

pub use backend::Backend;
pub use device::Device;
pub use native::{MemoryStaging, NativeHandle, PointerMode};
