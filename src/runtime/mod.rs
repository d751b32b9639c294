//! Runtime: devices, queues, buffers and native interop
//!
//! This module defines the `Backend` capability traits and the portable
//! execution model routines are written against.
//!
//! # Architecture
//!
//! ```text
//! Platform<B> (owns device contexts)
//! └── Queue<B> (owns native handle, orders submissions)
//!     └── CommandGroup (declares buffer accesses + one interop task)
//!         └── InteropHandle (native handle + memory staging, task-scoped)
//! ```

mod buffer;
mod event;
mod interop;
mod platform;
mod pointer;
mod queue;
pub mod traits;

#[cfg(feature = "cpu")]
pub mod cpu;

#[cfg(feature = "cuda")]
pub mod cuda;

pub use buffer::{AccessMode, Buffer, HostRead, HostWrite};
pub use event::Event;
pub use interop::{Accessor, InteropHandle};
pub use platform::Platform;
pub use pointer::{DevicePtr, RawRegion};
pub use queue::{AsyncHandler, CommandGroup, ExecutionMode, Queue, QueueConfig};
pub use traits::{Backend, Device, MemoryStaging, NativeHandle, PointerMode};
