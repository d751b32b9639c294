//! CPU device implementation

use crate::runtime::Device;

/// CPU device
///
/// The host exposes a single device with id 0. Other ids can be constructed
/// but the backend refuses to create a context for them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CpuDevice {
    id: usize,
}

impl CpuDevice {
    /// The host CPU
    pub fn new() -> Self {
        Self { id: 0 }
    }

    /// A CPU device with an explicit id
    pub fn with_id(id: usize) -> Self {
        Self { id }
    }
}

impl Device for CpuDevice {
    fn id(&self) -> usize {
        self.id
    }

    fn name(&self) -> String {
        if self.id == 0 {
            "cpu".to_string()
        } else {
            format!("cpu:{}", self.id)
        }
    }
}
