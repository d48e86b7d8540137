//! Vulkan device context and error types
//!
//! The text renderer never creates an instance, device or queue itself. The host
//! hands those in through [`DeviceContext`] and keeps ownership of them.

use ash::{vk, Device, Instance};
use thiserror::Error;

/// Vulkan-specific error types
#[derive(Error, Debug)]
pub enum VulkanError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// Invalid operation attempted
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Description of why the operation is invalid
        reason: String,
    },

    /// Resource initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// No suitable memory type found for allocation
    #[error("No suitable memory type found")]
    NoSuitableMemoryType,

    /// Image layout transition outside the supported upload path
    #[error("Unsupported layout transition: {old:?} -> {new:?}")]
    UnsupportedLayoutTransition {
        /// Layout the image is currently in
        old: vk::ImageLayout,
        /// Requested layout
        new: vk::ImageLayout,
    },
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

/// Handles borrowed from the host application
///
/// The command pool and graphics queue are only used for the one-shot atlas
/// upload during initialization.
#[derive(Clone)]
pub struct DeviceContext {
    /// Vulkan instance (for memory property queries)
    pub instance: Instance,
    /// Logical device used to create every text resource
    pub device: Device,
    /// Physical device backing `device`
    pub physical_device: vk::PhysicalDevice,
    /// Pool for one-time transfer command buffers
    pub command_pool: vk::CommandPool,
    /// Queue the transfer command buffers are submitted to
    pub graphics_queue: vk::Queue,
}

impl DeviceContext {
    /// Bundle host-owned handles
    pub fn new(
        instance: Instance,
        device: Device,
        physical_device: vk::PhysicalDevice,
        command_pool: vk::CommandPool,
        graphics_queue: vk::Queue,
    ) -> Self {
        Self {
            instance,
            device,
            physical_device,
            command_pool,
            graphics_queue,
        }
    }

    /// Clone of the logical device function table
    pub fn raw_device(&self) -> Device {
        self.device.clone()
    }

    /// Memory properties of the physical device
    pub fn memory_properties(&self) -> vk::PhysicalDeviceMemoryProperties {
        unsafe {
            self.instance
                .get_physical_device_memory_properties(self.physical_device)
        }
    }
}
