//! Buffer management for vertex and staging data
//!
//! Memory management following RAII patterns with proper allocation and cleanup

use ash::{vk, Device};
use bytemuck::Pod;
use crate::render::vulkan::{DeviceContext, VulkanError, VulkanResult};

/// Buffer wrapper with its own device memory
///
/// Dropping the wrapper destroys the buffer before freeing the memory that backs it.
pub struct Buffer {
    device: Device,
    buffer: vk::Buffer,
    memory: vk::DeviceMemory,
    size: vk::DeviceSize,
}

impl Buffer {
    /// Create a new buffer with memory allocation
    pub fn new(
        context: &DeviceContext,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
        properties: vk::MemoryPropertyFlags,
    ) -> VulkanResult<Self> {
        let device = context.raw_device();

        let buffer_info = vk::BufferCreateInfo::builder()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);

        let buffer = unsafe {
            device.create_buffer(&buffer_info, None)
                .map_err(VulkanError::Api)?
        };

        let mem_requirements = unsafe { device.get_buffer_memory_requirements(buffer) };

        let memory_type_index = match find_memory_type(
            &context.memory_properties(),
            mem_requirements.memory_type_bits,
            properties,
        ) {
            Ok(index) => index,
            Err(e) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(e);
            }
        };

        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(mem_requirements.size)
            .memory_type_index(memory_type_index);

        let memory = match unsafe { device.allocate_memory(&alloc_info, None) } {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(VulkanError::Api(e));
            }
        };

        // From here on Drop owns both handles
        let wrapper = Self {
            device,
            buffer,
            memory,
            size,
        };

        unsafe {
            wrapper.device.bind_buffer_memory(wrapper.buffer, wrapper.memory, 0)
                .map_err(VulkanError::Api)?;
        }

        Ok(wrapper)
    }

    /// Host-visible, host-coherent buffer for CPU writes
    pub fn host_visible(
        context: &DeviceContext,
        size: vk::DeviceSize,
        usage: vk::BufferUsageFlags,
    ) -> VulkanResult<Self> {
        Self::new(
            context,
            size,
            usage,
            vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
        )
    }

    /// Write a slice to the start of the buffer
    ///
    /// Only the bytes being written are mapped. Writing more than the buffer holds is
    /// rejected before any memory is touched.
    pub fn write_slice<T: Pod>(&self, data: &[T]) -> VulkanResult<()> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        if bytes.is_empty() {
            return Ok(());
        }

        let byte_len = bytes.len() as vk::DeviceSize;
        if byte_len > self.size {
            return Err(VulkanError::InvalidOperation {
                reason: format!(
                    "write of {} bytes exceeds buffer size of {} bytes",
                    byte_len, self.size
                ),
            });
        }

        unsafe {
            let data_ptr = self.device
                .map_memory(self.memory, 0, byte_len, vk::MemoryMapFlags::empty())
                .map_err(VulkanError::Api)? as *mut u8;
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), data_ptr, bytes.len());
            self.device.unmap_memory(self.memory);
        }

        Ok(())
    }

    /// Get buffer handle
    pub fn handle(&self) -> vk::Buffer {
        self.buffer
    }

    /// Get size in bytes
    pub fn size(&self) -> vk::DeviceSize {
        self.size
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_buffer(self.buffer, None);
            self.device.free_memory(self.memory, None);
        }
    }
}

/// Find memory type with required properties
pub fn find_memory_type(
    mem_properties: &vk::PhysicalDeviceMemoryProperties,
    type_filter: u32,
    properties: vk::MemoryPropertyFlags,
) -> VulkanResult<u32> {
    (0..mem_properties.memory_type_count)
        .find(|&i| {
            (type_filter & (1 << i)) != 0
                && mem_properties.memory_types[i as usize]
                    .property_flags
                    .contains(properties)
        })
        .ok_or(VulkanError::NoSuitableMemoryType)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_properties(flags: &[vk::MemoryPropertyFlags]) -> vk::PhysicalDeviceMemoryProperties {
        let mut props = vk::PhysicalDeviceMemoryProperties::default();
        for (i, flag) in flags.iter().enumerate() {
            props.memory_types[i] = vk::MemoryType {
                property_flags: *flag,
                heap_index: 0,
            };
        }
        props.memory_type_count = flags.len() as u32;
        props
    }

    #[test]
    fn test_find_memory_type_respects_filter() {
        let host = vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        let props = memory_properties(&[
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
            host,
            host,
        ]);

        assert_eq!(find_memory_type(&props, 0b111, host).unwrap(), 1);
        // Type 1 filtered out, falls through to type 2
        assert_eq!(find_memory_type(&props, 0b101, host).unwrap(), 2);
        assert_eq!(
            find_memory_type(&props, 0b111, vk::MemoryPropertyFlags::DEVICE_LOCAL).unwrap(),
            0
        );
    }

    #[test]
    fn test_find_memory_type_none_suitable() {
        let props = memory_properties(&[vk::MemoryPropertyFlags::DEVICE_LOCAL]);
        let result = find_memory_type(&props, 0b1, vk::MemoryPropertyFlags::HOST_VISIBLE);
        assert!(matches!(result, Err(VulkanError::NoSuitableMemoryType)));
    }
}
