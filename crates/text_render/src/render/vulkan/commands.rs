//! One-time command buffer submission
//!
//! Used for setup transfers only. Each submission blocks on queue idle before
//! returning.

use ash::vk;
use crate::render::vulkan::{DeviceContext, VulkanError, VulkanResult};

/// Command buffer allocated for a single synchronous submission
///
/// The command buffer is returned to the pool on drop, whether or not it was submitted.
pub struct SingleTimeCommands<'a> {
    context: &'a DeviceContext,
    command_buffer: vk::CommandBuffer,
}

impl<'a> SingleTimeCommands<'a> {
    /// Allocate a primary command buffer and begin recording
    pub fn begin(context: &'a DeviceContext) -> VulkanResult<Self> {
        let alloc_info = vk::CommandBufferAllocateInfo::builder()
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_pool(context.command_pool)
            .command_buffer_count(1);

        let command_buffer = unsafe {
            context.device.allocate_command_buffers(&alloc_info)
                .map_err(VulkanError::Api)?[0]
        };

        let commands = Self {
            context,
            command_buffer,
        };

        let begin_info = vk::CommandBufferBeginInfo::builder()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

        unsafe {
            context.device.begin_command_buffer(command_buffer, &begin_info)
                .map_err(VulkanError::Api)?;
        }

        Ok(commands)
    }

    /// Command buffer being recorded
    pub fn handle(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    /// End recording, submit, and wait for the queue to drain
    pub fn submit_and_wait(self) -> VulkanResult<()> {
        let device = &self.context.device;

        unsafe {
            device.end_command_buffer(self.command_buffer)
                .map_err(VulkanError::Api)?;
        }

        let command_buffers = [self.command_buffer];
        let submit_info = vk::SubmitInfo::builder()
            .command_buffers(&command_buffers);

        unsafe {
            device.queue_submit(self.context.graphics_queue, &[submit_info.build()], vk::Fence::null())
                .map_err(VulkanError::Api)?;
            device.queue_wait_idle(self.context.graphics_queue)
                .map_err(VulkanError::Api)?;
        }

        Ok(())
    }
}

impl Drop for SingleTimeCommands<'_> {
    fn drop(&mut self) {
        unsafe {
            self.context
                .device
                .free_command_buffers(self.context.command_pool, &[self.command_buffer]);
        }
    }
}

/// Record with `record` and submit synchronously
pub fn submit_one_shot<F>(context: &DeviceContext, record: F) -> VulkanResult<()>
where
    F: FnOnce(&ash::Device, vk::CommandBuffer) -> VulkanResult<()>,
{
    let commands = SingleTimeCommands::begin(context)?;
    record(&context.device, commands.handle())?;
    commands.submit_and_wait()
}
