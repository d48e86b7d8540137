//! Vulkan texture management for the glyph atlas
//!
//! The atlas is a single-channel `R8_UNORM` image uploaded once through a staging
//! buffer. Only the two transitions of that upload path are supported.

use ash::{vk, Device};
use crate::render::vulkan::{
    buffer::{find_memory_type, Buffer},
    commands::submit_one_shot,
    DeviceContext, VulkanError, VulkanResult,
};

/// Texel format of the atlas image
pub const ATLAS_FORMAT: vk::Format = vk::Format::R8_UNORM;

const COLOR_SUBRESOURCE: vk::ImageSubresourceRange = vk::ImageSubresourceRange {
    aspect_mask: vk::ImageAspectFlags::COLOR,
    base_mip_level: 0,
    level_count: 1,
    base_array_layer: 0,
    layer_count: 1,
};

/// Access masks and pipeline stages for one image layout transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionMasks {
    /// Accesses that must complete before the transition
    pub src_access: vk::AccessFlags,
    /// Accesses that wait on the transition
    pub dst_access: vk::AccessFlags,
    /// Stage the barrier waits on
    pub src_stage: vk::PipelineStageFlags,
    /// Stage blocked until the barrier completes
    pub dst_stage: vk::PipelineStageFlags,
}

/// Barrier parameters for the supported upload transitions
///
/// `UNDEFINED -> TRANSFER_DST_OPTIMAL` and
/// `TRANSFER_DST_OPTIMAL -> SHADER_READ_ONLY_OPTIMAL`; anything else is rejected.
pub fn layout_transition_masks(
    old: vk::ImageLayout,
    new: vk::ImageLayout,
) -> VulkanResult<TransitionMasks> {
    match (old, new) {
        (vk::ImageLayout::UNDEFINED, vk::ImageLayout::TRANSFER_DST_OPTIMAL) => Ok(TransitionMasks {
            src_access: vk::AccessFlags::empty(),
            dst_access: vk::AccessFlags::TRANSFER_WRITE,
            src_stage: vk::PipelineStageFlags::TOP_OF_PIPE,
            dst_stage: vk::PipelineStageFlags::TRANSFER,
        }),
        (vk::ImageLayout::TRANSFER_DST_OPTIMAL, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL) => {
            Ok(TransitionMasks {
                src_access: vk::AccessFlags::TRANSFER_WRITE,
                dst_access: vk::AccessFlags::SHADER_READ,
                src_stage: vk::PipelineStageFlags::TRANSFER,
                dst_stage: vk::PipelineStageFlags::FRAGMENT_SHADER,
            })
        }
        _ => Err(VulkanError::UnsupportedLayoutTransition { old, new }),
    }
}

/// Record an image layout transition barrier
pub fn record_layout_transition(
    device: &Device,
    command_buffer: vk::CommandBuffer,
    image: vk::Image,
    old: vk::ImageLayout,
    new: vk::ImageLayout,
) -> VulkanResult<()> {
    let masks = layout_transition_masks(old, new)?;

    let barrier = vk::ImageMemoryBarrier::builder()
        .old_layout(old)
        .new_layout(new)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(COLOR_SUBRESOURCE)
        .src_access_mask(masks.src_access)
        .dst_access_mask(masks.dst_access);

    unsafe {
        device.cmd_pipeline_barrier(
            command_buffer,
            masks.src_stage,
            masks.dst_stage,
            vk::DependencyFlags::empty(),
            &[],
            &[],
            &[barrier.build()],
        );
    }

    Ok(())
}

/// Device-local 2D image with its bound memory
pub struct Image {
    device: Device,
    image: vk::Image,
    memory: vk::DeviceMemory,
    extent: vk::Extent2D,
}

impl Image {
    /// Create a sampled, transfer-destination image in device-local memory
    pub fn new(context: &DeviceContext, extent: vk::Extent2D, format: vk::Format) -> VulkanResult<Self> {
        let device = context.raw_device();

        let image_info = vk::ImageCreateInfo::builder()
            .image_type(vk::ImageType::TYPE_2D)
            .extent(vk::Extent3D {
                width: extent.width,
                height: extent.height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .format(format)
            .tiling(vk::ImageTiling::OPTIMAL)
            .initial_layout(vk::ImageLayout::UNDEFINED)
            .usage(vk::ImageUsageFlags::TRANSFER_DST | vk::ImageUsageFlags::SAMPLED)
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .samples(vk::SampleCountFlags::TYPE_1);

        let image = unsafe {
            device.create_image(&image_info, None)
                .map_err(VulkanError::Api)?
        };

        let requirements = unsafe { device.get_image_memory_requirements(image) };
        let memory_type_index = match find_memory_type(
            &context.memory_properties(),
            requirements.memory_type_bits,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        ) {
            Ok(index) => index,
            Err(e) => {
                unsafe { device.destroy_image(image, None) };
                return Err(e);
            }
        };

        let alloc_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(requirements.size)
            .memory_type_index(memory_type_index);

        let memory = match unsafe { device.allocate_memory(&alloc_info, None) } {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { device.destroy_image(image, None) };
                return Err(VulkanError::Api(e));
            }
        };

        let wrapper = Self {
            device,
            image,
            memory,
            extent,
        };

        unsafe {
            wrapper.device.bind_image_memory(wrapper.image, wrapper.memory, 0)
                .map_err(VulkanError::Api)?;
        }

        Ok(wrapper)
    }

    /// Get image handle
    pub fn handle(&self) -> vk::Image {
        self.image
    }

    /// Get image extent
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_image(self.image, None);
            self.device.free_memory(self.memory, None);
        }
    }
}

/// Image view wrapper
pub struct ImageView {
    device: Device,
    view: vk::ImageView,
}

impl ImageView {
    /// Create a 2D color view over the whole image
    pub fn new(device: Device, image: vk::Image, format: vk::Format) -> VulkanResult<Self> {
        let view_info = vk::ImageViewCreateInfo::builder()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(format)
            .subresource_range(COLOR_SUBRESOURCE);

        let view = unsafe {
            device.create_image_view(&view_info, None)
                .map_err(VulkanError::Api)?
        };

        Ok(Self { device, view })
    }

    /// Get image view handle
    pub fn handle(&self) -> vk::ImageView {
        self.view
    }
}

impl Drop for ImageView {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_image_view(self.view, None);
        }
    }
}

/// Sampler wrapper
pub struct Sampler {
    device: Device,
    sampler: vk::Sampler,
}

impl Sampler {
    /// Bilinear sampler clamped to the edge, so glyph padding does not wrap
    pub fn linear_clamp(device: Device) -> VulkanResult<Self> {
        let sampler_info = vk::SamplerCreateInfo::builder()
            .mag_filter(vk::Filter::LINEAR)
            .min_filter(vk::Filter::LINEAR)
            .address_mode_u(vk::SamplerAddressMode::CLAMP_TO_EDGE)
            .address_mode_v(vk::SamplerAddressMode::CLAMP_TO_EDGE)
            .address_mode_w(vk::SamplerAddressMode::CLAMP_TO_EDGE)
            .anisotropy_enable(false)
            .max_anisotropy(1.0)
            .border_color(vk::BorderColor::INT_OPAQUE_BLACK)
            .unnormalized_coordinates(false)
            .compare_enable(false)
            .compare_op(vk::CompareOp::ALWAYS)
            .mipmap_mode(vk::SamplerMipmapMode::LINEAR);

        let sampler = unsafe {
            device.create_sampler(&sampler_info, None)
                .map_err(VulkanError::Api)?
        };

        Ok(Self { device, sampler })
    }

    /// Get sampler handle
    pub fn handle(&self) -> vk::Sampler {
        self.sampler
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_sampler(self.sampler, None);
        }
    }
}

/// Glyph atlas texture: image, view and sampler
///
/// Fields drop in declaration order, which is the reverse of creation order.
pub struct AtlasTexture {
    sampler: Sampler,
    view: ImageView,
    image: Image,
}

impl AtlasTexture {
    /// Create the atlas image and upload `pixels` (one byte per texel, row-major)
    pub fn upload(context: &DeviceContext, pixels: &[u8], width: u32, height: u32) -> VulkanResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(VulkanError::InvalidOperation {
                reason: format!(
                    "atlas pixel buffer holds {} bytes, expected {}x{} = {}",
                    pixels.len(), width, height, expected
                ),
            });
        }

        let extent = vk::Extent2D { width, height };
        let image = Image::new(context, extent, ATLAS_FORMAT)?;

        let staging = Buffer::host_visible(
            context,
            expected as vk::DeviceSize,
            vk::BufferUsageFlags::TRANSFER_SRC,
        )?;
        staging.write_slice(pixels)?;

        submit_one_shot(context, |device, command_buffer| {
            record_layout_transition(
                device,
                command_buffer,
                image.handle(),
                vk::ImageLayout::UNDEFINED,
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            )?;

            let region = vk::BufferImageCopy::builder()
                .buffer_offset(0)
                .buffer_row_length(0)
                .buffer_image_height(0)
                .image_subresource(vk::ImageSubresourceLayers {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    mip_level: 0,
                    base_array_layer: 0,
                    layer_count: 1,
                })
                .image_offset(vk::Offset3D { x: 0, y: 0, z: 0 })
                .image_extent(vk::Extent3D { width, height, depth: 1 });

            unsafe {
                device.cmd_copy_buffer_to_image(
                    command_buffer,
                    staging.handle(),
                    image.handle(),
                    vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                    &[region.build()],
                );
            }

            record_layout_transition(
                device,
                command_buffer,
                image.handle(),
                vk::ImageLayout::TRANSFER_DST_OPTIMAL,
                vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            )
        })?;

        // The transfer has completed, the staging buffer can go
        drop(staging);

        let view = ImageView::new(context.raw_device(), image.handle(), ATLAS_FORMAT)?;
        let sampler = Sampler::linear_clamp(context.raw_device())?;

        log::info!("Font atlas uploaded to GPU: {}x{} R8", width, height);

        Ok(Self { sampler, view, image })
    }

    /// Get the image view for descriptor set binding
    pub fn image_view(&self) -> vk::ImageView {
        self.view.handle()
    }

    /// Get the sampler for descriptor set binding
    pub fn sampler(&self) -> vk::Sampler {
        self.sampler.handle()
    }

    /// Atlas dimensions in texels
    pub fn extent(&self) -> vk::Extent2D {
        self.image.extent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_transitions_supported() {
        let to_dst = layout_transition_masks(
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        ).unwrap();
        assert_eq!(to_dst.src_access, vk::AccessFlags::empty());
        assert_eq!(to_dst.dst_access, vk::AccessFlags::TRANSFER_WRITE);
        assert_eq!(to_dst.src_stage, vk::PipelineStageFlags::TOP_OF_PIPE);
        assert_eq!(to_dst.dst_stage, vk::PipelineStageFlags::TRANSFER);

        let to_read = layout_transition_masks(
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
        ).unwrap();
        assert_eq!(to_read.src_access, vk::AccessFlags::TRANSFER_WRITE);
        assert_eq!(to_read.dst_access, vk::AccessFlags::SHADER_READ);
        assert_eq!(to_read.dst_stage, vk::PipelineStageFlags::FRAGMENT_SHADER);
    }

    #[test]
    fn test_other_transitions_rejected() {
        let cases = [
            (vk::ImageLayout::UNDEFINED, vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL),
            (vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL, vk::ImageLayout::TRANSFER_DST_OPTIMAL),
            (vk::ImageLayout::TRANSFER_DST_OPTIMAL, vk::ImageLayout::GENERAL),
        ];

        for (old, new) in cases {
            match layout_transition_masks(old, new) {
                Err(VulkanError::UnsupportedLayoutTransition { old: o, new: n }) => {
                    assert_eq!(o, old);
                    assert_eq!(n, new);
                }
                other => panic!("expected rejection for {:?} -> {:?}, got {:?}", old, new, other),
            }
        }
    }
}
