//! Vulkan resource wrappers used by the text renderer
//!
//! Thin RAII layers over `ash` handles. Every wrapper owns a clone of the
//! logical device function table and releases its handle on drop.

pub mod buffer;
pub mod commands;
pub mod context;
pub mod descriptor_set;
pub mod shader;
pub mod texture;

pub use buffer::{find_memory_type, Buffer};
pub use commands::{submit_one_shot, SingleTimeCommands};
pub use context::{DeviceContext, VulkanError, VulkanResult};
pub use descriptor_set::{
    write_combined_image_sampler, DescriptorPool, DescriptorSetLayout, DescriptorSetLayoutBuilder,
};
pub use shader::{read_spirv_file, GraphicsPipeline, ShaderModule, VertexInputLayout};
pub use texture::{layout_transition_masks, AtlasTexture, TransitionMasks, ATLAS_FORMAT};
