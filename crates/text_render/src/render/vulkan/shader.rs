//! SPIR-V shader loading and the text graphics pipeline

use ash::{vk, Device};
use std::ffi::CStr;
use std::fs::File;
use std::path::Path;
use crate::render::vulkan::{VulkanError, VulkanResult};

const ENTRY_POINT: &CStr = unsafe { CStr::from_bytes_with_nul_unchecked(b"main\0") };

/// Read a SPIR-V binary, validating size and magic number
pub fn read_spirv_file<P: AsRef<Path>>(path: P) -> std::io::Result<Vec<u32>> {
    let mut file = File::open(path)?;
    ash::util::read_spv(&mut file)
}

/// Shader module wrapper with RAII cleanup
pub struct ShaderModule {
    device: Device,
    module: vk::ShaderModule,
}

impl ShaderModule {
    /// Create shader module from SPIR-V words
    pub fn from_words(device: Device, code: &[u32]) -> VulkanResult<Self> {
        let create_info = vk::ShaderModuleCreateInfo::builder()
            .code(code);

        let module = unsafe {
            device.create_shader_module(&create_info, None)
                .map_err(VulkanError::Api)?
        };

        Ok(Self { device, module })
    }

    /// Get shader module handle
    pub fn handle(&self) -> vk::ShaderModule {
        self.module
    }
}

impl Drop for ShaderModule {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_shader_module(self.module, None);
        }
    }
}

/// Vertex input description of the text pipeline
#[derive(Debug, Clone, Copy)]
pub struct VertexInputLayout {
    /// Bytes between consecutive vertices
    pub stride: u32,
    /// Byte offset of the `vec2` position attribute (location 0)
    pub position_offset: u32,
    /// Byte offset of the `vec2` texture coordinate attribute (location 1)
    pub uv_offset: u32,
}

/// Graphics pipeline and its layout, destroyed together
pub struct GraphicsPipeline {
    device: Device,
    pipeline: vk::Pipeline,
    layout: vk::PipelineLayout,
}

impl GraphicsPipeline {
    /// Build the alpha-blended text pipeline
    ///
    /// Viewport and scissor are baked to `extent`; the extent is also handed to the
    /// vertex shader as specialization constants 0 and 1 for the pixel-to-clip mapping.
    /// The layout carries one descriptor set and `push_constant_size` bytes of
    /// fragment push constants.
    pub fn new_text_pipeline(
        device: Device,
        render_pass: vk::RenderPass,
        extent: vk::Extent2D,
        vertex_shader: &ShaderModule,
        fragment_shader: &ShaderModule,
        set_layout: vk::DescriptorSetLayout,
        vertex_input: VertexInputLayout,
        push_constant_size: u32,
    ) -> VulkanResult<Self> {
        let viewport_size = [extent.width as f32, extent.height as f32];
        let specialization_entries = [
            vk::SpecializationMapEntry { constant_id: 0, offset: 0, size: 4 },
            vk::SpecializationMapEntry { constant_id: 1, offset: 4, size: 4 },
        ];
        let specialization_info = vk::SpecializationInfo::builder()
            .map_entries(&specialization_entries)
            .data(bytemuck::cast_slice(&viewport_size));

        let shader_stages = [
            vk::PipelineShaderStageCreateInfo::builder()
                .stage(vk::ShaderStageFlags::VERTEX)
                .module(vertex_shader.handle())
                .name(ENTRY_POINT)
                .specialization_info(&specialization_info)
                .build(),
            vk::PipelineShaderStageCreateInfo::builder()
                .stage(vk::ShaderStageFlags::FRAGMENT)
                .module(fragment_shader.handle())
                .name(ENTRY_POINT)
                .build(),
        ];

        let binding_description = vk::VertexInputBindingDescription::builder()
            .binding(0)
            .stride(vertex_input.stride)
            .input_rate(vk::VertexInputRate::VERTEX)
            .build();

        let attribute_descriptions = [
            vk::VertexInputAttributeDescription::builder()
                .location(0)
                .binding(0)
                .format(vk::Format::R32G32_SFLOAT)
                .offset(vertex_input.position_offset)
                .build(),
            vk::VertexInputAttributeDescription::builder()
                .location(1)
                .binding(0)
                .format(vk::Format::R32G32_SFLOAT)
                .offset(vertex_input.uv_offset)
                .build(),
        ];

        let vertex_input_info = vk::PipelineVertexInputStateCreateInfo::builder()
            .vertex_binding_descriptions(std::slice::from_ref(&binding_description))
            .vertex_attribute_descriptions(&attribute_descriptions);

        let input_assembly = vk::PipelineInputAssemblyStateCreateInfo::builder()
            .topology(vk::PrimitiveTopology::TRIANGLE_LIST)
            .primitive_restart_enable(false);

        let viewports = [vk::Viewport {
            x: 0.0,
            y: 0.0,
            width: extent.width as f32,
            height: extent.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }];
        let scissors = [vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        }];
        let viewport_state = vk::PipelineViewportStateCreateInfo::builder()
            .viewports(&viewports)
            .scissors(&scissors);

        let rasterizer = vk::PipelineRasterizationStateCreateInfo::builder()
            .depth_clamp_enable(false)
            .rasterizer_discard_enable(false)
            .polygon_mode(vk::PolygonMode::FILL)
            .line_width(1.0)
            .cull_mode(vk::CullModeFlags::NONE)
            .front_face(vk::FrontFace::COUNTER_CLOCKWISE)
            .depth_bias_enable(false);

        let multisampling = vk::PipelineMultisampleStateCreateInfo::builder()
            .sample_shading_enable(false)
            .rasterization_samples(vk::SampleCountFlags::TYPE_1);

        // Glyph coverage arrives in alpha, blend over whatever is already drawn
        let color_blend_attachment = vk::PipelineColorBlendAttachmentState::builder()
            .color_write_mask(vk::ColorComponentFlags::RGBA)
            .blend_enable(true)
            .src_color_blend_factor(vk::BlendFactor::SRC_ALPHA)
            .dst_color_blend_factor(vk::BlendFactor::ONE_MINUS_SRC_ALPHA)
            .color_blend_op(vk::BlendOp::ADD)
            .src_alpha_blend_factor(vk::BlendFactor::ONE)
            .dst_alpha_blend_factor(vk::BlendFactor::ZERO)
            .alpha_blend_op(vk::BlendOp::ADD)
            .build();

        let color_blend_attachments = [color_blend_attachment];
        let color_blending = vk::PipelineColorBlendStateCreateInfo::builder()
            .logic_op_enable(false)
            .attachments(&color_blend_attachments);

        let push_constant_range = vk::PushConstantRange {
            stage_flags: vk::ShaderStageFlags::FRAGMENT,
            offset: 0,
            size: push_constant_size,
        };

        let set_layouts = [set_layout];
        let layout_info = vk::PipelineLayoutCreateInfo::builder()
            .set_layouts(&set_layouts)
            .push_constant_ranges(std::slice::from_ref(&push_constant_range));

        let layout = unsafe {
            device.create_pipeline_layout(&layout_info, None)
                .map_err(VulkanError::Api)?
        };

        let pipeline_info = vk::GraphicsPipelineCreateInfo::builder()
            .stages(&shader_stages)
            .vertex_input_state(&vertex_input_info)
            .input_assembly_state(&input_assembly)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterizer)
            .multisample_state(&multisampling)
            .color_blend_state(&color_blending)
            .layout(layout)
            .render_pass(render_pass)
            .subpass(0);

        let pipelines = unsafe {
            device.create_graphics_pipelines(
                vk::PipelineCache::null(),
                &[pipeline_info.build()],
                None,
            )
        };

        let pipeline = match pipelines {
            Ok(pipelines) => pipelines[0],
            Err((_, err)) => {
                unsafe { device.destroy_pipeline_layout(layout, None) };
                return Err(VulkanError::Api(err));
            }
        };

        Ok(Self {
            device,
            pipeline,
            layout,
        })
    }

    /// Get pipeline handle
    pub fn handle(&self) -> vk::Pipeline {
        self.pipeline
    }

    /// Get layout handle
    pub fn layout(&self) -> vk::PipelineLayout {
        self.layout
    }
}

impl Drop for GraphicsPipeline {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_pipeline(self.pipeline, None);
            self.device.destroy_pipeline_layout(self.layout, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("text_render_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_read_spirv_file_accepts_valid_words() {
        let path = temp_path("valid.spv");
        let words: [u32; 3] = [0x0723_0203, 0x0001_0000, 0];
        std::fs::File::create(&path)
            .unwrap()
            .write_all(bytemuck::cast_slice(&words))
            .unwrap();

        let code = read_spirv_file(&path).unwrap();
        assert_eq!(code, words);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_read_spirv_file_rejects_truncated() {
        let path = temp_path("truncated.spv");
        std::fs::write(&path, [0x03u8, 0x02, 0x23, 0x07, 0x00]).unwrap();

        assert!(read_spirv_file(&path).is_err());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_read_spirv_file_missing() {
        let err = read_spirv_file(temp_path("does_not_exist.spv")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
