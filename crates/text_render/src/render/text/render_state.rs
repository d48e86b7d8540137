//! GPU-resident text resources
//!
//! Everything the text pipeline needs on the device, created once and released
//! together. Creation order: atlas image, view and sampler; descriptor set
//! layout; descriptor pool and set; vertex buffer; later the pipeline layout
//! and pipeline. Release runs in exactly the reverse order.

use ash::{vk, Device};

use crate::core::config::ShaderConfig;
use crate::render::vulkan::{
    read_spirv_file, write_combined_image_sampler, AtlasTexture, Buffer, DescriptorPool,
    DescriptorSetLayout, DescriptorSetLayoutBuilder, DeviceContext, GraphicsPipeline,
    ShaderModule, VertexInputLayout, VulkanError,
};

use super::backend::{TextColor, TextRenderBackend};
use super::error::{check_vertex_capacity, TextError, TextResult};
use super::font_atlas::AtlasBitmap;
use super::text_layout::TextVertex;

const ATLAS_BINDING: u32 = 0;

/// Vulkan objects backing one text renderer
pub struct TextRenderState {
    device: Device,
    shaders: ShaderConfig,
    max_vertices: usize,
    descriptor_set: vk::DescriptorSet,
    pipeline: Option<GraphicsPipeline>,
    vertex_buffer: Option<Buffer>,
    descriptor_pool: Option<DescriptorPool>,
    descriptor_layout: Option<DescriptorSetLayout>,
    atlas: Option<AtlasTexture>,
}

impl TextRenderState {
    /// Upload the atlas and create every resource except the pipeline
    ///
    /// If any step fails, the objects created before it are released before the
    /// error is returned.
    pub fn new(
        context: &DeviceContext,
        bitmap: &AtlasBitmap,
        max_vertices: usize,
        shaders: ShaderConfig,
    ) -> TextResult<Self> {
        let device = context.raw_device();

        let atlas = AtlasTexture::upload(context, bitmap.as_bytes(), bitmap.width(), bitmap.height())
            .map_err(TextError::resource("atlas texture"))?;

        let descriptor_layout = DescriptorSetLayoutBuilder::new()
            .add_combined_image_sampler(ATLAS_BINDING, vk::ShaderStageFlags::FRAGMENT)
            .build(&device)
            .map_err(TextError::resource("descriptor set layout"))?;

        let descriptor_pool = DescriptorPool::for_layout(device.clone(), &descriptor_layout, 1)
            .map_err(TextError::resource("descriptor pool"))?;
        let descriptor_set = descriptor_pool
            .allocate(&descriptor_layout)
            .map_err(TextError::resource("descriptor set"))?;
        write_combined_image_sampler(
            &device,
            descriptor_set,
            ATLAS_BINDING,
            atlas.image_view(),
            atlas.sampler(),
        );

        let buffer_size = (max_vertices * std::mem::size_of::<TextVertex>()) as vk::DeviceSize;
        let vertex_buffer =
            Buffer::host_visible(context, buffer_size, vk::BufferUsageFlags::VERTEX_BUFFER)
                .map_err(TextError::resource("vertex buffer"))?;

        log::info!(
            "Text resources ready: {}x{} atlas, {} vertex capacity",
            bitmap.width(),
            bitmap.height(),
            max_vertices
        );

        Ok(Self {
            device,
            shaders,
            max_vertices,
            descriptor_set,
            pipeline: None,
            vertex_buffer: Some(vertex_buffer),
            descriptor_pool: Some(descriptor_pool),
            descriptor_layout: Some(descriptor_layout),
            atlas: Some(atlas),
        })
    }

    /// Build the pipeline for `render_pass`, replacing any previous one
    ///
    /// The old pipeline stays in place if the rebuild fails.
    pub fn create_pipeline(
        &mut self,
        render_pass: vk::RenderPass,
        extent: vk::Extent2D,
    ) -> TextResult<()> {
        let set_layout = self
            .descriptor_layout
            .as_ref()
            .map(DescriptorSetLayout::handle)
            .ok_or_else(|| TextError::ResourceCreation {
                resource: "text pipeline",
                source: torn_down(),
            })?;

        let vertex_shader = self.load_shader(&self.shaders.vertex_shader_path)?;
        let fragment_shader = self.load_shader(&self.shaders.fragment_shader_path)?;

        let vertex_input = VertexInputLayout {
            stride: std::mem::size_of::<TextVertex>() as u32,
            position_offset: 0,
            uv_offset: 8,
        };

        let pipeline = GraphicsPipeline::new_text_pipeline(
            self.device.clone(),
            render_pass,
            extent,
            &vertex_shader,
            &fragment_shader,
            set_layout,
            vertex_input,
            std::mem::size_of::<TextColor>() as u32,
        )
        .map_err(TextError::resource("text pipeline"))?;

        // Assigning drops the previous pipeline and layout
        self.pipeline = Some(pipeline);

        log::info!("Text pipeline built for {}x{}", extent.width, extent.height);
        Ok(())
    }

    fn load_shader(&self, path: &str) -> TextResult<ShaderModule> {
        let code = read_spirv_file(path).map_err(|e| TextError::ShaderLoad {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        ShaderModule::from_words(self.device.clone(), &code).map_err(|e| TextError::ShaderLoad {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Release every resource in reverse creation order
    ///
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.atlas.is_none() {
            return;
        }

        drop(self.pipeline.take());
        drop(self.vertex_buffer.take());
        drop(self.descriptor_pool.take());
        self.descriptor_set = vk::DescriptorSet::null();
        drop(self.descriptor_layout.take());
        drop(self.atlas.take());

        log::info!("Text resources released");
    }

    /// True once `teardown` has run
    pub fn is_torn_down(&self) -> bool {
        self.atlas.is_none()
    }

    /// True when a pipeline has been built
    pub fn has_pipeline(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Atlas dimensions, if resources are alive
    pub fn atlas_extent(&self) -> Option<vk::Extent2D> {
        self.atlas.as_ref().map(AtlasTexture::extent)
    }
}

impl TextRenderBackend for TextRenderState {
    fn vertex_capacity(&self) -> usize {
        self.max_vertices
    }

    fn upload_vertices(&mut self, vertices: &[TextVertex]) -> TextResult<()> {
        check_vertex_capacity(vertices.len(), self.max_vertices)?;
        let buffer = self.vertex_buffer.as_ref().ok_or_else(|| TextError::ResourceCreation {
            resource: "vertex buffer",
            source: torn_down(),
        })?;
        buffer
            .write_slice(vertices)
            .map_err(TextError::resource("vertex buffer mapping"))
    }

    fn bind(&mut self, command_buffer: vk::CommandBuffer) -> TextResult<()> {
        let pipeline = self.pipeline.as_ref().ok_or(TextError::PipelineMissing)?;
        let vertex_buffer = self.vertex_buffer.as_ref().ok_or(TextError::PipelineMissing)?;

        unsafe {
            self.device.cmd_bind_pipeline(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                pipeline.handle(),
            );
            self.device.cmd_bind_descriptor_sets(
                command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                pipeline.layout(),
                0,
                &[self.descriptor_set],
                &[],
            );
            self.device
                .cmd_bind_vertex_buffers(command_buffer, 0, &[vertex_buffer.handle()], &[0]);
        }
        Ok(())
    }

    fn push_color(&mut self, command_buffer: vk::CommandBuffer, color: TextColor) {
        let Some(pipeline) = self.pipeline.as_ref() else {
            return;
        };
        unsafe {
            self.device.cmd_push_constants(
                command_buffer,
                pipeline.layout(),
                vk::ShaderStageFlags::FRAGMENT,
                0,
                bytemuck::bytes_of(&color),
            );
        }
    }

    fn draw(&mut self, command_buffer: vk::CommandBuffer, vertex_count: u32, first_vertex: u32) {
        unsafe {
            self.device
                .cmd_draw(command_buffer, vertex_count, 1, first_vertex, 0);
        }
    }
}

impl Drop for TextRenderState {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn torn_down() -> VulkanError {
    VulkanError::InvalidOperation {
        reason: "text resources have been torn down".to_string(),
    }
}
