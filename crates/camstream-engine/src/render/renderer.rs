use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::{Error, Result};
use crate::frame::{FrameQueue, LatestFrameQueue};

use super::check::check_gl;
use super::quad::{self, QuadBuffer};
use super::{
    ClearColor, ExternalTexture, GlApi, Mat4, MatrixSlot, RendererInit, ShaderProgram,
    TextureName,
};

const RESOURCE: &str = "frame renderer";

/// State that other threads may change while the renderer draws.
struct RendererControls {
    mvp: MatrixSlot,
    st: MatrixSlot,
    clear: ArcSwap<ClearColor>,
}

impl RendererControls {
    fn new(clear: ClearColor) -> Self {
        Self {
            mvp: MatrixSlot::default(),
            st: MatrixSlot::default(),
            clear: ArcSwap::from_pointee(clear),
        }
    }
}

/// Thread-safe handle for steering a [`FrameRenderer`] from outside the
/// rendering thread.
///
/// Updates never block the draw path; a draw that already started keeps the
/// snapshots it took.
#[derive(Clone)]
pub struct RendererHandle {
    controls: Arc<RendererControls>,
}

impl RendererHandle {
    /// Replaces the model-view-projection matrix with `update(current)`.
    ///
    /// `update` must be pure; it may run more than once when updates race.
    /// Fails with [`Error::InvalidUpdate`] if it yields no matrix or one whose
    /// length is not 16, leaving the matrix unchanged.
    pub fn update_model_view_projection<F, M>(&self, update: F) -> Result<()>
    where
        F: FnMut(Mat4) -> Option<M>,
        M: AsRef<[f32]>,
    {
        self.controls.mvp.update(update)
    }

    /// Replaces the texture-coordinate matrix with `update(current)`.
    ///
    /// Same contract as [`update_model_view_projection`](Self::update_model_view_projection).
    pub fn update_texture_transform<F, M>(&self, update: F) -> Result<()>
    where
        F: FnMut(Mat4) -> Option<M>,
        M: AsRef<[f32]>,
    {
        self.controls.st.update(update)
    }

    pub fn set_clear_color(&self, color: impl Into<ClearColor>) {
        self.controls.clear.store(Arc::new(color.into()));
    }

    pub fn model_view_projection(&self) -> Mat4 {
        self.controls.mvp.snapshot()
    }

    pub fn texture_transform(&self) -> Mat4 {
        self.controls.st.snapshot()
    }

    pub fn clear_color(&self) -> ClearColor {
        **self.controls.clear.load()
    }
}

impl fmt::Debug for RendererHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererHandle")
            .field("clear_color", &self.clear_color())
            .finish_non_exhaustive()
    }
}

/// Draws the newest captured frame as a full-screen textured quad.
///
/// Owns the shader program, the quad vertex buffer and the texture the frame
/// queue streams into. Every method that touches GL must run on the thread
/// where the owning surface is current.
pub struct FrameRenderer<G: GlApi, Q: FrameQueue = LatestFrameQueue> {
    gl: G,
    program: ShaderProgram,
    quad: QuadBuffer,
    texture: ExternalTexture,
    queue: Q,
    handle: RendererHandle,
    pending_viewport: Option<(i32, i32)>,
}

impl<G: GlApi> FrameRenderer<G, LatestFrameQueue> {
    /// Builds a renderer fed by an in-process [`LatestFrameQueue`].
    ///
    /// The queue uploads from CPU memory, so `init` must use
    /// [`TextureTarget::Texture2D`](super::TextureTarget::Texture2D);
    /// otherwise this fails with [`Error::UnsupportedTarget`] and nothing is
    /// left allocated.
    pub fn new(gl: G, init: &RendererInit) -> Result<Self> {
        Self::with_queue(gl, init, LatestFrameQueue::for_texture)
    }
}

impl<G: GlApi, Q: FrameQueue> FrameRenderer<G, Q> {
    /// Builds a renderer whose texture is fed by the queue `make_queue` returns.
    ///
    /// Objects created before a failing step are deleted before the error is
    /// returned.
    pub fn with_queue<F>(gl: G, init: &RendererInit, make_queue: F) -> Result<Self>
    where
        F: FnOnce(&ExternalTexture) -> Result<Q>,
    {
        let program = ShaderProgram::new(&gl, init.fragment_shader())?;

        let quad = match QuadBuffer::new(&gl) {
            Ok(quad) => quad,
            Err(e) => {
                gl.delete_program(program.name());
                return Err(e);
            }
        };

        let texture = match ExternalTexture::new(&gl, init) {
            Ok(texture) => texture,
            Err(e) => {
                gl.delete_buffer(quad.name());
                gl.delete_program(program.name());
                return Err(e);
            }
        };

        let queue = match make_queue(&texture) {
            Ok(queue) => queue,
            Err(e) => {
                gl.delete_texture(texture.name().0);
                gl.delete_buffer(quad.name());
                gl.delete_program(program.name());
                return Err(e);
            }
        };

        log::info!(
            "frame renderer ready: program {}, texture {} ({:?})",
            program.name(),
            texture.name(),
            texture.target()
        );

        Ok(Self {
            gl,
            program,
            quad,
            texture,
            queue,
            handle: RendererHandle {
                controls: Arc::new(RendererControls::new(init.clear_color)),
            },
            pending_viewport: None,
        })
    }

    /// Returns a cloneable handle for updating matrices and the clear color
    /// from other threads.
    pub fn handle(&self) -> RendererHandle {
        self.handle.clone()
    }

    pub fn gl(&self) -> &G {
        &self.gl
    }

    pub fn program(&self) -> &ShaderProgram {
        &self.program
    }

    /// Texture name the queue streams into, [`TextureName::RELEASED`] after release.
    pub fn texture(&self) -> TextureName {
        self.texture.name()
    }

    /// The frame queue bound to the texture.
    pub fn frame_queue(&self) -> Result<&Q> {
        self.ensure_live()?;
        Ok(&self.queue)
    }

    /// Whether the renderer still has a live texture to draw from.
    pub fn is_ready(&self) -> bool {
        !self.texture.name().is_released()
    }

    /// Presentation timestamp in nanoseconds of the last consumed frame, `0` before the first.
    pub fn latest_timestamp(&self) -> i64 {
        self.queue.timestamp()
    }

    /// Latches the newest available frame into the texture.
    ///
    /// Returns `Ok(false)` if nothing arrived since the last call.
    pub fn update(&mut self) -> Result<bool> {
        self.ensure_live()?;
        self.queue.update_tex_image(&self.gl, &self.texture)
    }

    /// Sets the viewport applied at the start of the next [`draw`](Self::draw).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        self.pending_viewport = Some((clamp(width), clamp(height)));
    }

    /// See [`RendererHandle::update_model_view_projection`].
    pub fn update_model_view_projection<F, M>(&self, update: F) -> Result<()>
    where
        F: FnMut(Mat4) -> Option<M>,
        M: AsRef<[f32]>,
    {
        self.handle.update_model_view_projection(update)
    }

    /// See [`RendererHandle::update_texture_transform`].
    pub fn update_texture_transform<F, M>(&self, update: F) -> Result<()>
    where
        F: FnMut(Mat4) -> Option<M>,
        M: AsRef<[f32]>,
    {
        self.handle.update_texture_transform(update)
    }

    pub fn set_clear_color(&self, color: impl Into<ClearColor>) {
        self.handle.set_clear_color(color);
    }

    pub fn model_view_projection(&self) -> Mat4 {
        self.handle.model_view_projection()
    }

    pub fn texture_transform(&self) -> Mat4 {
        self.handle.texture_transform()
    }

    pub fn clear_color(&self) -> ClearColor {
        self.handle.clear_color()
    }

    /// Clears the surface and draws the current texture through both matrices.
    ///
    /// A GL error at any checkpoint aborts the rest of the pass.
    pub fn draw(&mut self) -> Result<()> {
        self.ensure_live()?;

        let mvp = self.handle.model_view_projection();
        let st = self.handle.texture_transform();
        let clear = self.handle.clear_color();

        let gl: &dyn GlApi = &self.gl;
        let locations = self.program.locations();
        let target = self.texture.target().gl_enum();

        check_gl(gl, "draw start")?;

        if let Some((width, height)) = self.pending_viewport {
            gl.viewport(0, 0, width, height);
            check_gl(gl, "glViewport")?;
            self.pending_viewport = None;
        }

        gl.clear_color(clear.r, clear.g, clear.b, clear.a);
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

        gl.use_program(Some(self.program.name()));
        check_gl(gl, "glUseProgram")?;

        gl.active_texture(glow::TEXTURE0);
        gl.bind_texture(target, Some(self.texture.name().0));
        check_gl(gl, "glBindTexture")?;

        gl.bind_array_buffer(Some(self.quad.name()));

        gl.vertex_attrib_pointer_f32(
            locations.position,
            3,
            quad::STRIDE_BYTES,
            quad::POSITION_OFFSET_BYTES,
        );
        check_gl(gl, "glVertexAttribPointer aPosition")?;
        gl.enable_vertex_attrib_array(locations.position);
        check_gl(gl, "glEnableVertexAttribArray aPosition")?;

        gl.vertex_attrib_pointer_f32(
            locations.texture_coord,
            2,
            quad::STRIDE_BYTES,
            quad::UV_OFFSET_BYTES,
        );
        check_gl(gl, "glVertexAttribPointer aTextureCoord")?;
        gl.enable_vertex_attrib_array(locations.texture_coord);
        check_gl(gl, "glEnableVertexAttribArray aTextureCoord")?;

        gl.uniform_matrix_4(locations.mvp_matrix, &mvp);
        gl.uniform_matrix_4(locations.st_matrix, &st);
        check_gl(gl, "glUniformMatrix4fv")?;

        gl.draw_arrays(glow::TRIANGLE_STRIP, 0, quad::QUAD_VERTEX_COUNT);
        check_gl(gl, "glDrawArrays")?;

        gl.bind_texture(target, None);
        gl.bind_array_buffer(None);
        check_gl(gl, "unbind texture")?;

        Ok(())
    }

    /// Gives up the texture and detaches the frame queue.
    ///
    /// Issues no GL calls, so it is safe after the owning context is gone.
    pub fn release(&mut self) -> Result<()> {
        self.ensure_live()?;
        let name = self.texture.name();
        self.texture.mark_released();
        self.queue.release();
        log::info!("frame renderer released (texture {name})");
        Ok(())
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(Error::UseAfterRelease { resource: RESOURCE })
        }
    }
}

impl<G: GlApi, Q: FrameQueue> fmt::Debug for FrameRenderer<G, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameRenderer")
            .field("program", &self.program)
            .field("texture", &self.texture)
            .field("latest_timestamp", &self.latest_timestamp())
            .field("pending_viewport", &self.pending_viewport)
            .finish_non_exhaustive()
    }
}
