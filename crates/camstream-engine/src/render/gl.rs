use std::num::NonZeroU32;

use glow::HasContext;

/// `GL_TEXTURE_EXTERNAL_OES` from `OES_EGL_image_external`.
pub const TEXTURE_EXTERNAL_OES: u32 = 0x8D65;

/// The GLES2 calls the frame renderer issues.
///
/// Object names are raw GL names (`0` is never a valid object) and locations are
/// non-negative. Every call requires a context to be current on the calling
/// thread; errors are reported through [`get_error`](GlApi::get_error) and
/// checked by the caller at checkpoints.
pub trait GlApi {
    fn get_error(&self) -> u32;

    fn create_shader(&self, stage: u32) -> Result<u32, String>;
    fn shader_source(&self, shader: u32, source: &str);
    fn compile_shader(&self, shader: u32);
    fn shader_compile_status(&self, shader: u32) -> bool;
    fn shader_info_log(&self, shader: u32) -> String;
    fn delete_shader(&self, shader: u32);

    fn create_program(&self) -> Result<u32, String>;
    fn attach_shader(&self, program: u32, shader: u32);
    fn detach_shader(&self, program: u32, shader: u32);
    fn link_program(&self, program: u32);
    fn program_link_status(&self, program: u32) -> bool;
    fn program_info_log(&self, program: u32) -> String;
    fn delete_program(&self, program: u32);
    fn use_program(&self, program: Option<u32>);
    fn attrib_location(&self, program: u32, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: u32, name: &str) -> Option<u32>;

    fn create_texture(&self) -> Result<u32, String>;
    fn delete_texture(&self, texture: u32);
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: Option<u32>);
    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32);
    /// Uploads tightly packed RGBA8 pixels into level 0 of the bound texture.
    fn tex_image_2d_rgba8(&self, target: u32, width: i32, height: i32, pixels: &[u8]);

    fn create_buffer(&self) -> Result<u32, String>;
    fn delete_buffer(&self, buffer: u32);
    fn bind_array_buffer(&self, buffer: Option<u32>);
    fn array_buffer_data(&self, data: &[u8]);
    /// `stride` and `offset` are in bytes.
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);
    fn enable_vertex_attrib_array(&self, index: u32);

    fn uniform_matrix_4(&self, location: u32, value: &[f32; 16]);

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&self, mask: u32);
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
}

fn nz(name: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(name)
}

// SAFETY (all methods): glow requires a current context on the calling thread.
// The renderer is only driven from the thread that made its surface current,
// and names passed in were produced by the same context or its share group.
impl GlApi for glow::Context {
    fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    fn create_shader(&self, stage: u32) -> Result<u32, String> {
        unsafe { HasContext::create_shader(self, stage).map(|s| s.0.get()) }
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(s) = nz(shader) {
            unsafe { HasContext::shader_source(self, glow::NativeShader(s), source) }
        }
    }

    fn compile_shader(&self, shader: u32) {
        if let Some(s) = nz(shader) {
            unsafe { HasContext::compile_shader(self, glow::NativeShader(s)) }
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        nz(shader).is_some_and(|s| unsafe {
            HasContext::get_shader_compile_status(self, glow::NativeShader(s))
        })
    }

    fn shader_info_log(&self, shader: u32) -> String {
        nz(shader)
            .map(|s| unsafe { HasContext::get_shader_info_log(self, glow::NativeShader(s)) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        if let Some(s) = nz(shader) {
            unsafe { HasContext::delete_shader(self, glow::NativeShader(s)) }
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        unsafe { HasContext::create_program(self).map(|p| p.0.get()) }
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let (Some(p), Some(s)) = (nz(program), nz(shader)) {
            unsafe {
                HasContext::attach_shader(self, glow::NativeProgram(p), glow::NativeShader(s))
            }
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let (Some(p), Some(s)) = (nz(program), nz(shader)) {
            unsafe {
                HasContext::detach_shader(self, glow::NativeProgram(p), glow::NativeShader(s))
            }
        }
    }

    fn link_program(&self, program: u32) {
        if let Some(p) = nz(program) {
            unsafe { HasContext::link_program(self, glow::NativeProgram(p)) }
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        nz(program).is_some_and(|p| unsafe {
            HasContext::get_program_link_status(self, glow::NativeProgram(p))
        })
    }

    fn program_info_log(&self, program: u32) -> String {
        nz(program)
            .map(|p| unsafe { HasContext::get_program_info_log(self, glow::NativeProgram(p)) })
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        if let Some(p) = nz(program) {
            unsafe { HasContext::delete_program(self, glow::NativeProgram(p)) }
        }
    }

    fn use_program(&self, program: Option<u32>) {
        let program = program.and_then(nz).map(glow::NativeProgram);
        unsafe { HasContext::use_program(self, program) }
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        let p = nz(program)?;
        unsafe { HasContext::get_attrib_location(self, glow::NativeProgram(p), name) }
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        let p = nz(program)?;
        unsafe { HasContext::get_uniform_location(self, glow::NativeProgram(p), name) }
            .map(|loc| loc.0)
    }

    fn create_texture(&self) -> Result<u32, String> {
        unsafe { HasContext::create_texture(self).map(|t| t.0.get()) }
    }

    fn delete_texture(&self, texture: u32) {
        if let Some(t) = nz(texture) {
            unsafe { HasContext::delete_texture(self, glow::NativeTexture(t)) }
        }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, unit) }
    }

    fn bind_texture(&self, target: u32, texture: Option<u32>) {
        let texture = texture.and_then(nz).map(glow::NativeTexture);
        unsafe { HasContext::bind_texture(self, target, texture) }
    }

    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32) {
        unsafe { HasContext::tex_parameter_i32(self, target, pname, value) }
    }

    fn tex_image_2d_rgba8(&self, target: u32, width: i32, height: i32, pixels: &[u8]) {
        unsafe {
            HasContext::tex_image_2d(
                self,
                target,
                0,
                glow::RGBA as i32,
                width,
                height,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                Some(pixels),
            )
        }
    }

    fn create_buffer(&self) -> Result<u32, String> {
        unsafe { HasContext::create_buffer(self).map(|b| b.0.get()) }
    }

    fn delete_buffer(&self, buffer: u32) {
        if let Some(b) = nz(buffer) {
            unsafe { HasContext::delete_buffer(self, glow::NativeBuffer(b)) }
        }
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        let buffer = buffer.and_then(nz).map(glow::NativeBuffer);
        unsafe { HasContext::bind_buffer(self, glow::ARRAY_BUFFER, buffer) }
    }

    fn array_buffer_data(&self, data: &[u8]) {
        unsafe {
            HasContext::buffer_data_u8_slice(self, glow::ARRAY_BUFFER, data, glow::STATIC_DRAW)
        }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        unsafe {
            HasContext::vertex_attrib_pointer_f32(
                self,
                index,
                size,
                glow::FLOAT,
                false,
                stride,
                offset,
            )
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { HasContext::enable_vertex_attrib_array(self, index) }
    }

    fn uniform_matrix_4(&self, location: u32, value: &[f32; 16]) {
        let location = glow::NativeUniformLocation(location);
        unsafe { HasContext::uniform_matrix_4_f32_slice(self, Some(&location), false, value) }
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { HasContext::clear_color(self, r, g, b, a) }
    }

    fn clear(&self, mask: u32) {
        unsafe { HasContext::clear(self, mask) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, x, y, width, height) }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        unsafe { HasContext::draw_arrays(self, mode, first, count) }
    }
}
