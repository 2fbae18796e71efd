//! Full-screen quad geometry.

use bytemuck::{Pod, Zeroable};

use crate::error::{Error, Result};

use super::check::check_gl;
use super::GlApi;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct QuadVertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
}

const FLOAT_SIZE: i32 = std::mem::size_of::<f32>() as i32;

/// Floats per vertex (X, Y, Z, U, V).
pub const VERTEX_STRIDE_FLOATS: i32 = 5;
pub const POSITION_OFFSET_FLOATS: i32 = 0;
pub const UV_OFFSET_FLOATS: i32 = 3;

pub(crate) const STRIDE_BYTES: i32 = VERTEX_STRIDE_FLOATS * FLOAT_SIZE;
pub(crate) const POSITION_OFFSET_BYTES: i32 = POSITION_OFFSET_FLOATS * FLOAT_SIZE;
pub(crate) const UV_OFFSET_BYTES: i32 = UV_OFFSET_FLOATS * FLOAT_SIZE;

/// Two triangles sharing the diagonal, drawn as a 4-vertex strip.
pub(crate) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, -1.0, 0.0], uv: [0.0, 0.0] },
    QuadVertex { pos: [1.0, -1.0, 0.0], uv: [1.0, 0.0] },
    QuadVertex { pos: [-1.0, 1.0, 0.0], uv: [0.0, 1.0] },
    QuadVertex { pos: [1.0, 1.0, 0.0], uv: [1.0, 1.0] },
];

pub(crate) const QUAD_VERTEX_COUNT: i32 = QUAD_VERTICES.len() as i32;

/// Vertex buffer holding [`QUAD_VERTICES`].
#[derive(Debug)]
pub(crate) struct QuadBuffer {
    name: u32,
}

impl QuadBuffer {
    pub(crate) fn new(gl: &dyn GlApi) -> Result<Self> {
        let name = gl.create_buffer().map_err(|log| Error::Graphics {
            code: super::GlCode::OUT_OF_MEMORY,
            operation: format!("glGenBuffers: {log}"),
        })?;

        gl.bind_array_buffer(Some(name));
        gl.array_buffer_data(bytemuck::cast_slice(&QUAD_VERTICES));
        gl.bind_array_buffer(None);
        check_gl(gl, "glBufferData quad")?;

        Ok(Self { name })
    }

    pub(crate) fn name(&self) -> u32 {
        self.name
    }
}
