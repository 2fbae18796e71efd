use std::fmt;

use crate::error::{Error, Result};

use super::check::check_gl;
use super::gl::TEXTURE_EXTERNAL_OES;
use super::{GlApi, GlCode, RendererInit};

/// Texture target the frame queue streams into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureTarget {
    /// `GL_TEXTURE_EXTERNAL_OES`: frames arrive as EGL images from a platform queue.
    External,
    /// `GL_TEXTURE_2D`: frames are uploaded from CPU memory.
    Texture2D,
}

impl TextureTarget {
    pub fn gl_enum(self) -> u32 {
        match self {
            TextureTarget::External => TEXTURE_EXTERNAL_OES,
            TextureTarget::Texture2D => glow::TEXTURE_2D,
        }
    }
}

/// GL texture name. `TextureName::RELEASED` marks a texture that was given up.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureName(pub u32);

impl TextureName {
    /// `0` is never handed out by `glGenTextures`.
    pub const RELEASED: Self = Self(0);

    pub fn is_released(self) -> bool {
        self == Self::RELEASED
    }
}

impl fmt::Display for TextureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_released() {
            f.write_str("<released>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Texture the frame queue writes into and the renderer samples from.
#[derive(Debug)]
pub struct ExternalTexture {
    name: TextureName,
    target: TextureTarget,
}

impl ExternalTexture {
    /// Allocates a texture name and applies the sampling parameters from `init`.
    pub(crate) fn new(gl: &dyn GlApi, init: &RendererInit) -> Result<Self> {
        let name = gl.create_texture().map_err(|log| Error::Graphics {
            code: GlCode::OUT_OF_MEMORY,
            operation: format!("glGenTextures: {log}"),
        })?;

        if let Err(e) = configure(gl, name, init) {
            gl.bind_texture(init.texture_target.gl_enum(), None);
            gl.delete_texture(name);
            return Err(e);
        }

        Ok(Self {
            name: TextureName(name),
            target: init.texture_target,
        })
    }

    pub fn name(&self) -> TextureName {
        self.name
    }

    pub fn target(&self) -> TextureTarget {
        self.target
    }

    pub(crate) fn mark_released(&mut self) {
        self.name = TextureName::RELEASED;
    }
}

fn configure(gl: &dyn GlApi, name: u32, init: &RendererInit) -> Result<()> {
    let target = init.texture_target.gl_enum();

    gl.bind_texture(target, Some(name));
    check_gl(gl, "glBindTexture textureId")?;

    gl.tex_parameter_i32(target, glow::TEXTURE_MIN_FILTER, init.min_filter as i32);
    gl.tex_parameter_i32(target, glow::TEXTURE_MAG_FILTER, init.mag_filter as i32);
    gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_S, init.wrap as i32);
    gl.tex_parameter_i32(target, glow::TEXTURE_WRAP_T, init.wrap as i32);
    check_gl(gl, "glTexParameter")?;

    gl.bind_texture(target, None);
    Ok(())
}
