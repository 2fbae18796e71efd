use super::{ClearColor, TextureTarget};

/// Construction parameters for a [`FrameRenderer`](super::FrameRenderer).
///
/// Video frames commonly arrive with non-power-of-two sizes, so the texture is
/// never mipmapped and never wraps.
#[derive(Debug, Clone)]
pub struct RendererInit {
    /// Target the frame queue streams into.
    pub texture_target: TextureTarget,

    /// `GL_TEXTURE_MIN_FILTER` value.
    pub min_filter: u32,

    /// `GL_TEXTURE_MAG_FILTER` value.
    pub mag_filter: u32,

    /// `GL_TEXTURE_WRAP_S` / `GL_TEXTURE_WRAP_T` value.
    pub wrap: u32,

    /// Clear color until the first `set_clear_color`.
    pub clear_color: ClearColor,
}

impl Default for RendererInit {
    fn default() -> Self {
        Self {
            texture_target: TextureTarget::External,
            min_filter: glow::NEAREST,
            mag_filter: glow::LINEAR,
            wrap: glow::CLAMP_TO_EDGE,
            clear_color: ClearColor::default(),
        }
    }
}

impl RendererInit {
    /// Defaults for CPU-uploaded frames (`GL_TEXTURE_2D`).
    pub fn texture_2d() -> Self {
        Self {
            texture_target: TextureTarget::Texture2D,
            ..Self::default()
        }
    }

    pub(crate) fn fragment_shader(&self) -> &'static str {
        match self.texture_target {
            TextureTarget::External => super::program::FRAGMENT_SHADER_EXTERNAL,
            TextureTarget::Texture2D => super::program::FRAGMENT_SHADER_2D,
        }
    }
}
