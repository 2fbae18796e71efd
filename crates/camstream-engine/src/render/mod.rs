//! GLES2 frame rendering.
//!
//! [`FrameRenderer`] owns one shader program, one full-screen quad and one
//! texture fed by a frame queue. It talks to GL only through [`GlApi`], which
//! is implemented for `glow::Context`.
//!
//! Convention:
//! - geometry is in clip space, the quad covers [-1, 1]² at z = 0.
//! - matrices are column-major `[f32; 16]`, uploaded untransposed.

pub(crate) mod check;
mod color;
mod gl;
mod init;
mod matrix;
mod program;
pub mod quad;
mod renderer;
mod texture;

pub use check::GlCode;
pub use color::ClearColor;
pub use gl::{GlApi, TEXTURE_EXTERNAL_OES};
pub use init::RendererInit;
pub use matrix::{multiply, rotate_z, scale, Mat4, MatrixSlot, IDENTITY};
pub use program::{Locations, ShaderProgram, ShaderStage};
pub use renderer::{FrameRenderer, RendererHandle};
pub use texture::{ExternalTexture, TextureName, TextureTarget};
