use std::fmt;

use crate::error::{Error, Result};

use super::check::check_gl;
use super::GlApi;

/// Applies the MVP transform to the position and the texture transform to the UV.
pub(crate) const VERTEX_SHADER: &str = "\
uniform mat4 uMVPMatrix;
uniform mat4 uSTMatrix;
attribute vec4 aPosition;
attribute vec4 aTextureCoord;
varying vec2 vTextureCoord;
void main() {
    gl_Position = uMVPMatrix * aPosition;
    vTextureCoord = (uSTMatrix * aTextureCoord).xy;
}
";

/// Samples an `OES_EGL_image_external` texture.
pub(crate) const FRAGMENT_SHADER_EXTERNAL: &str = "\
#extension GL_OES_EGL_image_external : require
precision mediump float;
varying vec2 vTextureCoord;
uniform samplerExternalOES sTexture;
void main() {
    gl_FragColor = texture2D(sTexture, vTextureCoord);
}
";

/// Samples a plain 2D texture (CPU-uploaded frames).
pub(crate) const FRAGMENT_SHADER_2D: &str = "\
precision mediump float;
varying vec2 vTextureCoord;
uniform sampler2D sTexture;
void main() {
    gl_FragColor = texture2D(sTexture, vTextureCoord);
}
";

pub(crate) const ATTR_POSITION: &str = "aPosition";
pub(crate) const ATTR_TEXTURE_COORD: &str = "aTextureCoord";
pub(crate) const UNIFORM_MVP: &str = "uMVPMatrix";
pub(crate) const UNIFORM_ST: &str = "uSTMatrix";

/// Shader pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Attribute and uniform locations resolved at link time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Locations {
    pub position: u32,
    pub texture_coord: u32,
    pub mvp_matrix: u32,
    pub st_matrix: u32,
}

/// Linked GLES2 program plus its location table.
///
/// Immutable after construction.
#[derive(Debug)]
pub struct ShaderProgram {
    name: u32,
    locations: Locations,
}

impl ShaderProgram {
    /// Compiles [`VERTEX_SHADER`] with `fragment_source`, links them and resolves
    /// every location the renderer uses.
    pub fn new(gl: &dyn GlApi, fragment_source: &str) -> Result<Self> {
        let vertex = compile(gl, ShaderStage::Vertex, VERTEX_SHADER)?;
        let fragment = match compile(gl, ShaderStage::Fragment, fragment_source) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let linked = link(gl, vertex, fragment);

        gl.delete_shader(vertex);
        gl.delete_shader(fragment);

        let name = linked?;

        let locations = match resolve_locations(gl, name) {
            Ok(locations) => locations,
            Err(e) => {
                gl.delete_program(name);
                return Err(e);
            }
        };

        log::debug!("shader program {name} linked: {locations:?}");

        Ok(Self { name, locations })
    }

    /// GL program name.
    pub fn name(&self) -> u32 {
        self.name
    }

    pub fn locations(&self) -> Locations {
        self.locations
    }
}

fn compile(gl: &dyn GlApi, stage: ShaderStage, source: &str) -> Result<u32> {
    let shader = gl.create_shader(stage.gl_enum()).map_err(|log| Error::ShaderCompile {
        stage,
        log: format!("glCreateShader failed: {log}"),
    })?;
    check_gl(gl, &format!("glCreateShader({stage})"))?;

    gl.shader_source(shader, source);
    gl.compile_shader(shader);

    if !gl.shader_compile_status(shader) {
        let log = gl.shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(Error::ShaderCompile { stage, log });
    }

    Ok(shader)
}

fn link(gl: &dyn GlApi, vertex: u32, fragment: u32) -> Result<u32> {
    let program = gl
        .create_program()
        .map_err(|log| Error::ProgramLink { log: format!("glCreateProgram failed: {log}") })?;

    let attached = attach(gl, program, vertex, "glAttachShader(program, vertexShader)")
        .and_then(|()| attach(gl, program, fragment, "glAttachShader(program, fragmentShader)"));
    if let Err(e) = attached {
        gl.delete_program(program);
        return Err(e);
    }

    gl.link_program(program);

    gl.detach_shader(program, vertex);
    gl.detach_shader(program, fragment);

    if !gl.program_link_status(program) {
        let log = gl.program_info_log(program);
        gl.delete_program(program);
        return Err(Error::ProgramLink { log });
    }

    Ok(program)
}

fn attach(gl: &dyn GlApi, program: u32, shader: u32, operation: &str) -> Result<()> {
    gl.attach_shader(program, shader);
    check_gl(gl, operation)
}

fn resolve_locations(gl: &dyn GlApi, program: u32) -> Result<Locations> {
    let attribute = |name: &str| {
        gl.attrib_location(program, name)
            .ok_or_else(|| Error::LocationNotFound { name: name.to_owned() })
    };
    let uniform = |name: &str| {
        gl.uniform_location(program, name)
            .ok_or_else(|| Error::LocationNotFound { name: name.to_owned() })
    };

    Ok(Locations {
        position: attribute(ATTR_POSITION)?,
        texture_coord: attribute(ATTR_TEXTURE_COORD)?,
        mvp_matrix: uniform(UNIFORM_MVP)?,
        st_matrix: uniform(UNIFORM_ST)?,
    })
}
