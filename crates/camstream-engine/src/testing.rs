//! In-memory EGL and GLES stand-ins for unit tests.
//!
//! One [`FakeDriver`] models a single display plus the GL objects of every
//! context created on it. Calls are recorded so tests can assert on ordering,
//! and failures can be injected per operation.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::device::{EglApi, EglCode};
use crate::render::{GlApi, Mat4, TEXTURE_EXTERNAL_OES};

const DISPLAY: u32 = 1;
const CONFIG: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EglCall {
    GetDisplay,
    Initialize,
    ChooseConfig(Vec<i32>),
    CreateContext { context: u32, share: Option<u32> },
    CreateSurface { surface: u32, window: u32 },
    MakeCurrent { surface: Option<u32>, context: Option<u32> },
    DestroySurface(u32),
    DestroyContext(u32),
    ReleaseThread,
    Terminate,
    PresentationTime { surface: u32, nanos: i64 },
    SwapBuffers(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GlCall {
    ClearColor([f32; 4]),
    Clear(u32),
    Viewport { x: i32, y: i32, width: i32, height: i32 },
    UseProgram(Option<u32>),
    ActiveTexture(u32),
    BindTexture { target: u32, texture: Option<u32> },
    TexParameter { target: u32, pname: u32, value: i32 },
    TexImage2d { target: u32, width: i32, height: i32, len: usize },
    BindArrayBuffer(Option<u32>),
    ArrayBufferData(usize),
    VertexAttribPointer { index: u32, size: i32, stride: i32, offset: i32 },
    EnableVertexAttribArray(u32),
    UniformMatrix4 { location: u32, value: Mat4 },
    DrawArrays { mode: u32, first: i32, count: i32 },
}

struct DriverState {
    // EGL
    display_available: bool,
    reject_configs: bool,
    presentation_ext: bool,
    initialized: bool,
    next_egl: u32,
    contexts: HashMap<u32, u32>,
    surfaces: HashSet<u32>,
    current: Option<(Option<u32>, u32)>,
    pending_presentation: HashMap<u32, i64>,
    swaps: Vec<(u32, Option<i64>)>,
    egl_failures: HashMap<&'static str, i32>,
    egl_calls: Vec<EglCall>,

    // GL
    next_gl: u32,
    gl_errors: VecDeque<u32>,
    gl_failures: HashMap<&'static str, u32>,
    compile_failures: HashMap<u32, String>,
    link_failure: Option<String>,
    hidden_locations: HashSet<String>,
    shaders: HashMap<u32, u32>,
    programs: HashSet<u32>,
    textures: HashMap<u32, Option<u32>>,
    gl_calls: Vec<GlCall>,
}

impl DriverState {
    fn new() -> Self {
        Self {
            display_available: true,
            reject_configs: false,
            presentation_ext: true,
            initialized: false,
            next_egl: 100,
            contexts: HashMap::new(),
            surfaces: HashSet::new(),
            current: None,
            pending_presentation: HashMap::new(),
            swaps: Vec::new(),
            egl_failures: HashMap::new(),
            egl_calls: Vec::new(),

            next_gl: 1,
            gl_errors: VecDeque::new(),
            gl_failures: HashMap::new(),
            compile_failures: HashMap::new(),
            link_failure: None,
            hidden_locations: HashSet::new(),
            shaders: HashMap::new(),
            programs: HashSet::new(),
            textures: HashMap::new(),
            gl_calls: Vec::new(),
        }
    }

    fn egl_name(&mut self) -> u32 {
        self.next_egl += 1;
        self.next_egl
    }

    fn gl_name(&mut self) -> u32 {
        let name = self.next_gl;
        self.next_gl += 1;
        name
    }

    fn injected_egl(&mut self, op: &'static str) -> Result<(), EglCode> {
        match self.egl_failures.remove(op) {
            Some(code) => Err(EglCode(code)),
            None => Ok(()),
        }
    }

    fn gl(&mut self, op: &'static str, call: Option<GlCall>) {
        if let Some(call) = call {
            self.gl_calls.push(call);
        }
        if let Some(code) = self.gl_failures.remove(op) {
            self.gl_errors.push_back(code);
        }
    }

    fn current_share_group(&self) -> Option<u32> {
        let (_, context) = self.current?;
        self.contexts.get(&context).copied()
    }
}

/// Shared fake EGL display and GL object space.
#[derive(Clone)]
pub(crate) struct FakeDriver {
    state: Rc<RefCell<DriverState>>,
}

impl FakeDriver {
    pub(crate) fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(DriverState::new())),
        }
    }

    pub(crate) fn egl(&self) -> FakeEgl {
        FakeEgl(self.clone())
    }

    pub(crate) fn gl(&self) -> FakeGl {
        FakeGl(self.clone())
    }

    // ── EGL knobs ─────────────────────────────────────────────────────────

    pub(crate) fn remove_display(&self) {
        self.state.borrow_mut().display_available = false;
    }

    pub(crate) fn reject_configs(&self) {
        self.state.borrow_mut().reject_configs = true;
    }

    pub(crate) fn without_presentation_ext(&self) {
        self.state.borrow_mut().presentation_ext = false;
    }

    /// Makes the next call of the named [`EglApi`] method fail with `code`.
    pub(crate) fn fail_egl(&self, op: &'static str, code: EglCode) {
        self.state.borrow_mut().egl_failures.insert(op, code.0);
    }

    pub(crate) fn egl_calls(&self) -> Vec<EglCall> {
        self.state.borrow().egl_calls.clone()
    }

    /// Swapped surfaces with the presentation time set for each swap.
    pub(crate) fn swaps(&self) -> Vec<(u32, Option<i64>)> {
        self.state.borrow().swaps.clone()
    }

    pub(crate) fn current_context(&self) -> Option<u32> {
        self.state.borrow().current.map(|(_, context)| context)
    }

    pub(crate) fn live_contexts(&self) -> usize {
        self.state.borrow().contexts.len()
    }

    pub(crate) fn live_surfaces(&self) -> usize {
        self.state.borrow().surfaces.len()
    }

    pub(crate) fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    // ── GL knobs ──────────────────────────────────────────────────────────

    pub(crate) fn push_gl_error(&self, code: u32) {
        self.state.borrow_mut().gl_errors.push_back(code);
    }

    /// Raises `code` right after the next call of the named [`GlApi`] method.
    ///
    /// `tex_image_2d` and `vertex_attrib_pointer` name the typed upload calls.
    pub(crate) fn fail_gl(&self, op: &'static str, code: u32) {
        self.state.borrow_mut().gl_failures.insert(op, code);
    }

    pub(crate) fn fail_compile(&self, stage: u32, log: &str) {
        self.state.borrow_mut().compile_failures.insert(stage, log.to_owned());
    }

    pub(crate) fn fail_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_owned());
    }

    pub(crate) fn hide_location(&self, name: &str) {
        self.state.borrow_mut().hidden_locations.insert(name.to_owned());
    }

    pub(crate) fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub(crate) fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub(crate) fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    pub(crate) fn gl_calls(&self) -> Vec<GlCall> {
        self.state.borrow().gl_calls.clone()
    }

    pub(crate) fn clear_gl_calls(&self) {
        self.state.borrow_mut().gl_calls.clear();
    }

    /// Whether `texture` belongs to the share group of the current context.
    pub(crate) fn texture_visible(&self, texture: u32) -> bool {
        let state = self.state.borrow();
        match (state.textures.get(&texture), state.current_share_group()) {
            (Some(Some(owner)), Some(group)) => *owner == group,
            _ => false,
        }
    }

    /// Every matrix uploaded to `location`, in order.
    pub(crate) fn uniform_uploads(&self, location: u32) -> Vec<Mat4> {
        self.state
            .borrow()
            .gl_calls
            .iter()
            .filter_map(|call| match call {
                GlCall::UniformMatrix4 { location: l, value } if *l == location => Some(*value),
                _ => None,
            })
            .collect()
    }
}

// ── EGL ──────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub(crate) struct FakeEgl(FakeDriver);

impl FakeEgl {
    fn state(&self) -> std::cell::RefMut<'_, DriverState> {
        self.0.state.borrow_mut()
    }
}

impl EglApi for FakeEgl {
    type Display = u32;
    type Config = u32;
    type Context = u32;
    type Surface = u32;
    type Window = u32;

    fn default_display(&self) -> Option<u32> {
        let mut s = self.state();
        s.egl_calls.push(EglCall::GetDisplay);
        s.display_available.then_some(DISPLAY)
    }

    fn initialize(&self, _display: u32) -> Result<(i32, i32), EglCode> {
        let mut s = self.state();
        s.egl_calls.push(EglCall::Initialize);
        s.injected_egl("initialize")?;
        s.initialized = true;
        Ok((1, 4))
    }

    fn choose_config(&self, _display: u32, attributes: &[i32]) -> Result<Option<u32>, EglCode> {
        let mut s = self.state();
        s.egl_calls.push(EglCall::ChooseConfig(attributes.to_vec()));
        s.injected_egl("choose_config")?;
        Ok((!s.reject_configs).then_some(CONFIG))
    }

    fn create_context(
        &self,
        _display: u32,
        _config: u32,
        share: Option<u32>,
        _attributes: &[i32],
    ) -> Result<u32, EglCode> {
        let mut s = self.state();
        s.injected_egl("create_context")?;
        let context = s.egl_name();
        let group = match share {
            Some(other) => *s.contexts.get(&other).ok_or(EglCode::BAD_CONTEXT)?,
            None => context,
        };
        s.contexts.insert(context, group);
        s.egl_calls.push(EglCall::CreateContext { context, share });
        Ok(context)
    }

    fn create_window_surface(&self, _display: u32, _config: u32, window: u32) -> Result<u32, EglCode> {
        let mut s = self.state();
        s.injected_egl("create_window_surface")?;
        let surface = s.egl_name();
        s.surfaces.insert(surface);
        s.egl_calls.push(EglCall::CreateSurface { surface, window });
        Ok(surface)
    }

    fn make_current(
        &self,
        _display: u32,
        surface: Option<u32>,
        context: Option<u32>,
    ) -> Result<(), EglCode> {
        let mut s = self.state();
        s.egl_calls.push(EglCall::MakeCurrent { surface, context });
        s.injected_egl("make_current")?;

        match context {
            None => s.current = None,
            Some(context) => {
                if !s.contexts.contains_key(&context) {
                    return Err(EglCode::BAD_CONTEXT);
                }
                if surface.is_some_and(|surface| !s.surfaces.contains(&surface)) {
                    return Err(EglCode::BAD_SURFACE);
                }
                s.current = Some((surface, context));
            }
        }
        Ok(())
    }

    fn destroy_surface(&self, _display: u32, surface: u32) -> Result<(), EglCode> {
        let mut s = self.state();
        s.egl_calls.push(EglCall::DestroySurface(surface));
        s.injected_egl("destroy_surface")?;
        if s.surfaces.remove(&surface) {
            Ok(())
        } else {
            Err(EglCode::BAD_SURFACE)
        }
    }

    fn destroy_context(&self, _display: u32, context: u32) -> Result<(), EglCode> {
        let mut s = self.state();
        s.egl_calls.push(EglCall::DestroyContext(context));
        s.injected_egl("destroy_context")?;
        match s.contexts.remove(&context) {
            Some(_) => Ok(()),
            None => Err(EglCode::BAD_CONTEXT),
        }
    }

    fn release_thread(&self) -> Result<(), EglCode> {
        let mut s = self.state();
        s.egl_calls.push(EglCall::ReleaseThread);
        s.injected_egl("release_thread")?;
        s.current = None;
        Ok(())
    }

    fn terminate(&self, _display: u32) -> Result<(), EglCode> {
        let mut s = self.state();
        s.egl_calls.push(EglCall::Terminate);
        s.injected_egl("terminate")?;
        s.initialized = false;
        Ok(())
    }

    fn presentation_time(&self, _display: u32, surface: u32, nanos: i64) -> Result<bool, EglCode> {
        let mut s = self.state();
        if !s.presentation_ext {
            return Ok(false);
        }
        s.egl_calls.push(EglCall::PresentationTime { surface, nanos });
        s.injected_egl("presentation_time")?;
        if !s.surfaces.contains(&surface) {
            return Err(EglCode::BAD_SURFACE);
        }
        s.pending_presentation.insert(surface, nanos);
        Ok(true)
    }

    fn swap_buffers(&self, _display: u32, surface: u32) -> Result<(), EglCode> {
        let mut s = self.state();
        s.egl_calls.push(EglCall::SwapBuffers(surface));
        s.injected_egl("swap_buffers")?;
        if s.current.and_then(|(current, _)| current) != Some(surface) {
            return Err(EglCode::BAD_SURFACE);
        }
        let presented = s.pending_presentation.remove(&surface);
        s.swaps.push((surface, presented));
        Ok(())
    }
}

// ── GL ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub(crate) struct FakeGl(FakeDriver);

impl FakeGl {
    fn state(&self) -> std::cell::RefMut<'_, DriverState> {
        self.0.state.borrow_mut()
    }
}

impl GlApi for FakeGl {
    fn get_error(&self) -> u32 {
        self.state().gl_errors.pop_front().unwrap_or(0)
    }

    fn create_shader(&self, stage: u32) -> Result<u32, String> {
        let mut s = self.state();
        let name = s.gl_name();
        s.shaders.insert(name, stage);
        Ok(name)
    }

    fn shader_source(&self, _shader: u32, _source: &str) {}

    fn compile_shader(&self, _shader: u32) {}

    fn shader_compile_status(&self, shader: u32) -> bool {
        let s = self.state();
        s.shaders
            .get(&shader)
            .is_some_and(|stage| !s.compile_failures.contains_key(stage))
    }

    fn shader_info_log(&self, shader: u32) -> String {
        let s = self.state();
        s.shaders
            .get(&shader)
            .and_then(|stage| s.compile_failures.get(stage).cloned())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: u32) {
        self.state().shaders.remove(&shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut s = self.state();
        let name = s.gl_name();
        s.programs.insert(name);
        Ok(name)
    }

    fn attach_shader(&self, _program: u32, _shader: u32) {
        self.state().gl("attach_shader", None);
    }

    fn detach_shader(&self, _program: u32, _shader: u32) {}

    fn link_program(&self, _program: u32) {}

    fn program_link_status(&self, program: u32) -> bool {
        let s = self.state();
        s.programs.contains(&program) && s.link_failure.is_none()
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.state().link_failure.clone().unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        self.state().programs.remove(&program);
    }

    fn use_program(&self, program: Option<u32>) {
        self.state().gl("use_program", Some(GlCall::UseProgram(program)));
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        if self.state().hidden_locations.contains(name) {
            return None;
        }
        match name {
            "aPosition" => Some(0),
            "aTextureCoord" => Some(1),
            _ => None,
        }
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<u32> {
        if self.state().hidden_locations.contains(name) {
            return None;
        }
        match name {
            "uMVPMatrix" => Some(0),
            "uSTMatrix" => Some(1),
            _ => None,
        }
    }

    fn create_texture(&self) -> Result<u32, String> {
        let mut s = self.state();
        let name = s.gl_name();
        let group = s.current_share_group();
        s.textures.insert(name, group);
        Ok(name)
    }

    fn delete_texture(&self, texture: u32) {
        self.state().textures.remove(&texture);
    }

    fn active_texture(&self, unit: u32) {
        self.state().gl("active_texture", Some(GlCall::ActiveTexture(unit)));
    }

    fn bind_texture(&self, target: u32, texture: Option<u32>) {
        self.state()
            .gl("bind_texture", Some(GlCall::BindTexture { target, texture }));
    }

    fn tex_parameter_i32(&self, target: u32, pname: u32, value: i32) {
        self.state()
            .gl("tex_parameter", Some(GlCall::TexParameter { target, pname, value }));
    }

    fn tex_image_2d_rgba8(&self, target: u32, width: i32, height: i32, pixels: &[u8]) {
        let call = GlCall::TexImage2d {
            target,
            width,
            height,
            len: pixels.len(),
        };
        let mut s = self.state();
        s.gl("tex_image_2d", Some(call));
        // GLES only streams into external textures through EGL images.
        if target == TEXTURE_EXTERNAL_OES {
            s.gl_errors.push_back(glow::INVALID_ENUM);
        }
    }

    fn create_buffer(&self) -> Result<u32, String> {
        Ok(self.state().gl_name())
    }

    fn delete_buffer(&self, _buffer: u32) {}

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        self.state()
            .gl("bind_array_buffer", Some(GlCall::BindArrayBuffer(buffer)));
    }

    fn array_buffer_data(&self, data: &[u8]) {
        self.state()
            .gl("array_buffer_data", Some(GlCall::ArrayBufferData(data.len())));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        let call = GlCall::VertexAttribPointer {
            index,
            size,
            stride,
            offset,
        };
        self.state().gl("vertex_attrib_pointer", Some(call));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.state().gl(
            "enable_vertex_attrib_array",
            Some(GlCall::EnableVertexAttribArray(index)),
        );
    }

    fn uniform_matrix_4(&self, location: u32, value: &[f32; 16]) {
        let call = GlCall::UniformMatrix4 {
            location,
            value: *value,
        };
        self.state().gl("uniform_matrix_4", Some(call));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.state()
            .gl("clear_color", Some(GlCall::ClearColor([r, g, b, a])));
    }

    fn clear(&self, mask: u32) {
        self.state().gl("clear", Some(GlCall::Clear(mask)));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        let call = GlCall::Viewport {
            x,
            y,
            width,
            height,
        };
        self.state().gl("viewport", Some(call));
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.state()
            .gl("draw_arrays", Some(GlCall::DrawArrays { mode, first, count }));
    }
}
