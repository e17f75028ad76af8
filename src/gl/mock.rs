//! Recording fake of the GL entry points, for tests without a display.
//!
//! [`resolve`] hands out `extern "system"` functions with the exact GL
//! signatures, so [`Gl::load_with`] and every caller run unchanged. State is
//! thread-local; each test thread sees its own fake context.
//!
//! The fake is only as smart as the tests need:
//! - a shader fails to compile when its source contains `#error`
//! - a program fails to link when the fragment stage declares a `varying`
//!   that the vertex stage does not
//! - uniform locations are the declaration order of `uniform` lines across
//!   both stages, `-1` for unknown names

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::ffi::{c_void, CStr};
use std::rc::Rc;

use super::types::*;
use super::*;

pub const VERSION_STRING: &str = "2.1 eng2d-mock";
const VERSION_CSTR: &[u8] = b"2.1 eng2d-mock\0";

#[derive(Debug, Default, Clone)]
pub struct MockShader {
    pub kind: GLenum,
    pub source: String,
    pub compiled: bool,
    pub log: String,
}

#[derive(Debug, Default, Clone)]
pub struct MockProgram {
    pub shaders: Vec<GLuint>,
    pub bindings: Vec<(GLuint, String)>,
    /// Number of attribute bindings present when `glLinkProgram` ran.
    pub bindings_at_link: Option<usize>,
    pub linked: bool,
    pub log: String,
    pub uniforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Int(GLint),
    Vec4([f32; 4]),
    Mat3 { transpose: GLboolean, values: [f32; 9] },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttribPointer {
    pub size: GLint,
    pub kind: GLenum,
    pub normalized: GLboolean,
    pub stride: GLsizei,
    pub pointer: usize,
}

/// One `glDrawArrays` call with the state it observed.
#[derive(Debug, Clone, PartialEq)]
pub struct Draw {
    pub program: GLuint,
    pub mode: GLenum,
    pub first: GLint,
    pub count: GLsizei,
    pub enabled: BTreeSet<GLuint>,
    pub bound_texture: GLuint,
    /// Per enabled attribute: the values read for each vertex, normalized
    /// bytes already converted to floats.
    pub attributes: HashMap<GLuint, Vec<Vec<f32>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TexImage {
    pub texture: GLuint,
    pub width: GLsizei,
    pub height: GLsizei,
    pub format: GLenum,
    pub first_pixel: [u8; 4],
}

#[derive(Debug, Default)]
pub struct MockGl {
    next_id: GLuint,
    pub calls: Vec<&'static str>,
    pub pending_errors: VecDeque<GLenum>,
    pub shaders: HashMap<GLuint, MockShader>,
    pub programs: HashMap<GLuint, MockProgram>,
    pub deleted_shaders: Vec<GLuint>,
    pub deleted_programs: Vec<GLuint>,
    pub current_program: GLuint,
    pub uniform_values: HashMap<(GLuint, GLint), UniformValue>,
    pub attrib_pointers: HashMap<GLuint, AttribPointer>,
    pub enabled_attribs: BTreeSet<GLuint>,
    pub draws: Vec<Draw>,
    pub generated_textures: Vec<GLuint>,
    pub deleted_textures: Vec<GLuint>,
    pub active_texture: GLenum,
    pub bound_texture: GLuint,
    pub tex_images: Vec<TexImage>,
    pub tex_parameters: Vec<(GLenum, GLint)>,
    pub enabled_caps: Vec<GLenum>,
    pub blend_func: Option<(GLenum, GLenum)>,
    pub clear_color: Option<[f32; 4]>,
    pub clears: Vec<GLbitfield>,
}

impl MockGl {
    fn next_id(&mut self) -> GLuint {
        self.next_id += 1;
        self.next_id
    }

    /// Value last uploaded to `name` in `program`.
    pub fn uniform(&self, program: GLuint, name: &str) -> Option<&UniformValue> {
        let location = self.programs.get(&program)?.uniforms.iter().position(|u| u == name)?;
        self.uniform_values.get(&(program, location as GLint))
    }

    /// Program whose attribute bindings include `name` at `slot`.
    pub fn program_binding(&self, slot: GLuint, name: &str) -> Option<GLuint> {
        self.programs
            .iter()
            .find(|(_, p)| p.bindings.iter().any(|(s, n)| *s == slot && n == name))
            .map(|(id, _)| *id)
    }
}

thread_local! {
    static STATE: RefCell<MockGl> = RefCell::new(MockGl::default());
}

/// Runs `f` against this thread's fake context.
pub fn with<R>(f: impl FnOnce(&mut MockGl) -> R) -> R {
    STATE.with(|state| f(&mut state.borrow_mut()))
}

pub fn reset() {
    with(|m| *m = MockGl::default());
}

/// Fresh fake context plus a fully loaded table.
pub fn gl() -> Rc<Gl> {
    reset();
    match Gl::load_with(resolve) {
        Ok(gl) => Rc::new(gl),
        Err(e) => panic!("mock is missing entry points: {e}"),
    }
}

fn record(m: &mut MockGl, name: &'static str) {
    m.calls.push(name);
}

/// Declared names following `keyword` (`uniform`, `varying`, `attribute`).
fn declarations<'a>(source: &'a str, keyword: &str) -> Vec<&'a str> {
    source
        .lines()
        .filter_map(|line| {
            let mut words = line.split_whitespace();
            if words.next()? != keyword {
                return None;
            }
            let _ty = words.next()?;
            Some(words.next()?.trim_end_matches(';'))
        })
        .collect()
}

unsafe fn c_str(ptr: *const GLchar) -> String {
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

unsafe fn write_log(log: &str, buf_size: GLsizei, length: *mut GLsizei, out: *mut GLchar) {
    let n = log.len().min((buf_size.max(1) - 1) as usize);
    std::ptr::copy_nonoverlapping(log.as_ptr(), out.cast::<u8>(), n);
    *out.add(n) = 0;
    if !length.is_null() {
        *length = n as GLsizei;
    }
}

fn log_length(log: &str) -> GLint {
    if log.is_empty() {
        0
    } else {
        log.len() as GLint + 1
    }
}

extern "system" fn create_shader(kind: GLenum) -> GLuint {
    with(|m| {
        record(m, "glCreateShader");
        let id = m.next_id();
        m.shaders.insert(
            id,
            MockShader {
                kind,
                ..MockShader::default()
            },
        );
        id
    })
}

extern "system" fn shader_source(
    shader: GLuint,
    count: GLsizei,
    strings: *const *const GLchar,
    lengths: *const GLint,
) {
    let mut source = String::new();
    for i in 0..count as usize {
        // SAFETY: callers pass `count` valid strings, with explicit lengths when
        // `lengths` is non-null.
        unsafe {
            let ptr = *strings.add(i);
            if lengths.is_null() {
                source.push_str(&c_str(ptr));
            } else {
                let len = *lengths.add(i) as usize;
                let bytes = std::slice::from_raw_parts(ptr.cast::<u8>(), len);
                source.push_str(&String::from_utf8_lossy(bytes));
            }
        }
    }
    with(|m| {
        record(m, "glShaderSource");
        if let Some(s) = m.shaders.get_mut(&shader) {
            s.source = source;
        }
    });
}

extern "system" fn compile_shader(shader: GLuint) {
    with(|m| {
        record(m, "glCompileShader");
        if let Some(s) = m.shaders.get_mut(&shader) {
            match s.source.lines().find(|l| l.trim_start().starts_with("#error")) {
                Some(line) => {
                    s.compiled = false;
                    s.log = format!("ERROR: 0:1: '{}' : compilation terminated", line.trim());
                }
                None => {
                    s.compiled = true;
                    s.log.clear();
                }
            }
        }
    });
}

extern "system" fn get_shader_iv(shader: GLuint, pname: GLenum, params: *mut GLint) {
    let value = with(|m| {
        record(m, "glGetShaderiv");
        let s = m.shaders.get(&shader).cloned().unwrap_or_default();
        match pname {
            COMPILE_STATUS => GLint::from(s.compiled),
            INFO_LOG_LENGTH => log_length(&s.log),
            _ => 0,
        }
    });
    // SAFETY: callers pass a valid out pointer.
    unsafe { *params = value };
}

extern "system" fn get_shader_info_log(
    shader: GLuint,
    buf_size: GLsizei,
    length: *mut GLsizei,
    log: *mut GLchar,
) {
    let text = with(|m| {
        record(m, "glGetShaderInfoLog");
        m.shaders.get(&shader).map(|s| s.log.clone()).unwrap_or_default()
    });
    // SAFETY: callers pass a buffer of `buf_size` bytes.
    unsafe { write_log(&text, buf_size, length, log) };
}

extern "system" fn delete_shader(shader: GLuint) {
    with(|m| {
        record(m, "glDeleteShader");
        m.deleted_shaders.push(shader);
    });
}

extern "system" fn create_program() -> GLuint {
    with(|m| {
        record(m, "glCreateProgram");
        let id = m.next_id();
        m.programs.insert(id, MockProgram::default());
        id
    })
}

extern "system" fn attach_shader(program: GLuint, shader: GLuint) {
    with(|m| {
        record(m, "glAttachShader");
        if let Some(p) = m.programs.get_mut(&program) {
            p.shaders.push(shader);
        }
    });
}

extern "system" fn bind_attrib_location(program: GLuint, index: GLuint, name: *const GLchar) {
    // SAFETY: callers pass a NUL-terminated attribute name.
    let name = unsafe { c_str(name) };
    with(|m| {
        record(m, "glBindAttribLocation");
        if let Some(p) = m.programs.get_mut(&program) {
            p.bindings.push((index, name));
        }
    });
}

extern "system" fn link_program(program: GLuint) {
    with(|m| {
        record(m, "glLinkProgram");
        let Some(p) = m.programs.get(&program) else {
            return;
        };
        let stages: Vec<MockShader> = p
            .shaders
            .iter()
            .filter_map(|id| m.shaders.get(id).cloned())
            .collect();
        let source_of = |kind| {
            stages
                .iter()
                .filter(|s| s.kind == kind)
                .map(|s| s.source.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        };
        let vertex = source_of(VERTEX_SHADER);
        let fragment = source_of(FRAGMENT_SHADER);

        let mut log = String::new();
        if stages.iter().any(|s| !s.compiled) {
            log.push_str("ERROR: attached shader is not compiled\n");
        }
        let written = declarations(&vertex, "varying");
        for name in declarations(&fragment, "varying") {
            if !written.contains(&name) {
                log.push_str(&format!(
                    "ERROR: fragment varying {name} is not written by the vertex shader\n"
                ));
            }
        }
        let mut uniforms: Vec<String> = Vec::new();
        for name in declarations(&vertex, "uniform")
            .into_iter()
            .chain(declarations(&fragment, "uniform"))
        {
            if !uniforms.iter().any(|u| u == name) {
                uniforms.push(name.to_string());
            }
        }

        if let Some(p) = m.programs.get_mut(&program) {
            p.bindings_at_link = Some(p.bindings.len());
            p.linked = log.is_empty();
            p.log = log;
            p.uniforms = uniforms;
        }
    });
}

extern "system" fn get_program_iv(program: GLuint, pname: GLenum, params: *mut GLint) {
    let value = with(|m| {
        record(m, "glGetProgramiv");
        let p = m.programs.get(&program).cloned().unwrap_or_default();
        match pname {
            LINK_STATUS => GLint::from(p.linked),
            INFO_LOG_LENGTH => log_length(&p.log),
            _ => 0,
        }
    });
    // SAFETY: callers pass a valid out pointer.
    unsafe { *params = value };
}

extern "system" fn get_program_info_log(
    program: GLuint,
    buf_size: GLsizei,
    length: *mut GLsizei,
    log: *mut GLchar,
) {
    let text = with(|m| {
        record(m, "glGetProgramInfoLog");
        m.programs.get(&program).map(|p| p.log.clone()).unwrap_or_default()
    });
    // SAFETY: callers pass a buffer of `buf_size` bytes.
    unsafe { write_log(&text, buf_size, length, log) };
}

extern "system" fn delete_program(program: GLuint) {
    with(|m| {
        record(m, "glDeleteProgram");
        m.deleted_programs.push(program);
    });
}

extern "system" fn use_program(program: GLuint) {
    with(|m| {
        record(m, "glUseProgram");
        m.current_program = program;
    });
}

extern "system" fn vertex_attrib_pointer(
    index: GLuint,
    size: GLint,
    kind: GLenum,
    normalized: GLboolean,
    stride: GLsizei,
    pointer: *const c_void,
) {
    with(|m| {
        record(m, "glVertexAttribPointer");
        m.attrib_pointers.insert(
            index,
            AttribPointer {
                size,
                kind,
                normalized,
                stride,
                pointer: pointer as usize,
            },
        );
    });
}

extern "system" fn enable_vertex_attrib_array(index: GLuint) {
    with(|m| {
        record(m, "glEnableVertexAttribArray");
        m.enabled_attribs.insert(index);
    });
}

extern "system" fn disable_vertex_attrib_array(index: GLuint) {
    with(|m| {
        record(m, "glDisableVertexAttribArray");
        m.enabled_attribs.remove(&index);
    });
}

extern "system" fn get_uniform_location(program: GLuint, name: *const GLchar) -> GLint {
    // SAFETY: callers pass a NUL-terminated uniform name.
    let name = unsafe { c_str(name) };
    with(|m| {
        record(m, "glGetUniformLocation");
        m.programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.iter().position(|u| *u == name))
            .map_or(-1, |i| i as GLint)
    })
}

fn set_uniform(m: &mut MockGl, location: GLint, value: UniformValue) {
    if location >= 0 {
        let program = m.current_program;
        m.uniform_values.insert((program, location), value);
    }
}

extern "system" fn uniform_1i(location: GLint, v0: GLint) {
    with(|m| {
        record(m, "glUniform1i");
        set_uniform(m, location, UniformValue::Int(v0));
    });
}

extern "system" fn uniform_4fv(location: GLint, count: GLsizei, value: *const GLfloat) {
    let _ = count;
    let mut v = [0.0; 4];
    // SAFETY: callers pass 4 floats per element.
    unsafe { std::ptr::copy_nonoverlapping(value, v.as_mut_ptr(), 4) };
    with(|m| {
        record(m, "glUniform4fv");
        set_uniform(m, location, UniformValue::Vec4(v));
    });
}

extern "system" fn uniform_matrix_3fv(
    location: GLint,
    count: GLsizei,
    transpose: GLboolean,
    value: *const GLfloat,
) {
    let _ = count;
    let mut values = [0.0; 9];
    // SAFETY: callers pass 9 floats per element.
    unsafe { std::ptr::copy_nonoverlapping(value, values.as_mut_ptr(), 9) };
    with(|m| {
        record(m, "glUniformMatrix3fv");
        set_uniform(m, location, UniformValue::Mat3 { transpose, values });
    });
}

extern "system" fn active_texture(unit: GLenum) {
    with(|m| {
        record(m, "glActiveTexture");
        m.active_texture = unit;
    });
}

extern "system" fn gen_textures(n: GLsizei, textures: *mut GLuint) {
    with(|m| {
        record(m, "glGenTextures");
        for i in 0..n as usize {
            let id = m.next_id();
            m.generated_textures.push(id);
            // SAFETY: callers pass room for `n` names.
            unsafe { *textures.add(i) = id };
        }
    });
}

extern "system" fn delete_textures(n: GLsizei, textures: *const GLuint) {
    with(|m| {
        record(m, "glDeleteTextures");
        for i in 0..n as usize {
            // SAFETY: callers pass `n` names.
            let id = unsafe { *textures.add(i) };
            m.deleted_textures.push(id);
        }
    });
}

extern "system" fn bind_texture(_target: GLenum, texture: GLuint) {
    with(|m| {
        record(m, "glBindTexture");
        m.bound_texture = texture;
    });
}

extern "system" fn tex_image_2d(
    _target: GLenum,
    _level: GLint,
    _internal_format: GLint,
    width: GLsizei,
    height: GLsizei,
    _border: GLint,
    format: GLenum,
    _kind: GLenum,
    pixels: *const c_void,
) {
    let mut first_pixel = [0u8; 4];
    if !pixels.is_null() && width > 0 && height > 0 {
        // SAFETY: callers pass width * height RGBA pixels.
        unsafe { std::ptr::copy_nonoverlapping(pixels.cast::<u8>(), first_pixel.as_mut_ptr(), 4) };
    }
    with(|m| {
        record(m, "glTexImage2D");
        let texture = m.bound_texture;
        m.tex_images.push(TexImage {
            texture,
            width,
            height,
            format,
            first_pixel,
        });
    });
}

extern "system" fn tex_parameter_i(_target: GLenum, pname: GLenum, param: GLint) {
    with(|m| {
        record(m, "glTexParameteri");
        m.tex_parameters.push((pname, param));
    });
}

/// Reads the attribute values for `count` vertices, as the driver would.
unsafe fn read_attribute(ptr: &AttribPointer, count: usize) -> Vec<Vec<f32>> {
    let component = match ptr.kind {
        FLOAT => 4,
        _ => 1,
    };
    let stride = if ptr.stride == 0 {
        component * ptr.size as usize
    } else {
        ptr.stride as usize
    };
    (0..count)
        .map(|v| {
            let base = (ptr.pointer + v * stride) as *const u8;
            (0..ptr.size as usize)
                .map(|c| match ptr.kind {
                    FLOAT => std::ptr::read_unaligned(base.add(c * 4).cast::<f32>()),
                    _ => {
                        let byte = *base.add(c);
                        if ptr.normalized == TRUE {
                            byte as f32 / 255.0
                        } else {
                            byte as f32
                        }
                    }
                })
                .collect()
        })
        .collect()
}

extern "system" fn draw_arrays(mode: GLenum, first: GLint, count: GLsizei) {
    with(|m| {
        record(m, "glDrawArrays");
        let mut attributes = HashMap::new();
        for index in &m.enabled_attribs {
            if let Some(ptr) = m.attrib_pointers.get(index) {
                // SAFETY: the vertex data is borrowed by the caller for the
                // duration of the draw call.
                let values = unsafe { read_attribute(ptr, (first + count) as usize) };
                attributes.insert(*index, values);
            }
        }
        let draw = Draw {
            program: m.current_program,
            mode,
            first,
            count,
            enabled: m.enabled_attribs.clone(),
            bound_texture: m.bound_texture,
            attributes,
        };
        m.draws.push(draw);
    });
}

extern "system" fn enable(cap: GLenum) {
    with(|m| {
        record(m, "glEnable");
        m.enabled_caps.push(cap);
    });
}

extern "system" fn blend_func(src: GLenum, dst: GLenum) {
    with(|m| {
        record(m, "glBlendFunc");
        m.blend_func = Some((src, dst));
    });
}

extern "system" fn clear_color(r: GLfloat, g: GLfloat, b: GLfloat, a: GLfloat) {
    with(|m| {
        record(m, "glClearColor");
        m.clear_color = Some([r, g, b, a]);
    });
}

extern "system" fn clear(mask: GLbitfield) {
    with(|m| {
        record(m, "glClear");
        m.clears.push(mask);
    });
}

extern "system" fn get_error() -> GLenum {
    with(|m| m.pending_errors.pop_front().unwrap_or(NO_ERROR))
}

extern "system" fn get_string(name: GLenum) -> *const GLubyte {
    match name {
        VERSION | VENDOR | RENDERER | SHADING_LANGUAGE_VERSION => VERSION_CSTR.as_ptr(),
        _ => std::ptr::null(),
    }
}

/// Resolver for [`Gl::load_with`]; null for names the fake does not provide.
pub fn resolve(name: &str) -> *const c_void {
    match name {
        "glCreateShader" => create_shader as *const c_void,
        "glShaderSource" => shader_source as *const c_void,
        "glCompileShader" => compile_shader as *const c_void,
        "glGetShaderiv" => get_shader_iv as *const c_void,
        "glGetShaderInfoLog" => get_shader_info_log as *const c_void,
        "glDeleteShader" => delete_shader as *const c_void,
        "glCreateProgram" => create_program as *const c_void,
        "glAttachShader" => attach_shader as *const c_void,
        "glBindAttribLocation" => bind_attrib_location as *const c_void,
        "glLinkProgram" => link_program as *const c_void,
        "glGetProgramiv" => get_program_iv as *const c_void,
        "glGetProgramInfoLog" => get_program_info_log as *const c_void,
        "glDeleteProgram" => delete_program as *const c_void,
        "glUseProgram" => use_program as *const c_void,
        "glVertexAttribPointer" => vertex_attrib_pointer as *const c_void,
        "glEnableVertexAttribArray" => enable_vertex_attrib_array as *const c_void,
        "glDisableVertexAttribArray" => disable_vertex_attrib_array as *const c_void,
        "glGetUniformLocation" => get_uniform_location as *const c_void,
        "glUniform1i" => uniform_1i as *const c_void,
        "glUniform4fv" => uniform_4fv as *const c_void,
        "glUniformMatrix3fv" => uniform_matrix_3fv as *const c_void,
        "glActiveTexture" => active_texture as *const c_void,
        "glGenTextures" => gen_textures as *const c_void,
        "glDeleteTextures" => delete_textures as *const c_void,
        "glBindTexture" => bind_texture as *const c_void,
        "glTexImage2D" => tex_image_2d as *const c_void,
        "glTexParameteri" => tex_parameter_i as *const c_void,
        "glDrawArrays" => draw_arrays as *const c_void,
        "glEnable" => enable as *const c_void,
        "glBlendFunc" => blend_func as *const c_void,
        "glClearColor" => clear_color as *const c_void,
        "glClear" => clear as *const c_void,
        "glGetError" => get_error as *const c_void,
        "glGetString" => get_string as *const c_void,
        _ => std::ptr::null(),
    }
}
