//! Shader objects.

use gl::types::{GLchar, GLenum, GLint, GLuint};
use std::ffi::CString;
use std::fmt;
use std::ptr::{null, null_mut};

use crate::error::{gl_guard, GlError, GlResult};
use crate::handle::{GlHandle, Resource};

/// A shader stage type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Tessellation control shader.
  TessellationControlShader,
  /// Tessellation evaluation shader.
  TessellationEvaluationShader,
  /// Geometry shader.
  GeometryShader,
  /// Fragment shader.
  FragmentShader,
}

impl StageType {
  /// The GL shader type this stage maps onto.
  pub fn to_gl(self) -> GLenum {
    match self {
      StageType::VertexShader => gl::VERTEX_SHADER,
      StageType::TessellationControlShader => gl::TESS_CONTROL_SHADER,
      StageType::TessellationEvaluationShader => gl::TESS_EVALUATION_SHADER,
      StageType::GeometryShader => gl::GEOMETRY_SHADER,
      StageType::FragmentShader => gl::FRAGMENT_SHADER,
    }
  }
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::TessellationControlShader => f.write_str("tessellation control shader"),
      StageType::TessellationEvaluationShader => f.write_str("tessellation evaluation shader"),
      StageType::GeometryShader => f.write_str("geometry shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Kind marker for driver shader objects.
#[derive(Debug)]
pub enum ShaderKind {}

impl Resource for ShaderKind {
  fn exists(raw: GLuint) -> bool {
    unsafe { gl::IsShader(raw) == gl::TRUE }
  }

  fn delete(raw: GLuint) {
    unsafe { gl::DeleteShader(raw) }
  }
}

/// One compiled shader stage, prior to linking.
#[derive(Debug)]
pub struct ShaderObject {
  handle: GlHandle<ShaderKind>,
  ty: StageType,
}

impl ShaderObject {
  /// Wraps an existing driver shader id of stage `ty`, taking ownership of it.
  pub fn from_raw(raw: GLuint, ty: StageType) -> Self {
    ShaderObject {
      handle: GlHandle::from_raw(raw),
      ty,
    }
  }

  /// Compiles `src` as a stage of type `ty`.
  ///
  /// On compile failure the driver diagnostic is emitted through the `log` facade, the handle is
  /// released and no object is produced.
  pub fn create(ty: StageType, src: &str) -> GlResult<ShaderObject> {
    let raw = unsafe { gl::CreateShader(ty.to_gl()) };
    gl_guard!("glCreateShader");

    if raw == 0 {
      return GlResult::from_error(GlError::new(gl::OUT_OF_MEMORY, "glCreateShader"));
    }

    let shader = ShaderObject {
      handle: GlHandle::from_raw(raw),
      ty,
    };

    let c_src = match CString::new(src.as_bytes()) {
      Ok(c_src) => c_src,
      Err(_) => return GlResult::from_error(GlError::new(gl::INVALID_VALUE, "glShaderSource")),
    };

    unsafe {
      gl::ShaderSource(raw, 1, [c_src.as_ptr()].as_ptr(), null());
      gl::CompileShader(raw);
    }
    gl_guard!("glCompileShader");

    let mut compiled: GLint = gl::FALSE.into();
    unsafe { gl::GetShaderiv(raw, gl::COMPILE_STATUS, &mut compiled) };

    if compiled == gl::TRUE.into() {
      GlResult::new(shader)
    } else {
      log::error!("{} failed to compile: {}", ty, info_log(raw));
      GlResult::from_error(GlError::new(gl::INVALID_OPERATION, "glCompileShader"))
    }
  }

  /// Fetches the driver compile diagnostic; empty when the driver has none pending.
  pub fn log(&self) -> GlResult<String> {
    if !self.handle.is_valid() {
      return GlResult::from_error(GlError::new(gl::INVALID_OPERATION, "ShaderObject::log"));
    }

    let log = info_log(self.handle.raw());
    gl_guard!("glGetShaderInfoLog");

    GlResult::new(log)
  }

  /// The stage this shader was compiled as.
  pub fn ty(&self) -> StageType {
    self.ty
  }

  /// Whether the wrapped id names a live driver shader.
  pub fn is_valid(&self) -> bool {
    self.handle.is_valid()
  }

  /// The raw driver id.
  pub fn raw(&self) -> GLuint {
    self.handle.raw()
  }
}

fn info_log(raw: GLuint) -> String {
  let mut log_len: GLint = 0;
  unsafe { gl::GetShaderiv(raw, gl::INFO_LOG_LENGTH, &mut log_len) };

  if log_len <= 0 {
    return String::new();
  }

  let mut log: Vec<u8> = Vec::with_capacity(log_len as usize);
  unsafe {
    gl::GetShaderInfoLog(raw, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);
    log.set_len(log_len as usize);
  }

  while log.last() == Some(&0) {
    log.pop();
  }

  String::from_utf8_lossy(&log).into_owned()
}
