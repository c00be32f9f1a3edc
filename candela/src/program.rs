//! Program objects.
//!
//! A [`ProgramObject`] collects compiled shader stages and links them into an executable
//! pipeline. Attaching consumes the [`ShaderObject`]: the driver keeps the stage alive inside the
//! program once the shader value drops.

use gl::types::{GLchar, GLint, GLuint};
use std::ptr::null_mut;

use crate::error::{gl_guard, GlError, GlResult};
use crate::handle::{GlHandle, Resource};
use crate::shader::ShaderObject;

/// Kind marker for driver program objects.
#[derive(Debug)]
pub enum ProgramKind {}

impl Resource for ProgramKind {
  fn exists(raw: GLuint) -> bool {
    unsafe { gl::IsProgram(raw) == gl::TRUE }
  }

  fn delete(raw: GLuint) {
    unsafe { gl::DeleteProgram(raw) }
  }
}

/// A linkable combination of shader stages.
#[derive(Debug, Default)]
pub struct ProgramObject {
  handle: GlHandle<ProgramKind>,
  attached: usize,
}

impl ProgramObject {
  /// Wraps an existing driver program id, taking ownership of it.
  pub fn from_raw(raw: GLuint) -> Self {
    ProgramObject {
      handle: GlHandle::from_raw(raw),
      attached: 0,
    }
  }

  /// Allocates a fresh program object.
  pub fn create() -> GlResult<ProgramObject> {
    let raw = unsafe { gl::CreateProgram() };
    gl_guard!("glCreateProgram");

    if raw == 0 {
      return GlResult::from_error(GlError::new(gl::OUT_OF_MEMORY, "glCreateProgram"));
    }

    GlResult::new(ProgramObject {
      handle: GlHandle::from_raw(raw),
      attached: 0,
    })
  }

  /// Attaches `shader`, consuming it.
  ///
  /// An invalid program or shader handle, or a driver rejection of the stage combination, is a
  /// reported error leaving the attachment state unchanged.
  pub fn attach(&mut self, shader: ShaderObject) -> GlResult<()> {
    if !self.handle.is_valid() {
      return GlResult::from_error(GlError::new(gl::INVALID_OPERATION, "ProgramObject::attach"));
    }

    if !shader.is_valid() {
      return GlResult::from_error(GlError::new(gl::INVALID_VALUE, "ProgramObject::attach"));
    }

    unsafe { gl::AttachShader(self.handle.raw(), shader.raw()) };
    gl_guard!("glAttachShader");

    self.attached += 1;

    // `shader` drops here; the driver defers the release until the stage leaves the program
    GlResult::ok()
  }

  /// Links the attached stages into an executable pipeline.
  ///
  /// An error is reported if no stage was ever attached. A failed link leaves the handle valid
  /// and destructible, but the program is unusable for draw calls; the diagnostic stays
  /// retrievable through [`log`][ProgramObject::log].
  pub fn link(&mut self) -> GlResult<()> {
    if !self.handle.is_valid() {
      return GlResult::from_error(GlError::new(gl::INVALID_OPERATION, "ProgramObject::link"));
    }

    if self.attached == 0 {
      return GlResult::from_error(GlError::new(
        gl::INVALID_OPERATION,
        "ProgramObject::link with no attached shaders",
      ));
    }

    let raw = self.handle.raw();
    unsafe { gl::LinkProgram(raw) };
    gl_guard!("glLinkProgram");

    let mut linked: GLint = gl::FALSE.into();
    unsafe { gl::GetProgramiv(raw, gl::LINK_STATUS, &mut linked) };

    if linked == gl::TRUE.into() {
      GlResult::ok()
    } else {
      GlResult::from_error(GlError::new(gl::INVALID_OPERATION, "glLinkProgram"))
    }
  }

  /// Fetches the driver link diagnostic; empty when the driver has none pending.
  pub fn log(&self) -> GlResult<String> {
    if !self.handle.is_valid() {
      return GlResult::from_error(GlError::new(gl::INVALID_OPERATION, "ProgramObject::log"));
    }

    let raw = self.handle.raw();
    let mut log_len: GLint = 0;
    unsafe { gl::GetProgramiv(raw, gl::INFO_LOG_LENGTH, &mut log_len) };
    gl_guard!("glGetProgramiv");

    if log_len <= 0 {
      return GlResult::new(String::new());
    }

    let mut log: Vec<u8> = Vec::with_capacity(log_len as usize);
    unsafe {
      gl::GetProgramInfoLog(raw, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);
      log.set_len(log_len as usize);
    }
    gl_guard!("glGetProgramInfoLog");

    while log.last() == Some(&0) {
      log.pop();
    }

    GlResult::new(String::from_utf8_lossy(&log).into_owned())
  }

  /// Whether the wrapped id names a live driver program. Reports handle validity, not link
  /// success; check [`link`][ProgramObject::link]'s result to know whether the program is
  /// drawable.
  pub fn is_valid(&self) -> bool {
    self.handle.is_valid()
  }

  /// The raw driver id.
  pub fn raw(&self) -> GLuint {
    self.handle.raw()
  }
}
