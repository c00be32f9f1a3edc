//! Context-scoped state queries.
//!
//! Everything here assumes the one thread that owns the active graphics context; no locking is
//! performed anywhere in the crate.

use gl::types::GLint;

use crate::error::{gl_guard, GlResult};

/// Driver-reported maximum number of simultaneous color attachments.
pub fn max_color_attachments() -> GlResult<GLint> {
  let mut n: GLint = 0;
  unsafe { gl::GetIntegerv(gl::MAX_COLOR_ATTACHMENTS, &mut n) };
  gl_guard!("glGetIntegerv(GL_MAX_COLOR_ATTACHMENTS)");

  GlResult::new(n)
}

/// Driver-reported maximum number of simultaneous draw buffers.
pub fn max_draw_buffers() -> GlResult<GLint> {
  let mut n: GLint = 0;
  unsafe { gl::GetIntegerv(gl::MAX_DRAW_BUFFERS, &mut n) };
  gl_guard!("glGetIntegerv(GL_MAX_DRAW_BUFFERS)");

  GlResult::new(n)
}
