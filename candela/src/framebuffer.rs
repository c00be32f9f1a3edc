//! Framebuffers and render-target attachment.
//!
//! A [`Framebuffer`] aggregates image attachments into a render target. It owns the driver
//! framebuffer object, never the attached images: callers keep those alive for as long as they
//! stay attached.

use gl::types::{GLenum, GLint, GLsizei, GLuint};

use crate::error::{attempt, gl_guard, GlError, GlResult};
use crate::handle::{GlHandle, Resource};
use crate::state;

/// Framebuffer binding points.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Target {
  /// Target of draw commands.
  Draw,
  /// Source of read-back operations.
  Read,
  /// Both at once.
  Both,
}

impl Target {
  pub(crate) fn to_gl(self) -> GLenum {
    match self {
      Target::Draw => gl::DRAW_FRAMEBUFFER,
      Target::Read => gl::READ_FRAMEBUFFER,
      Target::Both => gl::FRAMEBUFFER,
    }
  }
}

/// What a set of images is attached as.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AttachmentType {
  /// Color attachments, bound at consecutive slots starting at slot 0.
  Color,
  /// The depth attachment.
  Depth,
  /// The stencil attachment.
  Stencil,
  /// The combined depth-stencil attachment.
  DepthStencil,
}

impl AttachmentType {
  fn base_point(self) -> GLenum {
    match self {
      AttachmentType::Color => gl::COLOR_ATTACHMENT0,
      AttachmentType::Depth => gl::DEPTH_ATTACHMENT,
      AttachmentType::Stencil => gl::STENCIL_ATTACHMENT,
      AttachmentType::DepthStencil => gl::DEPTH_STENCIL_ATTACHMENT,
    }
  }

  /// Whether attachments of this type count against the color-attachment budget.
  pub fn is_color(self) -> bool {
    self == AttachmentType::Color
  }
}

/// Kind marker for driver framebuffer objects.
#[derive(Debug)]
pub enum FramebufferKind {}

impl Resource for FramebufferKind {
  fn exists(raw: GLuint) -> bool {
    unsafe { gl::IsFramebuffer(raw) == gl::TRUE }
  }

  fn delete(raw: GLuint) {
    unsafe { gl::DeleteFramebuffers(1, &raw) }
  }
}

/// A driver framebuffer object plus the number of color attachments currently bound to it.
#[derive(Debug, Default)]
pub struct Framebuffer {
  handle: GlHandle<FramebufferKind>,
  color_attachments: usize,
}

impl Framebuffer {
  /// Wraps an existing driver framebuffer id, taking ownership of it.
  pub fn from_raw(raw: GLuint) -> Self {
    Framebuffer {
      handle: GlHandle::from_raw(raw),
      color_attachments: 0,
    }
  }

  /// Allocates a framebuffer and attaches `images` at consecutive slots of `attachment`, mip
  /// `level`, layer `zoffset`.
  ///
  /// The new framebuffer is left bound on `target`. Any failed step releases the allocation
  /// before the error is returned; the caller never receives a partially configured object.
  pub fn create(
    target: Target,
    attachment: AttachmentType,
    level: GLint,
    zoffset: GLint,
    images: &[GLuint],
  ) -> GlResult<Framebuffer> {
    let mut raw: GLuint = 0;
    unsafe { gl::GenFramebuffers(1, &mut raw) };
    gl_guard!("glGenFramebuffers");

    if raw == 0 {
      return GlResult::from_error(GlError::new(gl::OUT_OF_MEMORY, "glGenFramebuffers"));
    }

    let mut framebuffer = Framebuffer {
      handle: GlHandle::from_raw(raw),
      color_attachments: 0,
    };

    // a generated name only becomes a framebuffer object once bound
    unsafe { gl::BindFramebuffer(target.to_gl(), raw) };
    gl_guard!("glBindFramebuffer");

    attempt!(framebuffer.attach(target, attachment, level, zoffset, images));

    let status = unsafe { gl::CheckFramebufferStatus(target.to_gl()) };
    if status != gl::FRAMEBUFFER_COMPLETE {
      return GlResult::from_error(GlError::new(status, "glCheckFramebufferStatus"));
    }

    GlResult::new(framebuffer)
  }

  /// Re-binds `images` on an already created framebuffer and refreshes the tracked color
  /// attachment count.
  ///
  /// Does not take ownership of the images. The framebuffer is left bound on `target`.
  pub fn attach(
    &mut self,
    target: Target,
    attachment: AttachmentType,
    level: GLint,
    zoffset: GLint,
    images: &[GLuint],
  ) -> GlResult<()> {
    if !self.handle.is_valid() {
      return GlResult::from_error(GlError::new(gl::INVALID_OPERATION, "Framebuffer::attach"));
    }

    if attachment.is_color() {
      let max = attempt!(state::max_color_attachments());

      if images.len() > max as usize {
        return GlResult::from_error(GlError::new(
          gl::INVALID_VALUE,
          "Framebuffer::attach color budget",
        ));
      }
    }

    let target = target.to_gl();
    unsafe { gl::BindFramebuffer(target, self.handle.raw()) };
    gl_guard!("glBindFramebuffer");

    let base = attachment.base_point();

    for (i, image) in images.iter().enumerate() {
      let point = if attachment.is_color() {
        base + i as GLenum
      } else {
        base
      };

      if zoffset > 0 {
        unsafe { gl::FramebufferTextureLayer(target, point, *image, level, zoffset) };
        gl_guard!("glFramebufferTextureLayer");
      } else {
        unsafe { gl::FramebufferTexture(target, point, *image, level) };
        gl_guard!("glFramebufferTexture");
      }
    }

    if attachment.is_color() {
      if target != gl::READ_FRAMEBUFFER {
        // declare the draw buffer list matching the freshly bound attachments
        if images.is_empty() {
          unsafe { gl::DrawBuffer(gl::NONE) };
          gl_guard!("glDrawBuffer");
        } else {
          let buffers: Vec<GLenum> = (0..images.len() as GLenum)
            .map(|i| gl::COLOR_ATTACHMENT0 + i)
            .collect();

          unsafe { gl::DrawBuffers(buffers.len() as GLsizei, buffers.as_ptr()) };
          gl_guard!("glDrawBuffers");
        }
      }

      self.color_attachments = images.len();
    }

    GlResult::ok()
  }

  /// Makes this framebuffer the active render target for `target`.
  pub fn bind(&self, target: Target) -> GlResult<()> {
    if !self.handle.is_valid() {
      return GlResult::from_error(GlError::new(gl::INVALID_OPERATION, "Framebuffer::bind"));
    }

    unsafe { gl::BindFramebuffer(target.to_gl(), self.handle.raw()) };
    gl_guard!("glBindFramebuffer");

    GlResult::ok()
  }

  /// Number of color attachments currently bound. Pure accessor.
  pub fn color_attachment_count(&self) -> usize {
    self.color_attachments
  }

  /// Whether the wrapped id names a live driver framebuffer.
  pub fn is_valid(&self) -> bool {
    self.handle.is_valid()
  }

  /// The raw driver id.
  pub fn raw(&self) -> GLuint {
    self.handle.raw()
  }
}

/// Restores the default framebuffer on `target` for the current context.
pub fn unbind(target: Target) -> GlResult<()> {
  unsafe { gl::BindFramebuffer(target.to_gl(), 0) };
  gl_guard!("glBindFramebuffer");

  GlResult::ok()
}
