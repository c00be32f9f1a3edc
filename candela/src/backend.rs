//! The host-facing backend interface.
//!
//! A host application drives the backend through a flat entry-point table. This module fixes the
//! shapes crossing that boundary: the [`Backend`] trait and the plain data types its operations
//! exchange. Implementations live with the host integration layer; the core never assumes
//! anything about a resource beyond its opaque id and the documented field sets below.

use gl::types::GLuint;
use std::fmt;

use crate::error::GlResult;
use crate::shader::{ShaderObject, StageType};

/// Severity of a diagnostic crossing the host boundary.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum LogSeverity {
  /// The backend cannot continue.
  Fatal,
  /// An operation failed.
  Error,
  /// Something looks wrong but the operation went through.
  Warning,
  /// Informational.
  Notice,
  /// Developer chatter.
  Debug,
}

impl LogSeverity {
  /// The `log` facade level this severity maps onto.
  pub fn to_level(self) -> log::Level {
    match self {
      LogSeverity::Fatal | LogSeverity::Error => log::Level::Error,
      LogSeverity::Warning => log::Level::Warn,
      LogSeverity::Notice => log::Level::Info,
      LogSeverity::Debug => log::Level::Debug,
    }
  }
}

impl fmt::Display for LogSeverity {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      LogSeverity::Fatal => f.write_str("FATAL"),
      LogSeverity::Error => f.write_str("ERROR"),
      LogSeverity::Warning => f.write_str("WARNING"),
      LogSeverity::Notice => f.write_str("NOTICE"),
      LogSeverity::Debug => f.write_str("DEBUG"),
    }
  }
}

/// Diagnostic callback handed to the backend at initialization.
pub type LogCallback = fn(LogSeverity, fmt::Arguments);

/// Forwards a backend diagnostic to the `log` facade. The default [`LogCallback`].
pub fn forward_to_log(severity: LogSeverity, args: fmt::Arguments) {
  log::log!(severity.to_level(), "{}", args);
}

/// Kinds of clipboard content.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ClipboardKind {
  /// No clipboard.
  None,
  /// Plain text.
  Text,
  /// Audio waveform.
  Wave,
  /// Bitmap image.
  Bitmap,
  /// File list.
  File,
  /// Serialized UI element.
  Element,
  /// Application-defined payload.
  Custom,
  /// Any of the above.
  All,
}

/// Blending equation applied to the factored source and destination pixels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlendOp {
  /// `blended = src * srcK + dst * dstK`
  Add,
  /// `blended = src * srcK - dst * dstK`
  Subtract,
  /// `blended = dst * dstK - src * srcK`
  ReverseSubtract,
  /// `blended = min(src, dst)`
  Min,
  /// `blended = max(src, dst)`
  Max,
}

impl BlendOp {
  /// The GL equation this op maps onto.
  pub fn to_gl(self) -> gl::types::GLenum {
    match self {
      BlendOp::Add => gl::FUNC_ADD,
      BlendOp::Subtract => gl::FUNC_SUBTRACT,
      BlendOp::ReverseSubtract => gl::FUNC_REVERSE_SUBTRACT,
      BlendOp::Min => gl::MIN,
      BlendOp::Max => gl::MAX,
    }
  }
}

/// Blending factor a pixel is multiplied by before the [`BlendOp`] applies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BlendFactor {
  /// `0`
  Zero,
  /// `1`
  One,
  /// `src`
  SrcColor,
  /// `1 - src`
  SrcColorComplement,
  /// `dst`
  DstColor,
  /// `1 - dst`
  DstColorComplement,
  /// `srcA`
  SrcAlpha,
  /// `1 - srcA`
  SrcAlphaComplement,
  /// `dstA`
  DstAlpha,
  /// `1 - dstA`
  DstAlphaComplement,
  /// `min(srcA, 1 - dstA)`
  SrcAlphaSaturate,
}

impl BlendFactor {
  /// The GL factor this value maps onto.
  pub fn to_gl(self) -> gl::types::GLenum {
    match self {
      BlendFactor::Zero => gl::ZERO,
      BlendFactor::One => gl::ONE,
      BlendFactor::SrcColor => gl::SRC_COLOR,
      BlendFactor::SrcColorComplement => gl::ONE_MINUS_SRC_COLOR,
      BlendFactor::DstColor => gl::DST_COLOR,
      BlendFactor::DstColorComplement => gl::ONE_MINUS_DST_COLOR,
      BlendFactor::SrcAlpha => gl::SRC_ALPHA,
      BlendFactor::SrcAlphaComplement => gl::ONE_MINUS_SRC_ALPHA,
      BlendFactor::DstAlpha => gl::DST_ALPHA,
      BlendFactor::DstAlphaComplement => gl::ONE_MINUS_DST_ALPHA,
      BlendFactor::SrcAlphaSaturate => gl::SRC_ALPHA_SATURATE,
    }
  }
}

bitflags::bitflags! {
  /// Per-channel color write mask.
  #[derive(Clone, Copy, Debug, Eq, PartialEq)]
  pub struct ColorMask: u8 {
    const RED = 0b0001;
    const GREEN = 0b0010;
    const BLUE = 0b0100;
    const ALPHA = 0b1000;
    const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
  }
}

/// Blend-state description: six blend function/op fields plus the channel write mask.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Blend {
  /// Factor applied to the source color.
  pub src: BlendFactor,
  /// Factor applied to the destination color.
  pub dst: BlendFactor,
  /// Equation blending the factored colors.
  pub color_op: BlendOp,
  /// Factor applied to the source alpha.
  pub src_alpha: BlendFactor,
  /// Factor applied to the destination alpha.
  pub dst_alpha: BlendFactor,
  /// Equation blending the factored alphas.
  pub alpha_op: BlendOp,
  /// Channels writes go to.
  pub mask: ColorMask,
}

impl Blend {
  /// Premultiplied-alpha compositing.
  pub const PREMULTIPLIED: Blend = Blend {
    src: BlendFactor::One,
    dst: BlendFactor::SrcAlphaComplement,
    color_op: BlendOp::Add,
    src_alpha: BlendFactor::One,
    dst_alpha: BlendFactor::SrcAlphaComplement,
    alpha_op: BlendOp::Add,
    mask: ColorMask::ALL,
  };
}

/// Type tag of one shader parameter.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShaderParamKind {
  /// 16-bit float.
  Half,
  /// 32-bit float.
  Float,
  /// 64-bit float.
  Double,
  /// Signed integer.
  Int,
  /// Unsigned integer.
  UInt,
  /// Packed 32-bit color.
  Color32,
  /// 2D texture binding.
  Texture,
  /// Cubemap texture binding.
  TextureCube,
}

/// Descriptor of one shader parameter or vertex attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShaderParameter {
  /// Name the shader declares the parameter under.
  pub name: String,
  /// Component count (e.g. 4 for a `vec4`, 4 for a `mat4` column).
  pub components: u32,
  /// Element count; 0 for a non-array scalar or vector, the column count for matrices.
  pub elements: u32,
  /// Type tag.
  pub kind: ShaderParamKind,
}

/// Declared format of a raw byte span handed to buffer creation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DataFormat {
  /// Interleaved vertex data; layout is described separately by [`ShaderParameter`] attributes.
  Vertex,
  /// 16-bit index data.
  Index16,
  /// 32-bit index data.
  Index32,
  /// 8-bit RGBA pixels.
  Rgba8,
  /// 8-bit BGRA pixels.
  Bgra8,
  /// 32-bit float RGBA pixels.
  Rgba32F,
}

/// Position or dimension vector crossing the host boundary.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
  pub x: f32,
  pub y: f32,
}

impl Vec2 {
  pub fn new(x: f32, y: f32) -> Self {
    Vec2 { x, y }
  }
}

bitflags::bitflags! {
  /// Window state and capability flags.
  #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
  pub struct WindowFlags: u64 {
    const MINIMIZED = 1 << 0;
    const MAXIMIZED = 1 << 1;
    const CLOSED = 1 << 2;
    const FULLSCREEN = 1 << 3;
    const RESIZABLE = 1 << 4;
    const NO_CAPTION = 1 << 5;
    const NO_BORDER = 1 << 6;
  }
}

/// Mouse cursor shapes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorKind {
  Arrow,
  IBeam,
  Cross,
  Wait,
  Hand,
  ResizeNS,
  ResizeWE,
  ResizeNWSE,
  ResizeNESW,
  ResizeAll,
}

/// The flat entry-point table a host application drives the backend through.
///
/// Every resource reference crossing this boundary is an opaque handle: a raw driver id or a
/// stable pointer wrapped by the associated types. Implementations live outside this crate.
pub trait Backend {
  /// A native window plus its graphics context.
  type Window;
  /// A recorded list of draw commands.
  type CommandList;
  /// Pipeline state compiled from a framebuffer / blend / vertex-attribute description.
  type PipelineState;
  /// A GPU-resident vertex, index or pixel buffer.
  type Buffer;

  /// Opens a window at `pos` sized `dim`.
  fn create_window(
    &mut self,
    pos: Vec2,
    dim: Vec2,
    caption: &str,
    flags: WindowFlags,
  ) -> GlResult<Self::Window>;

  /// Updates an existing window's geometry, caption or flags.
  fn set_window(
    &mut self,
    window: &mut Self::Window,
    pos: Option<Vec2>,
    dim: Option<Vec2>,
    caption: Option<&str>,
    flags: WindowFlags,
  ) -> GlResult<()>;

  /// Closes a window, releasing its context.
  fn destroy_window(&mut self, window: Self::Window) -> GlResult<()>;

  /// Compiles `source` as a stage of type `ty` in the window's context.
  fn compile_shader(
    &mut self,
    window: &mut Self::Window,
    ty: StageType,
    source: &str,
  ) -> GlResult<ShaderObject>;

  /// Starts recording a command list; `bundle` hints that the list will be replayed many times.
  fn create_command_list(
    &mut self,
    window: &mut Self::Window,
    bundle: bool,
  ) -> GlResult<Self::CommandList>;

  /// Submits a recorded command list for execution.
  fn execute(&mut self, window: &mut Self::Window, commands: &mut Self::CommandList)
    -> GlResult<()>;

  /// Destroys a command list.
  fn destroy_command_list(&mut self, commands: Self::CommandList) -> GlResult<()>;

  /// Compiles pipeline state from render targets, a blend description and vertex attributes.
  fn create_pipeline_state(
    &mut self,
    window: &mut Self::Window,
    render_targets: &[GLuint],
    blend: Blend,
    attributes: &[ShaderParameter],
  ) -> GlResult<Self::PipelineState>;

  /// Uploads `bytes` as a buffer of the declared `format`.
  fn create_buffer(
    &mut self,
    window: &mut Self::Window,
    bytes: &[u8],
    format: DataFormat,
  ) -> GlResult<Self::Buffer>;

  /// Changes the mouse cursor shown over the window.
  fn set_cursor(&mut self, window: &mut Self::Window, cursor: CursorKind) -> GlResult<()>;

  /// Empties the clipboard of content of kind `kind`.
  fn clear_clipboard(&mut self, window: &mut Self::Window, kind: ClipboardKind) -> GlResult<()>;

  /// Whether the clipboard currently holds content of kind `kind`.
  fn check_clipboard(&mut self, window: &mut Self::Window, kind: ClipboardKind) -> bool;

  /// Stores `data` on the clipboard as kind `kind`.
  fn put_clipboard(
    &mut self,
    window: &mut Self::Window,
    kind: ClipboardKind,
    data: &[u8],
  ) -> GlResult<()>;

  /// Copies clipboard content of kind `kind` into `out`, returning the number of bytes written;
  /// 0 when the clipboard holds no such content.
  fn get_clipboard(
    &mut self,
    window: &mut Self::Window,
    kind: ClipboardKind,
    out: &mut [u8],
  ) -> usize;

  /// One message-pump step. Returns a non-zero count while messages remain and zero at
  /// quiescence.
  fn process_messages(&mut self) -> u32;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn severity_maps_onto_log_levels() {
    assert_eq!(LogSeverity::Fatal.to_level(), log::Level::Error);
    assert_eq!(LogSeverity::Error.to_level(), log::Level::Error);
    assert_eq!(LogSeverity::Warning.to_level(), log::Level::Warn);
    assert_eq!(LogSeverity::Notice.to_level(), log::Level::Info);
    assert_eq!(LogSeverity::Debug.to_level(), log::Level::Debug);
  }

  #[test]
  fn severity_orders_most_severe_first() {
    assert!(LogSeverity::Fatal < LogSeverity::Error);
    assert!(LogSeverity::Error < LogSeverity::Warning);
    assert!(LogSeverity::Warning < LogSeverity::Notice);
    assert!(LogSeverity::Notice < LogSeverity::Debug);
  }

  #[test]
  fn blend_factors_map_onto_gl() {
    assert_eq!(BlendFactor::One.to_gl(), gl::ONE);
    assert_eq!(BlendFactor::SrcAlphaComplement.to_gl(), gl::ONE_MINUS_SRC_ALPHA);
    assert_eq!(BlendFactor::SrcAlphaSaturate.to_gl(), gl::SRC_ALPHA_SATURATE);
    assert_eq!(BlendOp::ReverseSubtract.to_gl(), gl::FUNC_REVERSE_SUBTRACT);
  }

  #[test]
  fn color_mask_covers_every_channel() {
    assert_eq!(
      ColorMask::ALL,
      ColorMask::RED | ColorMask::GREEN | ColorMask::BLUE | ColorMask::ALPHA
    );
    assert_eq!(ColorMask::ALL.bits(), 0b1111);
  }

  #[test]
  fn premultiplied_blend_is_the_compositing_default() {
    let b = Blend::PREMULTIPLIED;
    assert_eq!(b.src, BlendFactor::One);
    assert_eq!(b.dst, BlendFactor::SrcAlphaComplement);
    assert_eq!(b.color_op, BlendOp::Add);
    assert_eq!(b.mask, ColorMask::ALL);
  }
}
