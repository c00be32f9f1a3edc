//! This program opens a window, draws one textured quad and exercises the clipboard, running the
//! backend-object scenarios on a live context along the way.
//!
//! Press <escape> to quit or close the window.

use candela::backend::ClipboardKind;
use candela::error::{GlError, GlResult};
use candela::framebuffer::{self, AttachmentType, Framebuffer, Target};
use candela::program::ProgramObject;
use candela::shader::{ShaderObject, StageType};
use candela::state;
use candela_glfw::GlfwSurface;
use gl::types::{GLsizei, GLuint};
use glfw::{Action, Context as _, Key, WindowEvent};
use std::mem;
use std::ptr;

const VS: &str = include_str!("quad-vs.glsl");
const FS: &str = include_str!("quad-fs.glsl");

// interleaved x, y, u, v
const QUAD_VERTICES: [f32; 16] = [
  -0.5, -0.5, 0., 0., //
  0.5, -0.5, 1., 0., //
  -0.5, 0.5, 0., 1., //
  0.5, 0.5, 1., 1., //
];

const TEST_TEXT: &str = "testtext";

fn main() {
  env_logger::init();

  let mut surface = GlfwSurface::new(800, 600, "hello quad").expect("GLFW surface");

  let program = build_program();
  driver_object_scenarios();
  clipboard_scenarios(&mut surface);

  let texture = make_checker_texture();

  // offscreen render target over the texture, then back to the default framebuffer for display
  let offscreen = Framebuffer::create(Target::Both, AttachmentType::Color, 0, 0, &[texture]);
  assert!(offscreen.has_value());
  let offscreen = offscreen.into_value();
  assert_eq!(offscreen.color_attachment_count(), 1);
  assert!(offscreen.is_valid());
  assert!(offscreen.bind(Target::Draw).has_value());
  assert!(framebuffer::unbind(Target::Both).has_value());

  let (vao, vbo) = make_quad();

  unsafe {
    gl::UseProgram(program.raw());
    let loc = gl::GetUniformLocation(program.raw(), b"tex\0".as_ptr() as *const _);
    gl::Uniform1i(loc, 0);
    gl::ActiveTexture(gl::TEXTURE0);
    gl::BindTexture(gl::TEXTURE_2D, texture);
    gl::ClearColor(0.1, 0.1, 0.12, 1.);
  }

  'app: loop {
    for (_, event) in surface.pump_events() {
      match event {
        WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Release, _) => break 'app,
        _ => (),
      }
    }

    if surface.window.should_close() {
      break 'app;
    }

    unsafe {
      gl::Clear(gl::COLOR_BUFFER_BIT);
      gl::BindVertexArray(vao);
      gl::DrawArrays(gl::TRIANGLE_STRIP, 0, 4);
      gl::BindVertexArray(0);
    }

    surface.window.swap_buffers();
  }

  unsafe {
    gl::DeleteVertexArrays(1, &vao);
    gl::DeleteBuffers(1, &vbo);
    gl::DeleteTextures(1, &texture);
  }

  // dropping the framebuffer must leave its id unknown to the driver
  let raw = offscreen.raw();
  drop(offscreen);
  unsafe {
    assert_eq!(gl::IsFramebuffer(raw), gl::FALSE);
  }

  log::info!("all scenarios passed");
}

/// Compiles both stages and links them, checking the happy-path contract on the way.
fn build_program() -> ProgramObject {
  let vs = ShaderObject::create(StageType::VertexShader, VS);
  assert!(vs.has_value());
  let vs = vs.into_value();
  assert!(vs.is_valid());

  let fs = ShaderObject::create(StageType::FragmentShader, FS);
  assert!(fs.has_value());
  let fs = fs.into_value();

  let mut program = ProgramObject::create().into_value();
  assert!(program.attach(vs).has_value());
  assert!(program.attach(fs).has_value());
  assert!(program.link().has_value());
  assert!(program.is_valid());

  // a successful link leaves no pending diagnostic
  assert_eq!(program.log().into_value(), "");

  program
}

/// Error-path scenarios that need a live driver.
fn driver_object_scenarios() {
  // linking with no attached stage is a reported error, not a dead handle
  let mut empty = ProgramObject::create().into_value();
  let mut r = empty.link();
  assert!(r.has_error());
  assert_eq!(r.take().code(), gl::INVALID_OPERATION);
  assert!(empty.is_valid());

  // attaching an already invalidated shader leaves the program untouched
  let stale = ShaderObject::from_raw(0, StageType::VertexShader);
  let mut r = empty.attach(stale);
  assert!(r.has_error());
  assert_eq!(r.take().code(), gl::INVALID_VALUE);
  let mut r = empty.link();
  assert!(r.has_error());
  let e = r.take();
  assert_eq!(e.context(), "ProgramObject::link with no attached shaders");

  // asking for more color attachments than the driver reports is a reported error and the
  // allocation never reaches the caller
  let max = state::max_color_attachments().value_or(8) as usize;
  let images = vec![0u32; max + 1];
  let mut r = Framebuffer::create(Target::Both, AttachmentType::Color, 0, 0, &images);
  assert!(r.has_error());
  let e = r.take();
  assert_eq!(e.code(), gl::INVALID_VALUE);
  assert!(!e.is_invalid());
  assert!(r.take().is_invalid());

  // create-then-drop round trip: the id must not survive the wrapper
  let tex = make_checker_texture();
  let fb = Framebuffer::create(Target::Both, AttachmentType::Color, 0, 0, &[tex]).into_value();
  let raw = fb.raw();
  assert!(fb.is_valid());
  drop(fb);
  unsafe {
    assert_eq!(gl::IsFramebuffer(raw), gl::FALSE);
    gl::DeleteTextures(1, &tex);
  }
  assert!(framebuffer::unbind(Target::Both).has_value());

  // chained driver steps short-circuit on the first failure
  let chained = state::max_color_attachments()
    .and_then(|_| -> GlResult<i32> {
      GlResult::from_error(GlError::new(gl::OUT_OF_MEMORY, "forced"))
    })
    .and_then(|_| -> GlResult<i32> { unreachable!("chain must stop at the first error") });
  assert_eq!(chained.log(), gl::OUT_OF_MEMORY);
}

/// The clipboard checks of the host test suite, on the GLFW clipboard.
fn clipboard_scenarios(surface: &mut GlfwSurface) {
  surface.clear_clipboard(ClipboardKind::All);
  assert!(!surface.check_clipboard(ClipboardKind::Text));
  assert!(!surface.check_clipboard(ClipboardKind::Wave));
  assert!(!surface.check_clipboard(ClipboardKind::All));

  assert!(surface.put_clipboard(ClipboardKind::Text, TEST_TEXT));
  assert!(surface.check_clipboard(ClipboardKind::Text));
  assert!(!surface.check_clipboard(ClipboardKind::Wave));
  assert!(surface.check_clipboard(ClipboardKind::All));

  assert_eq!(surface.get_clipboard(ClipboardKind::Text).as_deref(), Some(TEST_TEXT));
  assert_eq!(surface.get_clipboard(ClipboardKind::Wave), None);
}

fn make_checker_texture() -> GLuint {
  let mut pixels = [0u8; 8 * 8 * 4];
  for y in 0..8 {
    for x in 0..8 {
      let v = if (x + y) % 2 == 0 { 0xff } else { 0x20 };
      let i = (y * 8 + x) * 4;
      pixels[i] = v;
      pixels[i + 1] = v;
      pixels[i + 2] = 0x40;
      pixels[i + 3] = 0xff;
    }
  }

  let mut texture: GLuint = 0;
  unsafe {
    gl::GenTextures(1, &mut texture);
    gl::BindTexture(gl::TEXTURE_2D, texture);
    gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::NEAREST as _);
    gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as _);
    gl::TexImage2D(
      gl::TEXTURE_2D,
      0,
      gl::RGBA8 as _,
      8,
      8,
      0,
      gl::RGBA,
      gl::UNSIGNED_BYTE,
      pixels.as_ptr() as *const _,
    );
  }

  texture
}

fn make_quad() -> (GLuint, GLuint) {
  let mut vao: GLuint = 0;
  let mut vbo: GLuint = 0;

  unsafe {
    gl::GenVertexArrays(1, &mut vao);
    gl::GenBuffers(1, &mut vbo);

    gl::BindVertexArray(vao);
    gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
    gl::BufferData(
      gl::ARRAY_BUFFER,
      mem::size_of_val(&QUAD_VERTICES) as _,
      QUAD_VERTICES.as_ptr() as *const _,
      gl::STATIC_DRAW,
    );

    let stride = (4 * mem::size_of::<f32>()) as GLsizei;
    gl::EnableVertexAttribArray(0);
    gl::VertexAttribPointer(0, 2, gl::FLOAT, gl::FALSE, stride, ptr::null());
    gl::EnableVertexAttribArray(1);
    gl::VertexAttribPointer(
      1,
      2,
      gl::FLOAT,
      gl::FALSE,
      stride,
      (2 * mem::size_of::<f32>()) as *const _,
    );

    gl::BindVertexArray(0);
  }

  (vao, vbo)
}
