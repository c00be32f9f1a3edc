//! [GLFW](https://crates.io/crates/glfw) windowing glue for candela.
//!
//! This crate is the disposable outer layer: it opens a window owning an OpenGL 3.3 core
//! context, loads the GL symbols, steps the message pump and exposes the host clipboard keyed by
//! [`ClipboardKind`]. Everything driver-facing stays in the core crate.

#![deny(missing_docs)]

use candela::backend::ClipboardKind;
use glfw::{Context as _, Glfw, InitError, Window, WindowEvent};
use std::error;
use std::fmt;
use std::os::raw::c_void;
use std::sync::mpsc::Receiver;

/// Error that can be risen while creating a surface.
#[non_exhaustive]
#[derive(Debug)]
pub enum SurfaceError {
  /// Initialization of the windowing system went wrong.
  InitError(InitError),

  /// The window or its context could not be created.
  WindowCreationFailed,
}

impl fmt::Display for SurfaceError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      SurfaceError::InitError(ref e) => write!(f, "initialization error: {}", e),
      SurfaceError::WindowCreationFailed => f.write_str("failed to create window"),
    }
  }
}

impl From<InitError> for SurfaceError {
  fn from(e: InitError) -> Self {
    SurfaceError::InitError(e)
  }
}

impl error::Error for SurfaceError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      SurfaceError::InitError(e) => Some(e),
      SurfaceError::WindowCreationFailed => None,
    }
  }
}

/// GLFW surface.
///
/// Owns the window, its event queue and the loaded GL context. The thread creating the surface
/// becomes the context thread; every candela call must stay on it.
pub struct GlfwSurface {
  /// Wrapped GLFW handle.
  pub glfw: Glfw,

  /// Wrapped GLFW events queue.
  pub events_rx: Receiver<(f64, WindowEvent)>,

  /// Wrapped GLFW window.
  pub window: Window,
}

impl GlfwSurface {
  /// Opens a `width` × `height` window titled `title` with a 3.3 core-profile context.
  pub fn new(width: u32, height: u32, title: &str) -> Result<Self, SurfaceError> {
    let mut glfw = glfw::init(glfw::FAIL_ON_ERRORS)?;

    // OpenGL hints
    glfw.window_hint(glfw::WindowHint::OpenGlProfile(
      glfw::OpenGlProfileHint::Core,
    ));
    glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
    glfw.window_hint(glfw::WindowHint::ContextVersionMajor(3));
    glfw.window_hint(glfw::WindowHint::ContextVersionMinor(3));

    let (mut window, events_rx) = glfw
      .create_window(width, height, title, glfw::WindowMode::Windowed)
      .ok_or(SurfaceError::WindowCreationFailed)?;

    window.make_current();
    window.set_all_polling(true);

    // init OpenGL
    gl::load_with(|s| window.get_proc_address(s) as *const c_void);

    Ok(GlfwSurface {
      glfw,
      events_rx,
      window,
    })
  }

  /// One message-pump step: polls the host and drains the pending events.
  ///
  /// The returned batch is empty at quiescence.
  pub fn pump_events(&mut self) -> Vec<(f64, WindowEvent)> {
    self.glfw.poll_events();
    glfw::flush_messages(&self.events_rx).collect()
  }

  /// Empties the clipboard of content of kind `kind`.
  pub fn clear_clipboard(&mut self, kind: ClipboardKind) {
    if backs_text(kind) {
      self.window.set_clipboard_string("");
    }
  }

  /// Whether the clipboard currently holds content of kind `kind`.
  ///
  /// Only [`ClipboardKind::Text`] is backed by GLFW; [`ClipboardKind::All`] means "any".
  pub fn check_clipboard(&self, kind: ClipboardKind) -> bool {
    backs_text(kind)
      && self
        .window
        .get_clipboard_string()
        .map_or(false, |s| !s.is_empty())
  }

  /// Stores `text` on the clipboard as kind `kind`. Returns whether the kind is backed.
  pub fn put_clipboard(&mut self, kind: ClipboardKind, text: &str) -> bool {
    if kind == ClipboardKind::Text {
      self.window.set_clipboard_string(text);
      true
    } else {
      false
    }
  }

  /// Reads clipboard content of kind `kind`; `None` when no such content is held.
  pub fn get_clipboard(&self, kind: ClipboardKind) -> Option<String> {
    if backs_text(kind) {
      self.window.get_clipboard_string().filter(|s| !s.is_empty())
    } else {
      None
    }
  }
}

fn backs_text(kind: ClipboardKind) -> bool {
  kind == ClipboardKind::Text || kind == ClipboardKind::All
}
