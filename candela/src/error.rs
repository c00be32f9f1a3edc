//! Checked driver results.
//!
//! Every call into the OpenGL driver funnels its outcome through [`GlResult`]: either a produced
//! value, or a [`GlError`] carrying the raw driver code and the call site that observed it. A
//! result has a third, terminal state, *consumed*, entered once the error has been extracted with
//! [`GlResult::take`], so a stale result can never be mistaken for a live one.
//!
//! A [`GlResult`] holding an error must be *checked* before it is dropped. Any of
//! [`has_value`][GlResult::has_value], [`has_error`][GlResult::has_error],
//! [`take`][GlResult::take], [`value_or`][GlResult::value_or] or [`log`][GlResult::log] counts as
//! a check. In debug builds, dropping an unchecked error panics with the call-site context; in
//! release builds the check is compiled out while the value / error / consumed state machine stays
//! exactly the same.
//!
//! The container is not [`Sync`]: results belong to the one thread that owns the graphics
//! context.

use gl::types::GLenum;
use std::cell::Cell;
use std::error;
use std::fmt;
use std::mem;

/// A raw driver error code paired with the call site that observed it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GlError {
  code: GLenum,
  context: &'static str,
}

impl GlError {
  /// Code of an error extracted from an already consumed result.
  ///
  /// Outside the range of every code `glGetError` can produce.
  pub const INVALID_CODE: GLenum = 0x7FFF_FFFF;

  /// Wraps a driver code observed at `context`.
  pub fn new(code: GLenum, context: &'static str) -> Self {
    GlError { code, context }
  }

  /// Polls `glGetError` and wraps the pending error, if any.
  pub fn poll(context: &'static str) -> Option<Self> {
    let code = unsafe { gl::GetError() };

    if code == gl::NO_ERROR {
      None
    } else {
      Some(GlError { code, context })
    }
  }

  pub(crate) fn invalid() -> Self {
    GlError {
      code: Self::INVALID_CODE,
      context: "",
    }
  }

  pub(crate) fn none() -> Self {
    GlError {
      code: gl::NO_ERROR,
      context: "",
    }
  }

  /// The raw driver code.
  pub fn code(&self) -> GLenum {
    self.code
  }

  /// The call site the error was observed at; empty for sentinel errors.
  pub fn context(&self) -> &'static str {
    self.context
  }

  /// Whether this is the consumed-result sentinel rather than a real driver error.
  pub fn is_invalid(&self) -> bool {
    self.code == Self::INVALID_CODE
  }

  fn code_name(&self) -> &'static str {
    match self.code {
      gl::NO_ERROR => "GL_NO_ERROR",
      gl::INVALID_ENUM => "GL_INVALID_ENUM",
      gl::INVALID_VALUE => "GL_INVALID_VALUE",
      gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
      gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
      gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
      gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
      gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
      gl::FRAMEBUFFER_UNDEFINED => "GL_FRAMEBUFFER_UNDEFINED",
      gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => "GL_FRAMEBUFFER_INCOMPLETE_ATTACHMENT",
      gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
        "GL_FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT"
      }
      gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => "GL_FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER",
      gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => "GL_FRAMEBUFFER_INCOMPLETE_READ_BUFFER",
      gl::FRAMEBUFFER_UNSUPPORTED => "GL_FRAMEBUFFER_UNSUPPORTED",
      gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => "GL_FRAMEBUFFER_INCOMPLETE_MULTISAMPLE",
      gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => "GL_FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS",
      Self::INVALID_CODE => "consumed result",
      _ => "unknown GL error",
    }
  }
}

impl fmt::Display for GlError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    if self.context.is_empty() {
      write!(f, "{} (0x{:04x})", self.code_name(), self.code)
    } else {
      write!(f, "{} (0x{:04x}) in {}", self.code_name(), self.code, self.context)
    }
  }
}

impl error::Error for GlError {}

enum Repr<T> {
  Value(T),
  Error(GlError),
  Consumed,
}

/// Outcome of exactly one fallible driver operation.
///
/// See the [module documentation](crate::error) for the checking discipline.
#[must_use = "a GlResult holding an unchecked error panics on drop in debug builds"]
pub struct GlResult<T> {
  repr: Repr<T>,
  // cleared by the first observation of the state
  unchecked: Cell<bool>,
}

impl<T> GlResult<T> {
  /// Wraps a produced value. Values carry no checking obligation.
  pub fn new(value: T) -> Self {
    GlResult {
      repr: Repr::Value(value),
      unchecked: Cell::new(false),
    }
  }

  /// Wraps a driver error, arming the checking obligation.
  pub fn from_error(e: GlError) -> Self {
    GlResult {
      repr: Repr::Error(e),
      unchecked: Cell::new(true),
    }
  }

  fn consumed() -> Self {
    GlResult {
      repr: Repr::Consumed,
      unchecked: Cell::new(false),
    }
  }

  /// Whether a value is held. Counts as a check.
  pub fn has_value(&self) -> bool {
    self.unchecked.set(false);
    matches!(self.repr, Repr::Value(_))
  }

  /// Whether an error is held. Counts as a check.
  pub fn has_error(&self) -> bool {
    self.unchecked.set(false);
    matches!(self.repr, Repr::Error(_))
  }

  /// State query that does *not* count as a check.
  pub fn peek(&self) -> bool {
    matches!(self.repr, Repr::Value(_))
  }

  /// Borrows the held value.
  ///
  /// Panics if the result holds an error or was consumed.
  pub fn value(&self) -> &T {
    self.unchecked.set(false);

    match self.repr {
      Repr::Value(ref v) => v,
      Repr::Error(ref e) => panic!("value() called on a GL error: {}", e),
      Repr::Consumed => panic!("value() called on a consumed result"),
    }
  }

  /// Mutably borrows the held value.
  ///
  /// Panics if the result holds an error or was consumed.
  pub fn value_mut(&mut self) -> &mut T {
    self.unchecked.set(false);

    match self.repr {
      Repr::Value(ref mut v) => v,
      Repr::Error(ref e) => panic!("value_mut() called on a GL error: {}", e),
      Repr::Consumed => panic!("value_mut() called on a consumed result"),
    }
  }

  /// Extracts the held value, leaving the result consumed.
  ///
  /// Panics if the result holds an error or was already consumed.
  pub fn into_value(mut self) -> T {
    self.unchecked.set(false);

    match mem::replace(&mut self.repr, Repr::Consumed) {
      Repr::Value(v) => v,
      Repr::Error(e) => panic!("into_value() called on a GL error: {}", e),
      Repr::Consumed => panic!("into_value() called on a consumed result"),
    }
  }

  /// Extracts the error and transitions the result to the consumed state. Counts as a check.
  ///
  /// On a value, returns a `GL_NO_ERROR` [`GlError`] and leaves the value in place. On an
  /// already consumed result, returns the [invalid sentinel][GlError::INVALID_CODE].
  pub fn take(&mut self) -> GlError {
    self.unchecked.set(false);

    match self.repr {
      Repr::Value(_) => GlError::none(),
      Repr::Error(e) => {
        self.repr = Repr::Consumed;
        e
      }
      Repr::Consumed => GlError::invalid(),
    }
  }

  /// Extracts the value, substituting `fallback` on error. Never panics; counts as a check.
  pub fn value_or(mut self, fallback: T) -> T {
    self.unchecked.set(false);

    match mem::replace(&mut self.repr, Repr::Consumed) {
      Repr::Value(v) => v,
      _ => fallback,
    }
  }

  /// Chains a further fallible step, short-circuiting on error.
  ///
  /// An error or consumed state propagates without invoking `f`; the propagated result carries
  /// the checking obligation anew.
  pub fn and_then<U, F>(mut self, f: F) -> GlResult<U>
  where
    F: FnOnce(T) -> GlResult<U>,
  {
    self.unchecked.set(false);

    match mem::replace(&mut self.repr, Repr::Consumed) {
      Repr::Value(v) => f(v),
      Repr::Error(e) => GlResult::from_error(e),
      Repr::Consumed => GlResult::consumed(),
    }
  }

  /// Maps the held value, propagating errors untouched.
  pub fn map<U, F>(mut self, f: F) -> GlResult<U>
  where
    F: FnOnce(T) -> U,
  {
    self.unchecked.set(false);

    match mem::replace(&mut self.repr, Repr::Consumed) {
      Repr::Value(v) => GlResult::new(f(v)),
      Repr::Error(e) => GlResult::from_error(e),
      Repr::Consumed => GlResult::consumed(),
    }
  }

  /// Emits the held error, if any, through the `log` facade and returns its raw code.
  ///
  /// Counts as a check. Returns `GL_NO_ERROR` when no error is held.
  pub fn log(&self) -> GLenum {
    self.unchecked.set(false);

    match self.repr {
      Repr::Error(ref e) => {
        log::error!("{}", e);
        e.code()
      }
      _ => gl::NO_ERROR,
    }
  }
}

impl GlResult<()> {
  /// Success, for operations producing no value.
  pub fn ok() -> Self {
    GlResult::new(())
  }
}

impl<T> From<GlError> for GlResult<T> {
  fn from(e: GlError) -> Self {
    GlResult::from_error(e)
  }
}

impl<T> fmt::Debug for GlResult<T>
where
  T: fmt::Debug,
{
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match self.repr {
      Repr::Value(ref v) => f.debug_tuple("GlResult::Value").field(v).finish(),
      Repr::Error(ref e) => f.debug_tuple("GlResult::Error").field(e).finish(),
      Repr::Consumed => f.write_str("GlResult::Consumed"),
    }
  }
}

impl<T> Drop for GlResult<T> {
  fn drop(&mut self) {
    if cfg!(debug_assertions) && !std::thread::panicking() {
      if let Repr::Error(ref e) = self.repr {
        assert!(!self.unchecked.get(), "GL error dropped without being checked: {}", e);
      }
    }
  }
}

/// Early-returns the pending driver error, if any, from the enclosing [`GlResult`]-returning
/// function. `$ctx` names the driver call just issued.
macro_rules! gl_guard {
  ($ctx:literal) => {
    if let Some(e) = $crate::error::GlError::poll($ctx) {
      return $crate::error::GlResult::from_error(e);
    }
  };
}

/// Evaluates a [`GlResult`], early-returning the error from the enclosing function and yielding
/// the value otherwise.
macro_rules! attempt {
  ($r:expr) => {{
    let mut r = $r;
    if r.has_error() {
      return $crate::error::GlResult::from_error(r.take());
    }
    r.into_value()
  }};
}

pub(crate) use attempt;
pub(crate) use gl_guard;

#[cfg(test)]
mod tests {
  use super::*;

  fn err(context: &'static str) -> GlError {
    GlError::new(gl::INVALID_OPERATION, context)
  }

  #[test]
  fn take_twice_yields_the_invalid_sentinel() {
    let mut r: GlResult<u32> = GlResult::from_error(err("first"));

    let first = r.take();
    assert_eq!(first.code(), gl::INVALID_OPERATION);
    assert_eq!(first.context(), "first");
    assert!(!first.is_invalid());

    let second = r.take();
    assert!(second.is_invalid());
    assert_eq!(second.code(), GlError::INVALID_CODE);
  }

  #[test]
  fn take_on_a_value_reports_no_error_and_keeps_the_value() {
    let mut r = GlResult::new(17u32);

    assert_eq!(r.take().code(), gl::NO_ERROR);
    assert!(r.has_value());
    assert_eq!(r.into_value(), 17);
  }

  #[test]
  fn checked_error_drops_quietly() {
    let r: GlResult<u32> = GlResult::from_error(err("checked"));
    assert!(r.has_error());
    // dropped here, checked
  }

  #[test]
  #[should_panic(expected = "without being checked")]
  fn unchecked_error_drop_panics_in_debug() {
    let _r: GlResult<u32> = GlResult::from_error(err("dropped blind"));
  }

  #[test]
  #[should_panic(expected = "value() called on a GL error")]
  fn value_on_an_error_is_fatal() {
    let r: GlResult<u32> = GlResult::from_error(err("inspected"));
    assert!(r.has_error());
    let _ = r.value();
  }

  #[test]
  fn value_or_never_panics() {
    let r: GlResult<u32> = GlResult::from_error(err("substituted"));
    assert_eq!(r.value_or(42), 42);

    assert_eq!(GlResult::new(7u32).value_or(42), 7);
  }

  #[test]
  fn and_then_chains_values() {
    let r = GlResult::new(2u32)
      .and_then(|x| GlResult::new(x + 1))
      .and_then(|x| GlResult::new(x * 10));

    assert_eq!(r.into_value(), 30);
  }

  #[test]
  fn and_then_short_circuits_on_error() {
    let mut reached = false;
    let mut r = GlResult::new(2u32)
      .and_then(|_| GlResult::<u32>::from_error(err("mid-chain")))
      .and_then(|x| {
        reached = true;
        GlResult::new(x)
      });

    assert!(!reached);
    assert!(r.has_error());
    assert_eq!(r.take().context(), "mid-chain");
  }

  #[test]
  fn propagation_rearms_the_checking_obligation() {
    let r: GlResult<u32> = GlResult::from_error(err("source"));
    assert!(r.has_error());

    // checked above, but the chained result must be checked again
    let chained = r.and_then(GlResult::new);
    assert!(chained.has_error());
  }

  #[test]
  fn consumed_results_propagate_as_consumed() {
    let mut r: GlResult<u32> = GlResult::from_error(err("consumed"));
    let _ = r.take();

    let chained = r.and_then(GlResult::new);
    assert!(!chained.has_value());
    assert!(!chained.has_error());
  }

  #[test]
  fn map_transforms_only_values() {
    assert_eq!(GlResult::new(3u32).map(|x| x * 2).into_value(), 6);

    let mut r = GlResult::<u32>::from_error(err("mapped")).map(|x| x * 2);
    assert_eq!(r.take().context(), "mapped");
  }

  #[test]
  fn unit_results_follow_the_same_discipline() {
    let ok = GlResult::ok();
    assert!(ok.has_value());

    let mut bad = GlResult::<()>::from_error(err("unit"));
    assert!(bad.has_error());
    assert_eq!(bad.take().context(), "unit");
    assert!(bad.take().is_invalid());
  }

  #[test]
  fn peek_does_not_count_as_a_check() {
    let r: GlResult<u32> = GlResult::from_error(err("peeked"));
    assert!(!r.peek());
    assert!(r.unchecked.get());
    assert!(r.has_error());
  }

  #[test]
  fn display_names_the_code_and_context() {
    let e = GlError::new(gl::INVALID_ENUM, "glEnable");
    assert_eq!(e.to_string(), "GL_INVALID_ENUM (0x0500) in glEnable");
    assert_eq!(GlError::invalid().to_string(), "consumed result (0x7fffffff)");
  }
}
