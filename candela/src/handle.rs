//! Owned driver handles.
//!
//! Every GPU-resident object the backend touches is named by a raw id the driver hands out.
//! [`GlHandle`] owns exactly one such id: it is move-only, and when it drops while still naming a
//! live object, the release function runs exactly once. The validity predicate and the release
//! function are injected at the type level through [`Resource`], so a handle stays the size of
//! the raw id it wraps.

use gl::types::GLuint;
use std::marker::PhantomData;
use std::mem;

/// Behaviors of one kind of driver-allocated object.
///
/// Both functions are associated with the implementing kind, never stored per instance.
pub trait Resource {
  /// Whether `raw` currently names a live driver object of this kind.
  fn exists(raw: GLuint) -> bool;

  /// Releases `raw`. Invoked at most once per owned id.
  fn delete(raw: GLuint);
}

/// Move-only owner of one raw driver id.
///
/// At most one live handle names a given id. A defaulted handle wraps the null id and its drop is
/// a no-op.
#[derive(Debug)]
pub struct GlHandle<R>
where
  R: Resource,
{
  raw: GLuint,
  _kind: PhantomData<R>,
}

impl<R> GlHandle<R>
where
  R: Resource,
{
  /// Wraps a freshly allocated raw id, taking over the release duty.
  pub fn from_raw(raw: GLuint) -> Self {
    GlHandle {
      raw,
      _kind: PhantomData,
    }
  }

  /// The wrapped raw id; null if the handle was disarmed.
  pub fn raw(&self) -> GLuint {
    self.raw
  }

  /// Whether the id is non-null and the driver still recognizes it.
  ///
  /// A query, not a fallible operation.
  pub fn is_valid(&self) -> bool {
    self.raw != 0 && R::exists(self.raw)
  }

  /// Disarms the handle and yields the raw id; the caller takes over the release duty.
  pub fn into_raw(mut self) -> GLuint {
    mem::replace(&mut self.raw, 0)
  }
}

impl<R> Default for GlHandle<R>
where
  R: Resource,
{
  fn default() -> Self {
    GlHandle {
      raw: 0,
      _kind: PhantomData,
    }
  }
}

impl<R> Drop for GlHandle<R>
where
  R: Resource,
{
  fn drop(&mut self) {
    if self.is_valid() {
      R::delete(self.raw);
      self.raw = 0;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::RefCell;
  use std::collections::HashMap;

  thread_local! {
    // raw id -> number of delete() calls so far
    static DELETES: RefCell<HashMap<GLuint, u32>> = RefCell::new(HashMap::new());
  }

  enum Fake {}

  impl Resource for Fake {
    fn exists(raw: GLuint) -> bool {
      DELETES.with(|d| d.borrow().get(&raw).map_or(false, |n| *n == 0))
    }

    fn delete(raw: GLuint) {
      DELETES.with(|d| *d.borrow_mut().entry(raw).or_insert(0) += 1);
    }
  }

  fn alloc(raw: GLuint) -> GlHandle<Fake> {
    DELETES.with(|d| d.borrow_mut().insert(raw, 0));
    GlHandle::from_raw(raw)
  }

  fn delete_count(raw: GLuint) -> u32 {
    DELETES.with(|d| *d.borrow().get(&raw).unwrap())
  }

  #[test]
  fn released_exactly_once_on_drop() {
    let h = alloc(1);
    assert!(h.is_valid());

    drop(h);
    assert_eq!(delete_count(1), 1);
    assert!(!Fake::exists(1));
  }

  #[test]
  fn move_assignment_releases_the_overwritten_id_once() {
    let mut h = alloc(2);
    h = alloc(3);

    assert_eq!(delete_count(2), 1);
    assert_eq!(delete_count(3), 0);
    assert_eq!(h.raw(), 3);

    drop(h);
    assert_eq!(delete_count(2), 1);
    assert_eq!(delete_count(3), 1);
  }

  #[test]
  fn into_raw_disarms_the_handle() {
    let h = alloc(4);
    let raw = h.into_raw();

    assert_eq!(raw, 4);
    assert_eq!(delete_count(4), 0);

    Fake::delete(raw);
    assert_eq!(delete_count(4), 1);
  }

  #[test]
  fn early_return_paths_release() {
    fn fails_midway() -> Result<GlHandle<Fake>, ()> {
      let _h = alloc(5);
      Err(())
    }

    assert!(fails_midway().is_err());
    assert_eq!(delete_count(5), 1);
  }

  #[test]
  fn defaulted_handle_is_inert() {
    let h: GlHandle<Fake> = GlHandle::default();
    assert!(!h.is_valid());
    assert_eq!(h.raw(), 0);
    // dropping must not call delete(0)
    drop(h);
    DELETES.with(|d| assert!(!d.borrow().contains_key(&0)));
  }

  #[test]
  fn stale_ids_are_invalid() {
    let h = alloc(6);
    let raw = h.into_raw();
    Fake::delete(raw);

    let stale = GlHandle::<Fake>::from_raw(raw);
    assert!(!stale.is_valid());

    // drop of an invalid handle must not release again
    drop(stale);
    assert_eq!(delete_count(6), 1);
  }
}
