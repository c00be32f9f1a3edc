//! # An OpenGL 3.3 rendering-backend core
//!
//! candela is the resource-ownership and error-propagation layer a host GUI drives its OpenGL
//! rendering through. It is deliberately small: everything here exists so that the two hard
//! invariants of a driver-facing backend hold on every code path.
//!
//! - **No driver error goes unobserved.** Every fallible driver call returns a
//!   [`GlResult`](error::GlResult), which carries either the produced value or a
//!   [`GlError`](error::GlError) with the raw code and the call site. In debug builds, dropping
//!   an error nobody checked panics. See the [`error`] module for the full discipline.
//! - **Every driver handle is released exactly once.** GPU objects are owned through
//!   [`GlHandle`](handle::GlHandle), a move-only wrapper whose validity predicate and release
//!   function are injected at the type level. The typed objects built on it, framebuffers,
//!   program objects and shader objects, release on every exit path including failed factories.
//!
//! # What's included?
//!
//! - [`error`]: checked driver results and chaining combinators.
//! - [`handle`]: the generic owned-handle wrapper.
//! - [`framebuffer`]: multi-attachment render targets.
//! - [`shader`] and [`program`]: compiled stages and linked pipelines.
//! - [`state`]: context-scoped driver limit queries.
//! - [`backend`]: the entry-point table and data shapes a host application talks to the backend
//!   through. Interface only; the host integration layer implements it.
//!
//! # Execution model
//!
//! Single thread, single context. Every operation assumes it runs on the thread owning the
//! active graphics context; nothing here locks, and nothing is safe to call from two threads
//! without external serialization. Driver calls are synchronous relative to the CPU; actual GPU
//! execution stays asynchronous and opaque to this layer.

pub mod backend;
pub mod error;
pub mod framebuffer;
pub mod handle;
pub mod program;
pub mod shader;
pub mod state;
