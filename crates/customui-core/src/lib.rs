//! # Widget tree model
//!
//! A host application describes a dialog as markup; this crate turns it into
//! a typed tree of widgets and keeps that tree consistent while the host and
//! the user change it.
//!
//! ```rust
//! use customui_core::*;
//!
//! let proxy = Proxy::parse(
//!     r#"<ui title="Gripper" layout="form">
//!          <label text="Force"/><hslider id="1" maximum="40"/>
//!        </ui>"#,
//! )
//! .unwrap();
//!
//! let slider = proxy.get_widget_by_id(1).unwrap();
//! assert_eq!(slider.class(), WidgetClass::HSlider);
//! assert_eq!(Widget::by_id(proxy.handle(), 1).map(|r| r.id), Some(1));
//! ```
//!
//! ## Pieces
//!
//! - [`markup`]: the document model and the typed attribute accessor
//!   ("attribute X as T, or default D").
//! - [`Widget`]: identity, presentation state, native handle binding and
//!   lifecycle. The per-kind payload is the closed enum [`WidgetKind`].
//! - [`kinds`]: every concrete kind, including the layout containers
//!   ([`Window`], [`Group`], [`Tabs`]) and the stateful ones ([`Table`],
//!   [`Tree`], [`Plot`], [`Dataflow`]).
//! - [`factory`]: tag → kind dispatch.
//! - [`Proxy`]: one host session owning one tree.
//! - [`registry`]: the process-wide existence set, the native reverse lookup
//!   and per-proxy id tables.
//! - [`Mutation`], [`UserInput`], [`Event`], [`Query`]: what flows between
//!   host, model and native controls. Carrying them across threads is the
//!   job of the platform crate.
//!
//! ## Errors
//!
//! Parsing reports every problem it can find as human-readable strings
//! ([`ParseErrors`]). Lookups that miss return `None`; they are not errors.

pub mod class;
pub mod error;
pub mod event;
pub mod factory;
pub mod geometry;
pub mod ids;
pub mod kinds;
pub mod markup;
pub mod mutation;
pub mod proxy;
pub mod query;
pub mod registry;
pub mod tests;
pub mod widget;

pub use class::*;
pub use error::*;
pub use event::*;
pub use geometry::*;
pub use ids::*;
pub use kinds::*;
pub use markup::Element;
pub use mutation::*;
pub use proxy::*;
pub use query::*;
pub use registry::{RegistryStats, WidgetRef};
pub use widget::*;
