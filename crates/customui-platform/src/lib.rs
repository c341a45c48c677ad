//! Rendering side of CustomUI.
//!
//! [`Toolkit`] is the seam to a native widget toolkit; [`HeadlessToolkit`]
//! implements it in memory. [`render`] binds a parsed widget tree to native
//! controls, [`RenderContext`] executes host commands against the live tree
//! and [`Bridge`] runs all of that on a dedicated render thread.

pub mod bridge;
pub mod config;
pub mod context;
pub mod headless;
pub mod render;
pub mod toolkit;

pub use bridge::{Bridge, BridgeError};
pub use config::BridgeConfig;
pub use context::{Command, RenderContext};
pub use headless::{HeadlessControl, HeadlessProbe, HeadlessToolkit};
pub use render::render;
pub use toolkit::{NativeEvent, Toolkit};
