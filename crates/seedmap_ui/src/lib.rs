//! # SEEDMAP Viewport
//!
//! Interaction state for a pannable, zoomable structure map.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     VIEWPORT PIPELINE                       │
//! ├────────────────────────────────────────────────────────────┤
//! │  Raw Input → ViewportEvent → ViewportController → Renderer  │
//! │      ↓             ↓                 ↓                      │
//! │ PointerInput   handle()      offset / zoom / selection      │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Philosophy
//!
//! The controller owns no drawing code. It turns pointer and wheel input
//! into a pan offset, a clamped zoom factor and a selected structure.
//! Renderers read that state and project world positions through
//! [`Projection`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod input;
pub mod projection;
pub mod viewport;

pub use config::ViewportConfig;
pub use error::{ViewportError, ViewportResult};
pub use input::{MouseButton, PointerInput, ViewportEvent};
pub use projection::{
    CanvasSize, Projection, ScreenPoint, SearchCircle, ViewBounds, WorldPoint, BLOCKS_PER_PIXEL,
};
pub use viewport::{DragState, SelectionCallback, ViewportController, ViewportState};
