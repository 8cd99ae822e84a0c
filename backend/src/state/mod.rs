//! # State Module
//!
//! Per-screen state containers. Each one is changed only through its
//! `dispatch` method and exposes derived views for rendering.

pub mod calendar_state;
pub mod home_state;

pub use calendar_state::*;
pub use home_state::*;
