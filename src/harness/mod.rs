//! Test harness: fixtures, mock wiring and a wait-until combinator for
//! asserting on rendered output.

pub mod fixtures;
pub mod render;
pub mod wait;

pub use render::{
    RecordingActions, RenderResult, create_default_feed_mock, create_feed_mock,
    render_component, render_default, render_with_session,
};
pub use wait::{WaitError, WaitOptions, wait_for};
