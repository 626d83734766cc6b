// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Camera motion for 360° panorama viewers.
//!
//! Swivel turns raw pointer, touch, wheel and keyboard input into smooth
//! yaw/pitch/zoom motion: a drag rotates the view, a fling glides to a
//! stop, a pinch or the wheel ramps the zoom, and API calls animate to a
//! target along the shortest arc. Rendering stays with the host; it feeds
//! events in, ticks once per frame and reads the camera back.
//!
//! # Key entry points
//!
//! - [`navigator::Navigator`] - the per-viewer façade
//! - [`input::GestureRecognizer`] - the gesture state machine
//! - [`dynamics::Dynamic`] / [`dynamics::MultiDynamic`] - bounded
//!   speed-ramped scalar controllers
//! - [`animation::Tween`] - eased multi-property transitions
//! - [`options::Options`] - runtime configuration (camera, controls,
//!   keybindings)
//!
//! # Threading
//!
//! Everything is single-threaded. Timers are deadlines checked against a
//! [`util::timer::Clock`] whenever input arrives and on every tick, so a
//! [`util::timer::ManualClock`] makes the whole pipeline deterministic in
//! tests.

pub mod animation;
pub mod camera;
pub mod dynamics;
pub mod error;
pub mod input;
pub mod navigator;
pub mod options;
pub mod util;

pub use error::SwivelError;
pub use navigator::{AnimateOptions, FrameUpdate, Navigator};
