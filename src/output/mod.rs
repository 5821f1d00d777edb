// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Generated accessor output.

mod render;
mod writer;

pub use render::render;
pub use writer::write_accessor;
