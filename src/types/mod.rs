//! Value types shared by the layout engine, the surface and the exporter.

mod cell;
mod drawing;
mod merge;
mod page;
mod style;

pub use cell::*;
pub use drawing::*;
pub use merge::*;
pub use page::*;
pub use style::*;
