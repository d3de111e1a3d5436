//! Service layer: item persistence and the image generation relay flows.
//! - `items` hides the document store behind a repository trait.
//! - `generation` wraps the two third-party image APIs.

pub mod errors;
pub mod generation;
pub mod items;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
