//! Arena-backed tree internals.

mod arena;
mod handle;
mod node;
mod raw_wavl_map;
mod size;

pub(crate) use handle::Handle;
pub(crate) use raw_wavl_map::RawWavlMap;
