//! Cross-module scenarios driving the compositor over several frames

mod frame_composition;
