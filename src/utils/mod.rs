pub mod artifacts;
pub mod javascript;
pub mod logging;

pub use artifacts::ArtifactRecorder;
pub use logging::init_tracing;
