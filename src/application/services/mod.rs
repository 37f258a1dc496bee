pub mod lazy_loader;

pub use lazy_loader::{
    DEFAULT_DELAY_MS, LazyImageLoader, LoaderConfig, LoaderPhase, LoaderPorts, PassReport,
    TriggerOutcome,
};
