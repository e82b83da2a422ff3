pub mod app;
pub mod core;
pub mod plugin;

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
