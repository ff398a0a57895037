mod app;
pub use app::Resonance;
