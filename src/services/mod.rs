// SplitScreen services
// Services provide supporting functionality: persisted flags and favicon lookup.

pub mod favicon;
pub mod settings_engine;
