pub mod button;

pub use button::{Animation, Button, ButtonHooks, ButtonVisual, NoHooks, Phase};
