mod state;

pub use state::{InputAction, Prompt, Reply, Screen};
