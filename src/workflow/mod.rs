mod selection;
mod session;
mod submit;

pub use selection::SelectionSet;
pub use session::{InputImage, Session};
pub use submit::{ModelOutcome, Orchestrator};
