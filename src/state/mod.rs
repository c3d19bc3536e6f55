pub mod gesture;
pub mod placement;
pub mod session;
pub mod watcher;

pub use gesture::{GestureInput, GestureInterpreter, GestureOutput, MouseDrag, Pointer, Transform};
pub use session::{SessionAction, TempleSession};
