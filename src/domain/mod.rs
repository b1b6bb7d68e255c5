pub mod task;

pub use task::{Board, Task};
