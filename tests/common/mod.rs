pub mod event_recorder;
pub mod strategies;
pub mod test_managers;

#[allow(unused_imports)]
pub use event_recorder::*;
#[allow(unused_imports)]
pub use test_managers::*;
