pub mod blocking;
pub mod demand;
pub mod network;
pub mod scenario;

pub use blocking::*;
pub use demand::*;
pub use network::*;
pub use scenario::*;
