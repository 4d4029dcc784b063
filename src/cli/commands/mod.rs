pub mod compress;
pub mod describe;
pub mod rename;

pub use compress::*;
pub use describe::*;
pub use rename::*;
