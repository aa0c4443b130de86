mod booking;
mod hotel;
mod payment;
mod report;
mod review;
mod room;
mod user;

pub use booking::*;
pub use hotel::*;
pub use payment::*;
pub use report::*;
pub use review::*;
pub use room::*;
pub use user::*;
