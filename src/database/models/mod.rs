pub mod material;
pub mod olympiad;
pub mod payment;
pub mod reminder;
pub mod user;

pub use material::*;
pub use olympiad::*;
pub use payment::*;
pub use reminder::*;
pub use user::*;
