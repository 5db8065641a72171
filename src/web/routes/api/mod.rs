pub mod waitlist;

pub use waitlist::{join, method_not_allowed};
