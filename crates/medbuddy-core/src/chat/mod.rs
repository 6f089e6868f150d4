//! Rule-based medication assistant chat.

mod responder;
mod session;

pub use responder::*;
pub use session::*;
