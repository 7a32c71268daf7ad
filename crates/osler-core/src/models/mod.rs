pub mod persona;
pub mod session;
pub mod tag;
pub mod turn;
