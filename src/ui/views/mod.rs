pub mod d1;
pub mod push;
pub mod watch;
