pub mod encounter;
pub mod player;
pub mod replay;
