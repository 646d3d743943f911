pub mod memory_board;
pub mod memory_reign;
