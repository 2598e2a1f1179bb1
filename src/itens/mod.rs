// src/itens/mod.rs

pub mod item_structs;
pub mod item_router;
