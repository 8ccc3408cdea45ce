//! Built-in platform adapters

pub mod bilibili;
