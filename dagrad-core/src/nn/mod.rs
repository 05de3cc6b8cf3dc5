//! Graph operations with learnable structure: layers and losses.

pub mod layers;
pub mod losses;
