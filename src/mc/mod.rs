pub mod lsmc;
pub mod paths;
pub mod payoffs;
pub mod regression;
