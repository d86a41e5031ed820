#![no_std]

pub mod outputs;
pub mod time;
