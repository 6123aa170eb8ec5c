//! The passes run over a parsed program

pub mod type_check;
