//! Primary-page parsing: HTML fragments, line classification, section
//! grouping and record conversion.

pub mod classify;
pub mod fragments;
pub mod records;
pub mod rules;
pub mod sections;
