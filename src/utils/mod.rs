//! Curve and polynomial helpers shared by both backends

pub mod msm;
pub mod poly;
