pub mod enumeration;
pub mod scoring;
