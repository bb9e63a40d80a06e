//! 시계열 영속화 백엔드.

pub mod csv;

pub use csv::CsvStorage;
