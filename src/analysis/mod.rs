pub mod aggregator;
pub mod growth;
pub mod monthly;
pub mod scanner;
pub mod window;
