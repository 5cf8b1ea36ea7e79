pub mod balance;
pub mod decision;
pub mod order;
pub mod series;
