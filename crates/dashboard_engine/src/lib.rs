pub mod generator;
pub mod views;

pub use generator::{generate_with, FinancialDataSource, RandomFinancialDataGenerator};
pub use views::{
    home_summary, net_worth_summary, spending_options, spending_power_summary, BalanceReading,
    ViewError,
};
