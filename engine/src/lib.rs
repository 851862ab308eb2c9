pub mod alert;
pub mod fluctuation;
pub mod monitor;
pub mod quote;
pub mod threshold;
pub mod time;
pub mod window;
