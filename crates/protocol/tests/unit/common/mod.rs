/// Protocol and flash constants.
pub mod constants;
