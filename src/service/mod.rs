pub mod booking_service;
pub mod garage_service;
pub mod matching;
pub mod quote_service;
