pub mod booking_router;
pub mod garage_router;
pub mod quote_router;
