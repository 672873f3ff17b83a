//! Integration tests for the slotdeck scheduler

mod quota_limits;
mod serial_schedule;
mod test_utils;
