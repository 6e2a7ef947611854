pub mod prayer_status;
pub mod work_hours;

pub use prayer_status::{PrayerPolicy, Resolution};
pub use work_hours::{BreakWindow, TimeWindow, worked_hours};
