/// Static catalog of pickup/dropoff time slots and service duration
/// estimates.
///
/// Slots are half-open windows identified by their "HH:MM" start. Pickups
/// live in a morning window, dropoffs in an afternoon/evening window, and a
/// pickup/dropoff pair on the same booking must be at least
/// `MIN_PICKUP_DROPOFF_GAP_MIN` minutes apart.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Pickup,
    Dropoff,
}

#[derive(Debug, Clone, Copy)]
pub struct SlotDef {
    /// Slot id, also its start time ("HH:MM").
    pub id: &'static str,
    /// Start minute-of-day.
    pub start_minute: u16,
    /// Maximum bookings that may share this slot on one date.
    pub capacity: u32,
}

/// Minimum gap between a pickup and the dropoff of the same booking.
pub const MIN_PICKUP_DROPOFF_GAP_MIN: u16 = 120;

const DEFAULT_SLOT_CAPACITY: u32 = 2;

macro_rules! slot {
    ($id:literal, $minute:expr) => {
        SlotDef {
            id: $id,
            start_minute: $minute,
            capacity: DEFAULT_SLOT_CAPACITY,
        }
    };
}

/// Morning pickup window, half-hour aligned.
pub const PICKUP_SLOTS: &[SlotDef] = &[
    slot!("08:00", 480),
    slot!("08:30", 510),
    slot!("09:00", 540),
    slot!("09:30", 570),
    slot!("10:00", 600),
    slot!("10:30", 630),
    slot!("11:00", 660),
    slot!("11:30", 690),
];

/// Afternoon/evening dropoff window, half-hour aligned.
pub const DROPOFF_SLOTS: &[SlotDef] = &[
    slot!("12:30", 750),
    slot!("13:00", 780),
    slot!("13:30", 810),
    slot!("14:00", 840),
    slot!("14:30", 870),
    slot!("15:00", 900),
    slot!("15:30", 930),
    slot!("16:00", 960),
    slot!("16:30", 990),
    slot!("17:00", 1020),
    slot!("17:30", 1050),
    slot!("18:00", 1080),
];

/// Estimated duration in minutes for each supported service type.
pub const SERVICE_DURATIONS: &[(&str, u32)] = &[
    ("diagnostic", 90),
    ("mot", 120),
    ("basic_service", 180),
    ("full_service", 300),
    ("tyres", 60),
];

pub fn catalog(kind: SlotKind) -> &'static [SlotDef] {
    match kind {
        SlotKind::Pickup => PICKUP_SLOTS,
        SlotKind::Dropoff => DROPOFF_SLOTS,
    }
}

pub fn find_slot(kind: SlotKind, id: &str) -> Option<&'static SlotDef> {
    catalog(kind).iter().find(|s| s.id == id)
}

/// Parse a "HH:MM" slot id to its minute-of-day.
pub fn slot_minute(id: &str) -> Option<u16> {
    let (h, m) = id.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }
    let h: u16 = h.parse().ok()?;
    let m: u16 = m.parse().ok()?;
    if h > 23 || m > 59 {
        return None;
    }
    Some(h * 60 + m)
}

/// Whether a pickup/dropoff pair satisfies the minimum-gap constraint.
pub fn gap_is_legal(pickup: &SlotDef, dropoff: &SlotDef) -> bool {
    dropoff.start_minute >= pickup.start_minute + MIN_PICKUP_DROPOFF_GAP_MIN
}

/// Dropoff slots still legal after choosing the given pickup.
pub fn legal_dropoffs_for(pickup: &SlotDef) -> Vec<&'static SlotDef> {
    DROPOFF_SLOTS.iter().filter(|d| gap_is_legal(pickup, d)).collect()
}

/// Pickup slots still legal after choosing the given dropoff.
pub fn legal_pickups_for(dropoff: &SlotDef) -> Vec<&'static SlotDef> {
    PICKUP_SLOTS.iter().filter(|p| gap_is_legal(p, dropoff)).collect()
}

pub fn estimated_duration_minutes(service_type: &str) -> Option<u32> {
    SERVICE_DURATIONS
        .iter()
        .find(|(name, _)| *name == service_type)
        .map(|(_, minutes)| *minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_ids_match_start_minutes() {
        for slot in PICKUP_SLOTS.iter().chain(DROPOFF_SLOTS.iter()) {
            assert_eq!(slot_minute(slot.id), Some(slot.start_minute));
        }
    }

    #[test]
    fn test_catalogs_are_sorted_and_distinct() {
        for slots in [PICKUP_SLOTS, DROPOFF_SLOTS] {
            for pair in slots.windows(2) {
                assert!(pair[0].start_minute < pair[1].start_minute);
            }
        }
    }

    #[test]
    fn test_find_slot() {
        assert!(find_slot(SlotKind::Pickup, "09:00").is_some());
        assert!(find_slot(SlotKind::Dropoff, "09:00").is_none());
        assert!(find_slot(SlotKind::Dropoff, "17:30").is_some());
        assert!(find_slot(SlotKind::Pickup, "bogus").is_none());
    }

    #[test]
    fn test_slot_minute_rejects_malformed_ids() {
        assert_eq!(slot_minute("9:00"), None);
        assert_eq!(slot_minute("09-00"), None);
        assert_eq!(slot_minute("25:00"), None);
        assert_eq!(slot_minute("09:61"), None);
        assert_eq!(slot_minute("09:30"), Some(570));
    }

    #[test]
    fn test_gap_constraint() {
        let pickup = find_slot(SlotKind::Pickup, "11:30").unwrap();
        // 11:30 + 120min = 13:30 is the earliest legal dropoff
        let legal = legal_dropoffs_for(pickup);
        assert!(legal.iter().all(|d| d.start_minute >= 810));
        assert!(legal.iter().any(|d| d.id == "13:30"));
        assert!(!legal.iter().any(|d| d.id == "13:00"));
    }

    #[test]
    fn test_every_legal_pair_respects_minimum_gap() {
        for pickup in PICKUP_SLOTS {
            for dropoff in legal_dropoffs_for(pickup) {
                assert!(
                    dropoff.start_minute as i32 - pickup.start_minute as i32
                        >= MIN_PICKUP_DROPOFF_GAP_MIN as i32
                );
            }
        }
    }

    #[test]
    fn test_legal_pickups_is_inverse_of_legal_dropoffs() {
        let dropoff = find_slot(SlotKind::Dropoff, "12:30").unwrap();
        let legal = legal_pickups_for(dropoff);
        // 12:30 - 120min = 10:30 is the latest legal pickup
        assert!(legal.iter().all(|p| p.start_minute <= 630));
        assert!(legal.iter().any(|p| p.id == "10:30"));
        assert!(!legal.iter().any(|p| p.id == "11:00"));
    }

    #[test]
    fn test_service_durations() {
        assert_eq!(estimated_duration_minutes("full_service"), Some(300));
        assert_eq!(estimated_duration_minutes("unknown"), None);
    }
}
