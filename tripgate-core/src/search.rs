use serde::{Deserialize, Serialize};

/// Guest configuration for one room, in the shape the supplier search API expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomOccupancy {
    pub adults: u32,
    pub children: Vec<u32>,
}

/// Format a flat adults/children request into the supplier's per-room guest list.
pub fn format_guests_for_search(adults: u32, children_ages: &[u32]) -> Vec<RoomOccupancy> {
    vec![RoomOccupancy {
        adults,
        children: children_ages.to_vec(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_formatting() {
        let guests = format_guests_for_search(2, &[4, 9]);
        assert_eq!(guests.len(), 1);
        assert_eq!(guests[0].adults, 2);
        assert_eq!(guests[0].children, vec![4, 9]);

        let json = serde_json::to_value(&guests).unwrap();
        assert_eq!(json[0]["adults"], 2);
        assert_eq!(json[0]["children"][1], 9);
    }
}
