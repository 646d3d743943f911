mod entry_id;
mod window;

pub use entry_id::{EntryId, EntryIdGenerator};
pub use window::Window;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_display() {
        assert_eq!(Window::AllTime.to_string(), "all-time");
        assert_eq!(Window::Last30Days.to_string(), "last-30-days");
        assert_eq!(Window::Last7Days.to_string(), "last-7-days");
    }

    #[test]
    fn entry_id_hash_eq() {
        use std::collections::HashSet;
        let a = EntryId(1);
        let b = EntryId(1);
        let c = EntryId(2);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b);
        assert_eq!(set.len(), 1);
        set.insert(c);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn window_json_round_trip() {
        for window in Window::ALL {
            let json = serde_json::to_string(&window).unwrap();
            let decoded: Window = serde_json::from_str(&json).unwrap();
            assert_eq!(window, decoded);
        }
    }
}
