//! Announcement text.

/// Summary announced after new items arrive.
pub fn items_loaded_message(count: u32) -> String {
    if count == 1 {
        "1 new item loaded".to_string()
    } else {
        format!("{} new items loaded", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_loaded_message() {
        assert_eq!(items_loaded_message(1), "1 new item loaded");
        assert_eq!(items_loaded_message(12), "12 new items loaded");
    }
}
