//! Notification shaping and dispatch
//!
//! The refresher produces notification content; actually delivering it (a
//! system notification, a webhook, anything) is a collaborator behind the
//! [`Notifier`] trait. The crate ships [`TracingNotifier`], which emits the
//! content into the log stream.

use crate::codes::PromoCode;
use crate::news::NewsItem;
use crate::shrine::ShrineSnapshot;

/// A notification ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Outbound notification dispatch
pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

/// Notifier that writes notifications to the log
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!(title = %notification.title, body = %notification.body, "notification");
    }
}

/// Shapes a notification for newly-appeared codes, `None` when there are none
pub fn codes_notification(new: &[PromoCode]) -> Option<Notification> {
    match new {
        [] => None,
        [only] => Some(Notification {
            title: "New Promo Code!".to_string(),
            body: format!("{}: {}", only.code, only.title),
        }),
        many => Some(Notification {
            title: format!("{} New Promo Codes!", many.len()),
            body: format!("{} new promo codes available", many.len()),
        }),
    }
}

/// Shapes a notification for a shrine rotation change
pub fn shrine_notification(shrine: &ShrineSnapshot) -> Notification {
    let names: Vec<&str> = shrine
        .perks
        .iter()
        .take(2)
        .map(|perk| perk.name.as_str())
        .collect();

    let body = if shrine.perks.len() > 2 {
        format!(
            "New perks: {} and {} more",
            names.join(", "),
            shrine.perks.len() - 2
        )
    } else {
        format!("New perks: {}", names.join(", "))
    };

    Notification {
        title: "Shrine Updated!".to_string(),
        body,
    }
}

/// Shapes a notification for new news items, `None` when there are none
pub fn news_notification(new: &[NewsItem]) -> Option<Notification> {
    match new {
        [] => None,
        [only] => Some(Notification {
            title: "New News!".to_string(),
            body: only.title.clone(),
        }),
        many => Some(Notification {
            title: format!("{} New News Items!", many.len()),
            body: format!("{} new news items available", many.len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::PromoCodeType;
    use crate::shrine::{PerkRole, ShrinePerk};
    use chrono::Utc;

    fn code(value: &str, title: &str) -> PromoCode {
        PromoCode {
            id: crate::codes::code_id(value),
            code: value.to_string(),
            title: title.to_string(),
            description: String::new(),
            expires_at: None,
            days_left: None,
            kind: PromoCodeType::Unknown,
            is_expired: false,
        }
    }

    fn shrine(perk_names: &[&str]) -> ShrineSnapshot {
        ShrineSnapshot {
            id: "412".to_string(),
            week: Some(412),
            perks: perk_names
                .iter()
                .map(|name| ShrinePerk {
                    id: name.to_string(),
                    name: name.to_string(),
                    bloodpoints: 150_000,
                    shards: 2_000,
                    image: None,
                    character: None,
                    role: PerkRole::Survivor,
                    usage_tier: None,
                })
                .collect(),
            start: Utc::now(),
            end: Utc::now(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_new_codes_no_notification() {
        assert_eq!(codes_notification(&[]), None);
    }

    #[test]
    fn test_single_code_names_the_code() {
        let n = codes_notification(&[code("SAVE10", "10% Off")]).unwrap();
        assert_eq!(n.title, "New Promo Code!");
        assert_eq!(n.body, "SAVE10: 10% Off");
    }

    #[test]
    fn test_multiple_codes_counted() {
        let n = codes_notification(&[code("AAA111", "A"), code("BBB222", "B")]).unwrap();
        assert_eq!(n.title, "2 New Promo Codes!");
    }

    #[test]
    fn test_shrine_notification_truncates_perk_list() {
        let n = shrine_notification(&shrine(&["Adrenaline", "Kindred", "Whispers", "Tinkerer"]));
        assert_eq!(n.body, "New perks: Adrenaline, Kindred and 2 more");
    }

    #[test]
    fn test_shrine_notification_short_list() {
        let n = shrine_notification(&shrine(&["Adrenaline", "Kindred"]));
        assert_eq!(n.body, "New perks: Adrenaline, Kindred");
    }

    #[test]
    fn test_news_notification_singular_uses_title() {
        let item = NewsItem {
            id: "1".to_string(),
            title: "Patch 9.1.0".to_string(),
            url: String::new(),
            author: String::new(),
            contents: String::new(),
            feed_label: String::new(),
            date: Utc::now(),
        };
        let n = news_notification(&[item]).unwrap();
        assert_eq!(n.body, "Patch 9.1.0");
    }
}
