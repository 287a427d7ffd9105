//! Static content the app ships with before the backend catalog loads.

use crate::catalog::{
    CatalogItem, EventCategory, EventListing, FeaturedEvent, HomeFeed, QuickCategory,
    TicketCategory, TicketListing, UpcomingEvent,
};
use crate::notifications::{Notification, NotificationKind};
use crate::types::{EventId, Money};

const PEXELS: &str = "https://images.pexels.com/photos";

fn photo(id: u32) -> String {
    format!("{PEXELS}/{id}/pexels-photo-{id}.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2")
}

/// TechConf 2024 detail page with its three ticket tiers
#[must_use]
pub fn techconf_listing() -> EventListing {
    EventListing {
        id: EventId::new("1"),
        name: "TechConf 2024".to_string(),
        date: "June 15-17, 2024".to_string(),
        location: "San Francisco, CA".to_string(),
        image_url: photo(15_262_989),
        description: "Join us for the biggest tech conference of the year, featuring keynotes \
                      from industry leaders, hands-on workshops, and networking opportunities."
            .to_string(),
        ticket_types: [
            CatalogItem::new("1", "General Admission", Money::from_dollars(299)),
            CatalogItem::new("2", "VIP Access", Money::from_dollars(599)),
            CatalogItem::new("3", "Workshop Pass", Money::from_dollars(199)),
        ]
        .into_iter()
        .collect(),
    }
}

/// Browse list entries
#[must_use]
pub fn ticket_listings() -> Vec<TicketListing> {
    vec![
        TicketListing {
            id: EventId::new("1"),
            event_name: "TechConf 2024".to_string(),
            date: "June 15-17, 2024".to_string(),
            location: "San Francisco, CA".to_string(),
            image_url: photo(2_774_556),
            price: Money::from_dollars(299),
            category: TicketCategory::Tech,
        },
        TicketListing {
            id: EventId::new("2"),
            event_name: "Music Festival".to_string(),
            date: "July 20-22, 2024".to_string(),
            location: "Austin, TX".to_string(),
            image_url: photo(1_763_075),
            price: Money::from_dollars(199),
            category: TicketCategory::Music,
        },
        TicketListing {
            id: EventId::new("3"),
            event_name: "Food & Wine Expo".to_string(),
            date: "August 5-7, 2024".to_string(),
            location: "New York, NY".to_string(),
            image_url: photo(1_267_696),
            price: Money::from_dollars(149),
            category: TicketCategory::Food,
        },
    ]
}

/// Category directory
#[must_use]
pub fn event_categories() -> Vec<EventCategory> {
    [
        ("1", "Music", "music", 1_763_075),
        ("2", "Sports", "activity", 46_798),
        ("3", "Art", "feather", 1_266_808),
        ("4", "Movies", "film", 7_991_579),
        ("5", "Food & Drink", "coffee", 1_640_777),
        ("6", "Travel", "map", 1_271_619),
        ("7", "Nightlife", "moon", 1_190_297),
        ("8", "Comedy", "smile", 7_234_263),
    ]
    .into_iter()
    .map(|(id, name, icon, image)| EventCategory {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        image_url: photo(image),
    })
    .collect()
}

/// Home feed for a user with the given display name
#[must_use]
pub fn home_feed(display_name: Option<&str>) -> HomeFeed {
    let featured = [
        ("1", "Tech Conference 2024", "Mar 15-17", "San Francisco", 1_141_853),
        ("2", "Music Festival", "Apr 5-7", "Los Angeles", 2_525_903),
        ("3", "Food & Wine Expo", "May 20-22", "New York", 1_486_222),
        ("4", "Art Exhibition", "Jun 10-12", "Chicago", 1_797_192),
    ]
    .into_iter()
    .map(|(id, title, date, location, image)| FeaturedEvent {
        id: EventId::new(id),
        title: title.to_string(),
        date: date.to_string(),
        location: location.to_string(),
        image_url: photo(image),
    })
    .collect();

    let upcoming = [
        ("1", "Web Development Workshop", "Mar 25", "2:00 PM"),
        ("2", "Networking Mixer", "Apr 2", "6:30 PM"),
        ("3", "Marketing Seminar", "Apr 10", "10:00 AM"),
    ]
    .into_iter()
    .map(|(id, name, date, time)| UpcomingEvent {
        id: EventId::new(id),
        name: name.to_string(),
        date: date.to_string(),
        time: time.to_string(),
    })
    .collect();

    let categories = [
        ("1", "Conferences", "calendar-outline"),
        ("2", "Workshops", "people-outline"),
        ("3", "Concerts", "musical-notes"),
        ("4", "Networking", "share-social"),
    ]
    .into_iter()
    .map(|(id, name, icon)| QuickCategory {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
    })
    .collect();

    HomeFeed {
        greeting_name: HomeFeed::greeting_name_for(display_name),
        featured,
        upcoming,
        categories,
    }
}

/// Inbox contents on first launch
#[must_use]
pub fn notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: "1".to_string(),
            kind: NotificationKind::EventReminder,
            title: "Team Meeting".to_string(),
            message: "Don't forget about the team meeting at 2 PM today.".to_string(),
            timestamp: "10:30 AM".to_string(),
            read: false,
            icon: "calendar".to_string(),
        },
        Notification {
            id: "2".to_string(),
            kind: NotificationKind::PriceAlert,
            title: "Price Drop Alert".to_string(),
            message: "The item you've been watching is now on sale!".to_string(),
            timestamp: "Yesterday".to_string(),
            read: true,
            icon: "pricetag".to_string(),
        },
        Notification {
            id: "3".to_string(),
            kind: NotificationKind::NewEvent,
            title: "New Event Added".to_string(),
            message: "A new event has been added to your calendar.".to_string(),
            timestamp: "2 days ago".to_string(),
            read: false,
            icon: "add-circle".to_string(),
        },
    ]
}
