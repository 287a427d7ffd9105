//! Event listings, ticket tiers and the browse/search views over them.

use crate::types::{EventId, ItemId, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A purchasable unit with a fixed price (a ticket tier)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique identifier
    pub id: ItemId,
    /// Display label
    pub name: String,
    /// Price of one unit
    pub unit_price: Money,
}

impl CatalogItem {
    /// Creates a new catalog item
    #[must_use]
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_price,
        }
    }
}

/// Ordered set of ticket tiers offered for one event
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Builds a catalog, keeping the first item for any repeated id
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let mut catalog = Self::default();
        for item in items {
            if catalog.get(&item.id).is_none() {
                catalog.items.push(item);
            }
        }
        catalog
    }

    /// Looks up an item by id
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Iterates items in display order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter()
    }

    /// Number of tiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog offers nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<CatalogItem> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogItem>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Detail page of a single event with its ticket tiers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventListing {
    /// Event identifier
    pub id: EventId,
    /// Event name
    pub name: String,
    /// Human-readable date range, as supplied by the backend
    pub date: String,
    /// Venue city
    pub location: String,
    /// Cover image URL
    pub image_url: String,
    /// Long description
    pub description: String,
    /// Ticket tiers on sale
    pub ticket_types: Catalog,
}

/// Category tag on a browse-list ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCategory {
    /// Technology conferences
    Tech,
    /// Concerts and festivals
    Music,
    /// Food and drink
    Food,
}

impl TicketCategory {
    /// All categories in tab order
    pub const ALL: [Self; 3] = [Self::Tech, Self::Music, Self::Food];
}

impl fmt::Display for TicketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tech => "TECH",
            Self::Music => "MUSIC",
            Self::Food => "FOOD",
        })
    }
}

/// Entry of the ticket browse list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketListing {
    /// Identifier (matches the event listing id)
    pub id: EventId,
    /// Event name
    pub event_name: String,
    /// Human-readable date range
    pub date: String,
    /// Venue city
    pub location: String,
    /// Cover image URL
    pub image_url: String,
    /// Starting price
    pub price: Money,
    /// Category tag
    pub category: TicketCategory,
}

/// Category tab selected on the browse list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TicketFilter {
    /// Show every ticket
    #[default]
    All,
    /// Show only tickets in one category
    Category(TicketCategory),
}

impl TicketFilter {
    /// Whether a listing passes this filter
    #[must_use]
    pub fn matches(self, listing: &TicketListing) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => listing.category == category,
        }
    }
}

/// Listings visible under `filter`, in their original order
pub fn filter_tickets(
    listings: &[TicketListing],
    filter: TicketFilter,
) -> impl Iterator<Item = &TicketListing> {
    listings.iter().filter(move |listing| filter.matches(listing))
}

/// Entry of the category directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCategory {
    /// Identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Icon name in the app's icon set
    pub icon: String,
    /// Background image URL
    pub image_url: String,
}

/// Categories whose name contains `query`, ignoring case
///
/// An empty query matches everything.
pub fn search_categories<'a>(
    categories: &'a [EventCategory],
    query: &str,
) -> impl Iterator<Item = &'a EventCategory> {
    let needle = query.to_lowercase();
    categories
        .iter()
        .filter(move |category| category.name.to_lowercase().contains(&needle))
}

/// Card in the home feed's featured carousel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedEvent {
    /// Identifier
    pub id: EventId,
    /// Title
    pub title: String,
    /// Date label
    pub date: String,
    /// City
    pub location: String,
    /// Cover image URL
    pub image_url: String,
}

/// Row in the home feed's upcoming list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingEvent {
    /// Identifier
    pub id: EventId,
    /// Name
    pub name: String,
    /// Date label
    pub date: String,
    /// Time label
    pub time: String,
}

/// Quick-access category on the home feed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickCategory {
    /// Identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Icon name
    pub icon: String,
}

/// Home screen content
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeFeed {
    /// Name shown in the greeting
    pub greeting_name: String,
    /// Featured carousel
    pub featured: Vec<FeaturedEvent>,
    /// Upcoming events list
    pub upcoming: Vec<UpcomingEvent>,
    /// Quick categories row
    pub categories: Vec<QuickCategory>,
}

impl HomeFeed {
    /// Fallback greeting when the signed-in user has no display name
    pub const DEFAULT_GREETING_NAME: &'static str = "User";

    /// Greeting name for a session's display name
    #[must_use]
    pub fn greeting_name_for(display_name: Option<&str>) -> String {
        display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(Self::DEFAULT_GREETING_NAME)
            .to_string()
    }
}
