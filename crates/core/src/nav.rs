//! The back-office navigation tree, its permission filter, and active-item
//! resolution.
//!
//! The tree is defined once at startup and never mutated. Filtering is
//! pure: the same tree and predicate always produce the same menu.

use crate::permissions;

/// A node in the admin navigation tree.
///
/// Each item is gated by exactly one permission tag. A parent's tag gates
/// the whole group; its children are then filtered independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    /// Route this item links to; group headers may have none.
    pub path: Option<&'static str>,
    pub required_permission: &'static str,
    pub children: Vec<NavItem>,
}

impl NavItem {
    /// A linked item with no children.
    pub fn leaf(label: &'static str, path: &'static str, permission: &'static str) -> Self {
        Self {
            label,
            path: Some(path),
            required_permission: permission,
            children: Vec::new(),
        }
    }

    /// A group header gating its children.
    pub fn group(label: &'static str, permission: &'static str, children: Vec<NavItem>) -> Self {
        Self {
            label,
            path: None,
            required_permission: permission,
            children,
        }
    }
}

/// The full back-office menu.
pub fn default_nav() -> Vec<NavItem> {
    vec![
        NavItem::leaf("Dashboard", "/dashboard", permissions::VIEW_DASHBOARD),
        NavItem::group(
            "Bookings",
            permissions::VIEW_BOOKING,
            vec![
                NavItem::leaf("All Bookings", "/bookings", permissions::VIEW_BOOKING),
                NavItem::leaf("New Booking", "/bookings/new", permissions::MANAGE_BOOKING),
            ],
        ),
        NavItem::group(
            "Halls",
            permissions::VIEW_HALL,
            vec![
                NavItem::leaf("All Halls", "/halls", permissions::VIEW_HALL),
                NavItem::leaf("Add Hall", "/halls/new", permissions::MANAGE_HALL),
            ],
        ),
        NavItem::group(
            "Rooms",
            permissions::VIEW_ROOM,
            vec![
                NavItem::leaf("All Rooms", "/rooms", permissions::VIEW_ROOM),
                NavItem::leaf("Add Room", "/rooms/new", permissions::MANAGE_ROOM),
            ],
        ),
        NavItem::group(
            "Dining",
            permissions::VIEW_DINING,
            vec![
                NavItem::leaf("Menu", "/dining", permissions::VIEW_DINING),
                NavItem::leaf("Add Dish", "/dining/new", permissions::MANAGE_DINING),
            ],
        ),
        NavItem::leaf("Offers", "/offers", permissions::VIEW_OFFER),
        NavItem::leaf("Promo Codes", "/promo-codes", permissions::VIEW_PROMO_CODE),
        NavItem::leaf("Policies", "/policies", permissions::VIEW_POLICY),
        NavItem::leaf("Gallery", "/gallery", permissions::VIEW_GALLERY),
        NavItem::group(
            "Users",
            permissions::VIEW_USER,
            vec![
                NavItem::leaf("All Users", "/users", permissions::VIEW_USER),
                NavItem::leaf("Roles", "/users/roles", permissions::MANAGE_USER),
            ],
        ),
    ]
}

/// Filter a navigation tree down to the items the predicate grants.
///
/// Children are evaluated against the predicate independently of their
/// parent; a parent whose children are all filtered out is still included
/// (its own tag already cleared it). Input order is preserved.
pub fn filter_nav<F>(items: &[NavItem], granted: &F) -> Vec<NavItem>
where
    F: Fn(&str) -> bool,
{
    items
        .iter()
        .filter(|item| granted(item.required_permission))
        .map(|item| NavItem {
            children: filter_nav(&item.children, granted),
            ..item.clone()
        })
        .collect()
}

/// Resolve which item the current route falls under, for menu highlighting.
///
/// Scans items in order, checking an item's own path and then its children
/// before moving on. A match is a path equal to the route or a prefix of
/// it. This is presentation only -- access control happens server-side and
/// in [`filter_nav`].
pub fn find_active<'a>(items: &'a [NavItem], route: &str) -> Option<&'a NavItem> {
    for item in items {
        if let Some(path) = item.path {
            if route.starts_with(path) {
                return Some(item);
            }
        }
        if let Some(child) = find_active(&item.children, route) {
            return Some(child);
        }
    }
    None
}
