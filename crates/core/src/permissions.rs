//! Well-known permission tags granted by the back-office role system.
//!
//! The tag set itself is owned by the remote API; these constants only
//! name the tags the navigation tree and screens reference.

pub const VIEW_DASHBOARD: &str = "view_dashboard";
pub const VIEW_BOOKING: &str = "view_booking";
pub const MANAGE_BOOKING: &str = "manage_booking";
pub const VIEW_HALL: &str = "view_hall";
pub const MANAGE_HALL: &str = "manage_hall";
pub const VIEW_ROOM: &str = "view_room";
pub const MANAGE_ROOM: &str = "manage_room";
pub const VIEW_DINING: &str = "view_dining";
pub const MANAGE_DINING: &str = "manage_dining";
pub const VIEW_OFFER: &str = "view_offer";
pub const MANAGE_OFFER: &str = "manage_offer";
pub const VIEW_PROMO_CODE: &str = "view_promo_code";
pub const MANAGE_PROMO_CODE: &str = "manage_promo_code";
pub const VIEW_POLICY: &str = "view_policy";
pub const MANAGE_POLICY: &str = "manage_policy";
pub const VIEW_GALLERY: &str = "view_gallery";
pub const MANAGE_GALLERY: &str = "manage_gallery";
pub const VIEW_USER: &str = "view_user";
pub const MANAGE_USER: &str = "manage_user";
