//! Cart view binding: session-backed storage, the add-to-cart guard, and the
//! display models rendered into the cart surfaces.

pub mod guard;
pub mod session;
pub mod views;

pub use guard::{AddToCartGuard, GuardRegistry, InFlight, RequestState};
pub use session::{SessionCart, SessionCartStorage, client_key};
pub use views::{
    BadgeView, CartItemView, CartView, CheckoutView, ImagePaths, NotificationKind,
    NotificationView,
};
