pub mod cart_items;
pub mod carts;
pub mod payment_details;
pub mod payments;
pub mod products;

pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use payment_details::Entity as PaymentDetails;
pub use payments::Entity as Payments;
pub use products::Entity as Products;
