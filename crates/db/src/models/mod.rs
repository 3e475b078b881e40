pub mod category;
pub mod color;
pub mod coupon;
pub mod delivery;
pub mod image;
pub mod material;
pub mod order;
pub mod product;
pub mod product_color;
pub mod shopper;
pub mod wholesaler;
