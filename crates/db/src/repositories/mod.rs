pub mod category_repo;
pub mod color_repo;
pub mod coupon_repo;
pub mod delivery_repo;
pub mod order_repo;
pub mod product_repo;
pub mod shopper_repo;
pub mod wholesaler_repo;

pub use category_repo::CategoryRepo;
pub use color_repo::ColorRepo;
pub use coupon_repo::CouponRepo;
pub use delivery_repo::DeliveryRepo;
pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
pub use shopper_repo::{ShippingAddressRepo, ShopperRepo};
pub use wholesaler_repo::WholesalerRepo;
